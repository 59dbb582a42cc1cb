//! CLI commands for the toolkit configuration

use std::path::{Path, PathBuf};

use crate::config::ForgeConfig;

fn resolve(path: Option<&Path>) -> anyhow::Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(ForgeConfig::default_path()?),
    }
}

/// Write the default configuration
pub fn init(path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let path = resolve(path)?;
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {} (use --force to replace it)",
            path.display()
        );
    }

    ForgeConfig::default().save(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

/// Print the configuration that a build would use
pub fn show(path: Option<&Path>) -> anyhow::Result<()> {
    let path = resolve(path)?;
    let config = ForgeConfig::load_or_default(&path)?;

    let source = if path.exists() { "" } else { " (not found, showing defaults)" };
    println!("# {}{}", path.display(), source);
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

/// Report problems that would stop a build
pub fn check(path: Option<&Path>) -> anyhow::Result<()> {
    let path = resolve(path)?;
    let config = ForgeConfig::load_or_default(&path)?;

    let issues = config.validate();
    if issues.is_empty() {
        println!("Configuration OK ({})", path.display());
        return Ok(());
    }
    for issue in &issues {
        println!("  {issue}");
    }
    anyhow::bail!("{} configuration issue(s) in {}", issues.len(), path.display())
}
