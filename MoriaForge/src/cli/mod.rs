//! MoriaForge CLI - apply definitions and build Return to Moria mods

pub mod commands;
pub mod progress;

use clap::{ArgAction, Parser};
use commands::Commands;
use tracing::Level;

#[derive(Parser)]
#[command(name = "moriaforge")]
#[command(about = "MoriaForge: definition-driven mod builder for Return to Moria", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Run the MoriaForge CLI
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    cli.command.execute()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use commands::ConfigCommands;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(log_level(0), Level::WARN);
        assert_eq!(log_level(1), Level::INFO);
        assert_eq!(log_level(2), Level::DEBUG);
        assert_eq!(log_level(7), Level::TRACE);
    }

    #[test]
    fn test_parse_build_args() {
        let cli = Cli::try_parse_from(["moriaforge", "-vv", "build", "Torches", "a.def", "b.def"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Build { mod_name, defs, config } => {
                assert_eq!(mod_name, "Torches");
                assert_eq!(defs.len(), 2);
                assert!(config.is_none());
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn test_parse_extract_and_config_check() {
        let cli = Cli::try_parse_from(["moriaforge", "extract", "--config", "forge.toml"]).unwrap();
        match cli.command {
            Commands::Extract { source, config } => {
                assert!(source.is_none());
                assert_eq!(config.as_deref(), Some(std::path::Path::new("forge.toml")));
            }
            _ => panic!("expected extract"),
        }

        let cli = Cli::try_parse_from(["moriaforge", "config", "check"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Check { path: None }
            }
        ));
    }
}
