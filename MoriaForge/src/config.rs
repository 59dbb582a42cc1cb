//! Toolkit configuration (config.toml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

const APP_DIR: &str = "MoriaForge";
const CONFIG_FILE: &str = "config.toml";
const RETOC_DIR: &str = "retoc";

fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn default_utilities_dir() -> PathBuf {
    app_data_dir().join("utilities")
}

fn default_jsondata_dir() -> PathBuf {
    app_data_dir().join("output").join("jsondata")
}

fn default_mymodfiles_dir() -> PathBuf {
    app_data_dir().join("mymodfiles")
}

fn default_output_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_converter_exe() -> String {
    "UAssetGUI.exe".to_string()
}

fn default_repackager_exe() -> String {
    "retoc.exe".to_string()
}

fn default_converter_engine_version() -> String {
    "VER_UE4_27".to_string()
}

fn default_repackager_engine_version() -> String {
    "UE4_27".to_string()
}

fn default_tool_timeout_secs() -> u64 {
    60
}

/// Paths and external tool settings for building mods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgeConfig {
    /// Directory holding the converter and repackager executables
    #[serde(default = "default_utilities_dir")]
    pub utilities_dir: PathBuf,
    /// Baseline JSON exports, mirroring the game's content tree
    #[serde(default = "default_jsondata_dir")]
    pub jsondata_dir: PathBuf,
    /// Per-mod working directories
    #[serde(default = "default_mymodfiles_dir")]
    pub mymodfiles_dir: PathBuf,
    /// Where finished mod archives are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_converter_exe")]
    pub converter_exe: String,
    #[serde(default = "default_repackager_exe")]
    pub repackager_exe: String,
    /// Engine version passed to `fromjson`
    #[serde(default = "default_converter_engine_version")]
    pub converter_engine_version: String,
    /// Engine version passed to `to-zen --version`
    #[serde(default = "default_repackager_engine_version")]
    pub repackager_engine_version: String,
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            utilities_dir: default_utilities_dir(),
            jsondata_dir: default_jsondata_dir(),
            mymodfiles_dir: default_mymodfiles_dir(),
            output_dir: default_output_dir(),
            converter_exe: default_converter_exe(),
            repackager_exe: default_repackager_exe(),
            converter_engine_version: default_converter_engine_version(),
            repackager_engine_version: default_repackager_engine_version(),
            tool_timeout_secs: default_tool_timeout_secs(),
        }
    }
}

impl ForgeConfig {
    /// Default config file location: `<config dir>/MoriaForge/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or(Error::ConfigDirUnavailable)
    }

    /// Load a config file; missing fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load a config file, or the defaults if it does not exist yet
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save the config, creating parent directories as needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn converter_path(&self) -> PathBuf {
        self.utilities_dir.join(&self.converter_exe)
    }

    pub fn repackager_path(&self) -> PathBuf {
        self.utilities_dir.join(&self.repackager_exe)
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    /// Where repackaged game files are unpacked before extraction
    pub fn retoc_dir(&self) -> PathBuf {
        self.output_dir.join(RETOC_DIR)
    }

    /// Check that the tools exist and the writable directories can be created.
    ///
    /// Returns one message per problem; an empty list means the config is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.utilities_dir.is_dir() {
            for tool in [self.converter_path(), self.repackager_path()] {
                if !tool.is_file() {
                    issues.push(format!("Required utility not found: {}", tool.display()));
                }
            }
        } else {
            issues.push(format!(
                "Utilities directory not found: {}",
                self.utilities_dir.display()
            ));
        }

        if !self.jsondata_dir.is_dir() {
            issues.push(format!(
                "Baseline JSON directory not found: {}",
                self.jsondata_dir.display()
            ));
        }

        for (label, dir) in [("output", &self.output_dir), ("mod files", &self.mymodfiles_dir)] {
            if let Err(e) = fs::create_dir_all(dir) {
                issues.push(format!("Cannot create {label} directory {}: {e}", dir.display()));
            }
        }

        for issue in &issues {
            tracing::debug!("Config issue: {}", issue);
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = ForgeConfig {
            utilities_dir: PathBuf::from("/opt/moria/utilities"),
            tool_timeout_secs: 5,
            ..ForgeConfig::default()
        };
        config.save(&path).unwrap();

        assert_eq!(ForgeConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let parsed: ForgeConfig = toml::from_str(r#"converter_exe = "UAssetCLI""#).unwrap();

        assert_eq!(parsed.converter_exe, "UAssetCLI");
        assert_eq!(parsed.repackager_exe, "retoc.exe");
        assert_eq!(parsed.converter_engine_version, "VER_UE4_27");
        assert_eq!(parsed.repackager_engine_version, "UE4_27");
        assert_eq!(parsed.tool_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ForgeConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ForgeConfig::default());
    }

    #[test]
    fn test_tool_paths() {
        let config = ForgeConfig {
            utilities_dir: PathBuf::from("tools"),
            ..ForgeConfig::default()
        };
        assert_eq!(config.converter_path(), Path::new("tools").join("UAssetGUI.exe"));
        assert_eq!(config.repackager_path(), Path::new("tools").join("retoc.exe"));
    }

    fn config_in(root: &Path) -> ForgeConfig {
        ForgeConfig {
            utilities_dir: root.join("utilities"),
            jsondata_dir: root.join("jsondata"),
            mymodfiles_dir: root.join("mymodfiles"),
            output_dir: root.join("out"),
            ..ForgeConfig::default()
        }
    }

    #[test]
    fn test_validate_complete_setup() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        fs::create_dir_all(&config.utilities_dir).unwrap();
        fs::create_dir_all(&config.jsondata_dir).unwrap();
        fs::write(config.converter_path(), "").unwrap();
        fs::write(config.repackager_path(), "").unwrap();

        assert_eq!(config.validate(), Vec::<String>::new());
        assert!(config.output_dir.is_dir());
        assert!(config.mymodfiles_dir.is_dir());
    }

    #[test]
    fn test_validate_missing_utilities_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        fs::create_dir_all(&config.jsondata_dir).unwrap();

        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].starts_with("Utilities directory not found"));
    }

    #[test]
    fn test_validate_missing_tools() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        fs::create_dir_all(&config.utilities_dir).unwrap();
        fs::write(config.repackager_path(), "").unwrap();

        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues[0].starts_with("Required utility not found"));
        assert!(issues[0].contains("UAssetGUI.exe"));
        assert!(issues[1].starts_with("Baseline JSON directory not found"));
    }

    #[test]
    fn test_validate_uncreatable_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        fs::create_dir_all(&config.utilities_dir).unwrap();
        fs::create_dir_all(&config.jsondata_dir).unwrap();
        fs::write(config.converter_path(), "").unwrap();
        fs::write(config.repackager_path(), "").unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        config.output_dir = blocker.join("out");

        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].starts_with("Cannot create output directory"));
    }

    #[test]
    fn test_retoc_dir() {
        let config = ForgeConfig {
            output_dir: PathBuf::from("out"),
            ..ForgeConfig::default()
        };
        assert_eq!(config.retoc_dir(), Path::new("out").join("retoc"));
    }
}
