//! Configuration types and loading

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

/// Engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Debug dump configuration
    pub dump: DumpConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early so misconfiguration fails with a clear message
    /// instead of surfacing mid-run.
    pub fn validate(&self) -> Result<()> {
        if self.dump.enabled && self.dump.dir.as_os_str().is_empty() {
            return Err(eyre::eyre!("dump.enabled is set but dump.dir is empty"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    ///
    /// Checks in order: explicit path, project-local `.fusionchain.yml`,
    /// user config `~/.config/fusionchain/fusionchain.yml`, then defaults.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let local_config = PathBuf::from(".fusionchain.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("fusionchain").join("fusionchain.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Debug dump configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    /// Whether chain artifacts are dumped at all
    pub enabled: bool,

    /// Directory dump files are written under
    pub dir: PathBuf,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: PathBuf::from("fusion-dumps"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.dump.enabled);
        assert_eq!(config.dump.dir, PathBuf::from("fusion-dumps"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_explicit_file() {
        let tmp = TempDir::new().expect("temp dir");
        let path = tmp.path().join("config.yml");
        fs::write(&path, "dump:\n  enabled: true\n  dir: /tmp/chains\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(config.dump.enabled);
        assert_eq!(config.dump.dir, PathBuf::from("/tmp/chains"));
    }

    #[test]
    fn test_load_explicit_missing_file_errors() {
        let path = PathBuf::from("/nonexistent/fusionchain.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_invalid_yaml_errors() {
        let tmp = TempDir::new().expect("temp dir");
        let path = tmp.path().join("config.yml");
        fs::write(&path, "dump: [not, a, mapping").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let tmp = TempDir::new().expect("temp dir");
        let path = tmp.path().join("config.yml");
        fs::write(&path, "dump:\n  enabled: true\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(config.dump.enabled);
        // dir falls back to the default
        assert_eq!(config.dump.dir, PathBuf::from("fusion-dumps"));
    }

    #[test]
    fn test_validate_rejects_empty_dump_dir() {
        let config = Config {
            dump: DumpConfig {
                enabled: true,
                dir: PathBuf::new(),
            },
        };
        assert!(config.validate().is_err());
    }
}
