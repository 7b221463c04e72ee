//! Configuration management for simstudy.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. All config structs implement `Default` with the values used to
//! build the original 500-item study.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for simstudy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Stratified sampling settings
    pub sampling: SamplingConfig,

    /// Duplicate resolution settings
    pub dedup: DedupConfig,

    /// Question generation settings
    pub questions: QuestionsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.simstudy.simstudy/config.toml
    /// - Linux: ~/.config/simstudy/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\simstudy\config\config.toml
    ///
    /// Falls back to ~/.simstudy/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "simstudy", "simstudy")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".simstudy").join("config.toml")
            })
    }

    /// Resolved gloss table path (with ~ expansion), if one is configured.
    pub fn gloss_file(&self) -> Option<PathBuf> {
        self.questions.gloss_file.as_ref().map(|path| {
            let path_str = path.to_string_lossy();
            PathBuf::from(shellexpand::tilde(&path_str).into_owned())
        })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sampling.target_total, 500);
        assert_eq!(config.sampling.categories, vec![1, 2, 3]);
        assert_eq!(config.sampling.similarity_levels, vec![1, 2, 3, 4]);
        assert_eq!(config.sampling.max_idle_sweeps, 5);
        assert!(config.sampling.balance);
        assert!(config.sampling.seed.is_none());
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[sampling]"));
        assert!(toml.contains("[logging]"));
        assert!(toml.contains("uniqueness = \"ground_truth\""));
    }

    #[test]
    fn test_load_from_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sampling]").unwrap();
        writeln!(file, "target_total = 120").unwrap();
        writeln!(file, "uniqueness = \"image_id\"").unwrap();
        writeln!(file, "seed = 7").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.sampling.target_total, 120);
        assert_eq!(config.sampling.uniqueness, UniquenessKey::ImageId);
        assert_eq!(config.sampling.seed, Some(7));
        assert_eq!(config.sampling.categories, vec![1, 2, 3]);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sampling]").unwrap();
        writeln!(file, "target_total = 0").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("target_total"));
    }

    #[test]
    fn test_gloss_file_expands_tilde() {
        let mut config = Config::default();
        assert!(config.gloss_file().is_none());

        config.questions.gloss_file = Some(PathBuf::from("~/glosses.csv"));
        let resolved = config.gloss_file().unwrap();
        assert!(resolved.ends_with("glosses.csv"));
        if std::env::var_os("HOME").is_some() {
            assert!(!resolved.to_string_lossy().starts_with('~'));
        }
    }
}
