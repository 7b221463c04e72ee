//! Configuration validation with range checks.

use std::collections::HashSet;

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sampling = &self.sampling;
        if sampling.target_total == 0 {
            return Err(ConfigError::ValidationError(
                "sampling.target_total must be > 0".into(),
            ));
        }
        if sampling.categories.is_empty() {
            return Err(ConfigError::ValidationError(
                "sampling.categories must not be empty".into(),
            ));
        }
        if sampling.similarity_levels.is_empty() {
            return Err(ConfigError::ValidationError(
                "sampling.similarity_levels must not be empty".into(),
            ));
        }
        if has_repeats(&sampling.categories) {
            return Err(ConfigError::ValidationError(
                "sampling.categories must not repeat a value".into(),
            ));
        }
        if has_repeats(&sampling.similarity_levels) {
            return Err(ConfigError::ValidationError(
                "sampling.similarity_levels must not repeat a value".into(),
            ));
        }
        if sampling.max_idle_sweeps == 0 {
            return Err(ConfigError::ValidationError(
                "sampling.max_idle_sweeps must be > 0".into(),
            ));
        }
        if self.questions.choices.is_empty() {
            return Err(ConfigError::ValidationError(
                "questions.choices must not be empty".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        Ok(())
    }
}

fn has_repeats(values: &[u8]) -> bool {
    let mut seen = HashSet::new();
    values.iter().any(|v| !seen.insert(*v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_target() {
        let mut config = Config::default();
        config.sampling.target_total = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("target_total"));
    }

    #[test]
    fn test_validate_accepts_target_below_bin_count() {
        let mut config = Config::default();
        config.sampling.target_total = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_repeated_levels() {
        let mut config = Config::default();
        config.sampling.similarity_levels = vec![1, 2, 2];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("similarity_levels"));
    }

    #[test]
    fn test_validate_rejects_zero_idle_sweeps() {
        let mut config = Config::default();
        config.sampling.max_idle_sweeps = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_idle_sweeps"));
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.format"));
    }
}
