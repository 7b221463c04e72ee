//! Sub-configuration structs with defaults matching the published study.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which columns make a sampled row unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniquenessKey {
    /// At most one row per source image
    ImageId,
    /// At most one row per (image, ground-truth verb synset, ground-truth object synset)
    #[default]
    GroundTruth,
}

impl UniquenessKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ImageId => "image_id",
            Self::GroundTruth => "ground_truth",
        }
    }
}

/// Stratified sampling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Number of rows the sample should contain
    pub target_total: usize,

    /// Category values to stratify over, in sweep order
    pub categories: Vec<u8>,

    /// Similarity levels to stratify over, in sweep order
    pub similarity_levels: Vec<u8>,

    /// Uniqueness constraint applied across the whole sample
    pub uniqueness: UniquenessKey,

    /// Consecutive backfill sweeps without progress before giving up
    pub max_idle_sweeps: u32,

    /// Swap rows from overfull into underfull bins after backfilling
    pub balance: bool,

    /// Seed for bin shuffles (random when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            target_total: 500,
            categories: vec![1, 2, 3],
            similarity_levels: vec![1, 2, 3, 4],
            uniqueness: UniquenessKey::GroundTruth,
            max_idle_sweeps: 5,
            balance: true,
            seed: None,
        }
    }
}

impl SamplingConfig {
    /// Number of (category, level) bins in the stratification domain.
    pub fn bin_count(&self) -> usize {
        self.categories.len() * self.similarity_levels.len()
    }

    /// Per-bin quota, rounded down.
    pub fn target_per_bin(&self) -> usize {
        match self.bin_count() {
            0 => 0,
            bins => self.target_total / bins,
        }
    }
}

/// Duplicate resolution settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Seed for replacement candidate order (random when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Question generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionsConfig {
    /// Answer labels shown for every question, lowest similarity first
    pub choices: Vec<String>,

    /// Optional `synset,definition` table used to render definitions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gloss_file: Option<PathBuf>,
}

impl Default for QuestionsConfig {
    fn default() -> Self {
        Self {
            choices: vec![
                "0 = ... a completely dissimilar interaction".to_string(),
                "1 = ... a somewhat related but clearly distinct interaction".to_string(),
                "2 = ... a related interaction but it is easily distinguishable".to_string(),
                "3 = ... a very similar interaction with subtle differences".to_string(),
                "4 = ... an interaction that you would use interchangeably or synonymous with the ground truth".to_string(),
            ],
            gloss_file: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_per_bin_rounds_down() {
        let config = SamplingConfig::default();
        assert_eq!(config.bin_count(), 12);
        assert_eq!(config.target_per_bin(), 41);
    }

    #[test]
    fn target_per_bin_empty_domain() {
        let config = SamplingConfig {
            categories: vec![],
            ..SamplingConfig::default()
        };
        assert_eq!(config.target_per_bin(), 0);
    }

    #[test]
    fn default_choices_cover_five_levels() {
        let config = QuestionsConfig::default();
        assert_eq!(config.choices.len(), 5);
        for (i, choice) in config.choices.iter().enumerate() {
            assert!(choice.starts_with(&i.to_string()));
        }
    }
}
