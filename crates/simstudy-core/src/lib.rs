//! simstudy core - stratified sampling and duplicate resolution for
//! similarity user studies.
//!
//! Takes a pool of predicted-vs-ground-truth comparison rows and produces a
//! fixed-size sample that is balanced across (category, similarity level)
//! bins and free of semantically duplicate items:
//!
//! ```text
//! Pool CSV → Bin index → Stratified sampler → Duplicate resolver → Questions JSON
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use simstudy_core::{CandidatePool, Config, SimilarityLookup, StudyPipeline};
//!
//! let pipeline = StudyPipeline::new(Config::load()?);
//! let pool = CandidatePool::load("pool.csv".as_ref())?;
//! let outcome = pipeline.sample(pool.rows());
//! let mut rows = outcome.rows(pool.rows());
//!
//! let verbs = SimilarityLookup::load("verb_sim.csv".as_ref())?;
//! let objects = SimilarityLookup::load("object_sim.csv".as_ref())?;
//! let report = pipeline.resolve(&mut rows, &verbs, &objects);
//! ```

pub mod config;
pub mod dataset;
pub mod dedup;
pub mod error;
pub mod output;
pub mod questions;
pub mod report;
pub mod sampling;
pub mod synsets;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::{Config, UniquenessKey};
pub use dataset::{CandidatePool, ImageIdSummary, SimilarityLookup, Table, TOP_REPEATED_IDS};
pub use dedup::{find_collisions, CollisionGroup, DedupReport, DuplicateResolver};
pub use error::{ConfigError, DatasetError, DatasetResult, Result, StudyError};
pub use output::{OutputFormat, OutputWriter};
pub use questions::{GlossTable, QuestionBuilder};
pub use report::DistributionTable;
pub use sampling::{BinIndex, SampleOutcome, SampleReport, SamplerState, StratifiedSampler, UsedKeys};
pub use synsets::{MappingReport, SynsetMapper};
pub use types::{BinKey, CandidateRow, Question};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Seeded RNG when a seed is given, entropy-seeded otherwise.
pub fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Entry point tying the configured stages together.
pub struct StudyPipeline {
    config: Config,
}

impl StudyPipeline {
    pub fn new(config: Config) -> Self {
        tracing::debug!("Initializing simstudy v{}", VERSION);
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Draw a stratified sample from `rows`.
    ///
    /// Bin shuffling and the sampler share one RNG seeded from
    /// `sampling.seed`.
    pub fn sample(&self, rows: &[CandidateRow]) -> SampleOutcome {
        let sampling = &self.config.sampling;
        tracing::info!(
            "Sampling {} rows from {} candidates ({} bins, unique by {})",
            sampling.target_total,
            rows.len(),
            sampling.bin_count(),
            sampling.uniqueness.as_str()
        );

        ImageIdSummary::from_rows(rows, TOP_REPEATED_IDS).log();

        let mut rng = rng_from(sampling.seed);
        let index = BinIndex::build(
            rows,
            &sampling.categories,
            &sampling.similarity_levels,
            &mut rng,
        );
        let used = UsedKeys::new(sampling.uniqueness);
        let outcome = StratifiedSampler::new(rows, index, sampling, used).run();
        outcome.report.log();
        outcome
    }

    /// Replace duplicate rows in place using the similarity lookups.
    pub fn resolve(
        &self,
        rows: &mut [CandidateRow],
        verbs: &SimilarityLookup,
        objects: &SimilarityLookup,
    ) -> DedupReport {
        let mut rng = rng_from(self.config.dedup.seed);
        let report = DuplicateResolver::new(verbs, objects).resolve(rows, &mut rng);
        report.log();
        report
    }
}
