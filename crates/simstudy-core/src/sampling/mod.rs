//! Stratified sampling of the candidate pool.
//!
//! - **bins**: partition rows by (category, similarity level) and shuffle
//! - **keys**: uniqueness keys and the run's used-key set
//! - **sampler**: the three-pass sampling state machine
//! - **report**: per-bin summary and shortfall diagnostics

pub mod bins;
pub mod keys;
pub mod report;
pub mod sampler;

pub use bins::BinIndex;
pub use keys::{RowKey, UsedKeys};
pub use report::{BinSummary, SampleReport};
pub use sampler::{SampleOutcome, SamplerState, StratifiedSampler};
