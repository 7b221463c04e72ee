//! Tabular inputs and outputs.
//!
//! - **table**: header-addressed CSV tables
//! - **pool**: typed candidate rows with passthrough columns
//! - **lookup**: symmetric synset similarity lookups

pub mod lookup;
pub mod pool;
pub mod table;

pub use lookup::SimilarityLookup;
pub use pool::{CandidatePool, Field, ImageIdSummary, TOP_REPEATED_IDS};
pub use table::Table;
