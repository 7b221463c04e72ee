//! Descriptive summaries of comparison tables.

pub mod distribution;

pub use distribution::{DistributionTable, REPORT_LEVELS};
