//! Sampling run summary.
//!
//! A shortfall is diagnostic output, not an error: the report names the
//! bins that stayed under quota and the caller decides what to do with it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::ImageIdSummary;
use crate::types::BinKey;

use super::sampler::SamplerState;

/// Per-bin outcome of a sampling run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinSummary {
    pub category: u8,
    pub level: u8,
    /// Rows of this bin in the source pool
    pub available: usize,
    /// Rows of this bin in the final sample
    pub selected: usize,
    /// Rows added beyond the targeted draw (backfill and balancing)
    pub fallbacks: usize,
}

impl BinSummary {
    pub fn key(&self) -> BinKey {
        BinKey::new(self.category, self.level)
    }
}

/// Summary of a finished sampling run.
#[derive(Debug, Clone, Serialize)]
pub struct SampleReport {
    pub state: SamplerState,
    pub target_total: usize,
    pub target_per_bin: usize,
    pub selected: usize,
    pub bins: Vec<BinSummary>,
    /// Bins whose final count is below `target_per_bin`
    pub under_target: Vec<BinKey>,
    pub backfill_sweeps: u32,
    pub swaps: usize,
    /// Largest |count - target_per_bin| before the balancing pass
    pub max_deviation_before_balance: usize,
    /// Largest |count - target_per_bin| in the final sample
    pub max_deviation: usize,
    pub category_counts: BTreeMap<u8, usize>,
    pub level_counts: BTreeMap<u8, usize>,
    /// Image id repetition in the candidate pool the sample was drawn from
    pub image_ids: ImageIdSummary,
}

impl SampleReport {
    /// Whether fewer rows than requested were collected.
    pub fn is_shortfall(&self) -> bool {
        self.selected < self.target_total
    }

    /// Emit the summary through `tracing`.
    pub fn log(&self) {
        tracing::info!(
            "Sampled {} of {} rows ({} per bin target, {} backfill sweeps, {} swaps)",
            self.selected,
            self.target_total,
            self.target_per_bin,
            self.backfill_sweeps,
            self.swaps
        );

        for (category, count) in &self.category_counts {
            tracing::info!("  category {}: {}", category, count);
        }
        for (level, count) in &self.level_counts {
            tracing::info!("  similarity {}: {}", level, count);
        }
        for bin in &self.bins {
            tracing::info!(
                "  bin {}: {} selected of {} available (+{} fallback)",
                bin.key(),
                bin.selected,
                bin.available,
                bin.fallbacks
            );
        }

        if !self.under_target.is_empty() {
            let names: Vec<String> = self.under_target.iter().map(|k| k.to_string()).collect();
            tracing::warn!(
                "{} bin(s) below the per-bin target of {}: {}",
                names.len(),
                self.target_per_bin,
                names.join(", ")
            );
        }
        if self.is_shortfall() {
            tracing::warn!(
                "Only collected {} unique rows of {} requested; some bins were too sparse",
                self.selected,
                self.target_total
            );
        }
    }
}
