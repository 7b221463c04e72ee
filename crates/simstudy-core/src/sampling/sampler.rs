//! Stratified, duplicate-free sampling.
//!
//! The sampler is a small state machine driven by [`StratifiedSampler::step`]:
//!
//! ```text
//! FillingTargeted → Backfilling ─┬→ Balancing → Done | Shortfall
//!                                └→ Done | Shortfall        (balance off)
//! ```
//!
//! - **FillingTargeted**: each bin, in sweep order, contributes up to
//!   `target_per_bin` rows whose uniqueness key is still free.
//! - **Backfilling**: sweeps all bins taking at most one extra row per bin
//!   per sweep until the total target is met or `max_idle_sweeps`
//!   consecutive sweeps add nothing.
//! - **Balancing**: moves one row per step from an overfull bin to an
//!   underfull one while such a pair exists. The outgoing row is the
//!   overfull bin's latest pick when the underfull bin has a free row, or
//!   else an earlier pick whose key is the one blocking a row of the
//!   underfull bin. Every swap lowers one surplus and one deficit, so the
//!   largest deviation from the per-bin target never grows.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::SamplingConfig;
use crate::dataset::{ImageIdSummary, TOP_REPEATED_IDS};
use crate::types::{BinKey, CandidateRow};

use super::bins::BinIndex;
use super::keys::UsedKeys;
use super::report::{BinSummary, SampleReport};

/// Phase of a sampling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplerState {
    FillingTargeted,
    Backfilling,
    Balancing,
    /// The total target was reached
    Done,
    /// The pool ran out of unique rows before the total target
    Shortfall,
}

impl SamplerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Shortfall)
    }
}

/// Result of a finished sampling run.
#[derive(Debug, Clone)]
pub struct SampleOutcome {
    /// Pool indices of the sampled rows, in selection order
    pub selected: Vec<usize>,
    pub report: SampleReport,
    /// Keys of the sampled rows
    pub used: UsedKeys,
}

impl SampleOutcome {
    /// Clone the sampled rows out of the pool they were drawn from.
    pub fn rows(&self, pool: &[CandidateRow]) -> Vec<CandidateRow> {
        self.selected.iter().map(|&i| pool[i].clone()).collect()
    }
}

/// Three-pass stratified sampler over a [`BinIndex`].
pub struct StratifiedSampler<'a> {
    rows: &'a [CandidateRow],
    index: BinIndex,
    target_total: usize,
    target_per_bin: usize,
    max_idle_sweeps: u32,
    balance: bool,
    used: UsedKeys,
    state: SamplerState,
    /// Pool indices in selection order
    selected: Vec<usize>,
    /// Positions in `selected` held by each bin, oldest first
    positions: BTreeMap<BinKey, Vec<usize>>,
    fallbacks: BTreeMap<BinKey, usize>,
    idle_sweeps: u32,
    backfill_sweeps: u32,
    swaps: usize,
    deviation_before_balance: Option<usize>,
}

impl<'a> StratifiedSampler<'a> {
    /// Create a sampler over `rows` using a prebuilt (shuffled) index.
    ///
    /// `used` is the run's key set; it may already hold keys that must not be
    /// drawn, and its kind decides which uniqueness constraint applies.
    pub fn new(
        rows: &'a [CandidateRow],
        index: BinIndex,
        config: &SamplingConfig,
        used: UsedKeys,
    ) -> Self {
        let positions = index.order().iter().map(|k| (*k, Vec::new())).collect();
        let fallbacks = index.order().iter().map(|k| (*k, 0)).collect();
        Self {
            rows,
            index,
            target_total: config.target_total,
            target_per_bin: config.target_per_bin(),
            max_idle_sweeps: config.max_idle_sweeps.max(1),
            balance: config.balance,
            used,
            state: SamplerState::FillingTargeted,
            selected: Vec::new(),
            positions,
            fallbacks,
            idle_sweeps: 0,
            backfill_sweeps: 0,
            swaps: 0,
            deviation_before_balance: None,
        }
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    /// Rows selected so far.
    pub fn selected_len(&self) -> usize {
        self.selected.len()
    }

    /// Current count of a bin.
    pub fn count(&self, key: BinKey) -> usize {
        self.positions.get(&key).map(Vec::len).unwrap_or(0)
    }

    /// Largest |count - target_per_bin| over all bins.
    pub fn max_deviation(&self) -> usize {
        self.index
            .order()
            .iter()
            .map(|k| self.count(*k).abs_diff(self.target_per_bin))
            .max()
            .unwrap_or(0)
    }

    /// Advance by one unit of work and return the new state.
    ///
    /// A unit is the whole targeted pass, one backfill sweep, or one
    /// balancing swap. Terminal states are absorbing.
    pub fn step(&mut self) -> SamplerState {
        self.state = match self.state {
            SamplerState::FillingTargeted => {
                self.fill_targeted();
                SamplerState::Backfilling
            }
            SamplerState::Backfilling => {
                if self.selected.len() >= self.target_total
                    || self.idle_sweeps >= self.max_idle_sweeps
                {
                    self.after_backfill()
                } else {
                    self.backfill_sweep();
                    SamplerState::Backfilling
                }
            }
            SamplerState::Balancing => {
                if self.balance_once() {
                    SamplerState::Balancing
                } else {
                    self.terminal()
                }
            }
            terminal => terminal,
        };
        self.state
    }

    /// Step until a terminal state and summarize the run.
    pub fn run(mut self) -> SampleOutcome {
        while !self.state.is_terminal() {
            self.step();
        }
        let report = self.report();
        SampleOutcome {
            selected: self.selected,
            report,
            used: self.used,
        }
    }

    fn fill_targeted(&mut self) {
        let order = self.index.order().to_vec();
        for key in order {
            while self.count(key) < self.target_per_bin {
                match self.next_free(key) {
                    Some(idx) => self.take(key, idx),
                    None => break,
                }
            }
        }
        tracing::info!(
            "Targeted pass selected {} rows ({} per bin)",
            self.selected.len(),
            self.target_per_bin
        );
    }

    fn backfill_sweep(&mut self) {
        self.backfill_sweeps += 1;
        let mut added = 0;
        let order = self.index.order().to_vec();
        for key in order {
            if self.selected.len() >= self.target_total {
                break;
            }
            if let Some(idx) = self.next_free(key) {
                self.take(key, idx);
                *self.fallbacks.entry(key).or_insert(0) += 1;
                added += 1;
            }
        }

        if added == 0 {
            self.idle_sweeps += 1;
            tracing::warn!(
                "No new samples added in backfill sweep ({}/{} idle)",
                self.idle_sweeps,
                self.max_idle_sweeps
            );
        } else {
            self.idle_sweeps = 0;
            tracing::debug!("Backfill sweep added {} rows", added);
        }
    }

    fn after_backfill(&mut self) -> SamplerState {
        if self.balance {
            self.deviation_before_balance = Some(self.max_deviation());
            SamplerState::Balancing
        } else {
            self.terminal()
        }
    }

    /// Perform one beneficial swap. Returns `false` when none exists.
    ///
    /// Overfull bins are tried most-overfull first, underfull bins
    /// most-underfull first.
    fn balance_once(&mut self) -> bool {
        let target = self.target_per_bin;

        let mut under: Vec<BinKey> = self
            .index
            .order()
            .iter()
            .copied()
            .filter(|k| self.count(*k) < target)
            .collect();
        under.sort_by_key(|k| self.count(*k));

        let mut over: Vec<BinKey> = self
            .index
            .order()
            .iter()
            .copied()
            .filter(|k| self.count(*k) > target)
            .collect();
        over.sort_by_key(|k| std::cmp::Reverse(self.count(*k)));

        for &from in &over {
            for &to in &under {
                if let Some((slot, candidate)) = self.find_swap(from, to) {
                    self.swap(from, to, slot, candidate);
                    return true;
                }
            }
        }
        false
    }

    /// A (slot in `from`, row of `to`) pair that can trade places.
    ///
    /// The latest-selected row of `from` pairs with any free row of `to`.
    /// Failing that, an earlier row of `from` qualifies when its key is the
    /// one blocking a row of `to`: releasing it frees that row.
    fn find_swap(&self, from: BinKey, to: BinKey) -> Option<(usize, usize)> {
        let slots = self.positions.get(&from)?;
        let latest = slots.len().checked_sub(1)?;
        if let Some(candidate) = self.next_free(to) {
            return Some((latest, candidate));
        }

        let kind = self.used.kind();
        (0..slots.len()).rev().find_map(|slot| {
            let outgoing = kind.key_of(&self.rows[self.selected[slots[slot]]]);
            self.index
                .members(to)
                .iter()
                .copied()
                .find(|&idx| kind.key_of(&self.rows[idx]) == outgoing)
                .map(|candidate| (slot, candidate))
        })
    }

    fn swap(&mut self, from: BinKey, to: BinKey, slot: usize, candidate: usize) {
        let Some(pos) = self
            .positions
            .get_mut(&from)
            .filter(|slots| slot < slots.len())
            .map(|slots| slots.remove(slot))
        else {
            return;
        };
        let outgoing = self.selected[pos];
        self.used.remove(&self.rows[outgoing]);
        self.used.insert(&self.rows[candidate]);
        self.selected[pos] = candidate;
        self.positions.entry(to).or_default().push(pos);
        *self.fallbacks.entry(to).or_insert(0) += 1;
        self.swaps += 1;
        tracing::debug!("Swapped a row from bin {} into bin {}", from, to);
    }

    fn terminal(&self) -> SamplerState {
        if self.selected.len() >= self.target_total {
            SamplerState::Done
        } else {
            SamplerState::Shortfall
        }
    }

    /// First row of the bin, in shuffled order, whose key is still free.
    fn next_free(&self, key: BinKey) -> Option<usize> {
        self.index
            .members(key)
            .iter()
            .copied()
            .find(|&idx| !self.used.contains(&self.rows[idx]))
    }

    fn take(&mut self, key: BinKey, idx: usize) {
        self.used.insert(&self.rows[idx]);
        self.positions.entry(key).or_default().push(self.selected.len());
        self.selected.push(idx);
    }

    fn report(&self) -> SampleReport {
        let bins: Vec<BinSummary> = self
            .index
            .sizes()
            .into_iter()
            .map(|(key, available)| BinSummary {
                category: key.category,
                level: key.level,
                available,
                selected: self.count(key),
                fallbacks: self.fallbacks.get(&key).copied().unwrap_or(0),
            })
            .collect();

        let under_target = bins
            .iter()
            .filter(|b| b.selected < self.target_per_bin)
            .map(BinSummary::key)
            .collect();

        let mut category_counts = BTreeMap::new();
        let mut level_counts = BTreeMap::new();
        for &idx in &self.selected {
            let row = &self.rows[idx];
            *category_counts.entry(row.category).or_insert(0) += 1;
            *level_counts.entry(row.similarity_level).or_insert(0) += 1;
        }

        let max_deviation = self.max_deviation();
        SampleReport {
            state: self.state,
            target_total: self.target_total,
            target_per_bin: self.target_per_bin,
            selected: self.selected.len(),
            bins,
            under_target,
            backfill_sweeps: self.backfill_sweeps,
            swaps: self.swaps,
            max_deviation_before_balance: self.deviation_before_balance.unwrap_or(max_deviation),
            max_deviation,
            category_counts,
            level_counts,
            image_ids: ImageIdSummary::from_rows(self.rows, TOP_REPEATED_IDS),
        }
    }
}
