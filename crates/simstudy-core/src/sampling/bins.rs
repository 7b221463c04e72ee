//! Bin indexing: partition the candidate pool by (category, similarity level).

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{BinKey, CandidateRow};

/// Shuffled row indices for every bin in the stratification domain.
///
/// Bins are read-only views over the pool: they hold indices, not rows.
#[derive(Debug, Clone)]
pub struct BinIndex {
    order: Vec<BinKey>,
    members: BTreeMap<BinKey, Vec<usize>>,
}

impl BinIndex {
    /// Group rows into bins and shuffle each bin independently.
    ///
    /// Every (category, level) pair of the domain gets an entry, possibly
    /// empty. Rows whose category or level falls outside the domain are
    /// not indexed.
    pub fn build<R: Rng + ?Sized>(
        rows: &[CandidateRow],
        categories: &[u8],
        levels: &[u8],
        rng: &mut R,
    ) -> Self {
        let order: Vec<BinKey> = categories
            .iter()
            .flat_map(|&c| levels.iter().map(move |&l| BinKey::new(c, l)))
            .collect();

        let mut members: BTreeMap<BinKey, Vec<usize>> =
            order.iter().map(|key| (*key, Vec::new())).collect();
        let mut outside = 0usize;
        for (idx, row) in rows.iter().enumerate() {
            match members.get_mut(&row.bin()) {
                Some(bin) => bin.push(idx),
                None => outside += 1,
            }
        }

        for key in &order {
            if let Some(bin) = members.get_mut(key) {
                bin.shuffle(rng);
            }
        }

        let index = Self { order, members };
        index.log_sizes(outside);
        index
    }

    fn log_sizes(&self, outside: usize) {
        let mut sizes = self.sizes();
        sizes.sort_by_key(|(key, size)| (*size, *key));
        tracing::info!(
            "Indexed {} rows into {} bins ({} rows outside the sampled domain)",
            self.indexed_rows(),
            sizes.len(),
            outside
        );
        for (key, size) in sizes {
            tracing::info!("  bin {}: {} rows", key, size);
        }
    }

    /// Fixed sweep order: categories, then levels, as configured.
    pub fn order(&self) -> &[BinKey] {
        &self.order
    }

    /// Shuffled member indices of a bin (empty for unknown bins).
    pub fn members(&self, key: BinKey) -> &[usize] {
        self.members.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Bin sizes in sweep order.
    pub fn sizes(&self) -> Vec<(BinKey, usize)> {
        self.order
            .iter()
            .map(|key| (*key, self.members(*key).len()))
            .collect()
    }

    /// Total rows indexed across all bins.
    pub fn indexed_rows(&self) -> usize {
        self.members.values().map(Vec::len).sum()
    }
}
