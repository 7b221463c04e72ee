//! Symmetric synset similarity lookups.
//!
//! Built from `(synset_1, synset_2, majority_score)` tables. Each pair is
//! recorded in both directions, keyed by the score truncated to an integer
//! level, so a lookup answers "which synsets sit at level N from this one".

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::DatasetResult;

use super::table::Table;

/// Synset → level → synsets at that level.
#[derive(Debug, Clone, Default)]
pub struct SimilarityLookup {
    entries: HashMap<String, BTreeMap<i64, Vec<String>>>,
    pairs: usize,
    skipped: usize,
}

impl SimilarityLookup {
    /// Load a lookup from a CSV file.
    pub fn load(path: &Path) -> DatasetResult<Self> {
        let table = Table::read(path)?;
        let lookup = Self::from_table(&table)?;
        tracing::info!(
            "Loaded similarity lookup from {:?}: {} pairs, {} synsets, {} rows without score",
            path,
            lookup.pairs,
            lookup.entries.len(),
            lookup.skipped
        );
        Ok(lookup)
    }

    /// Build a lookup from an already-read table.
    ///
    /// Rows with an empty or `NaN` score are dropped. Any other unparseable
    /// score is a load failure.
    pub fn from_table(table: &Table) -> DatasetResult<Self> {
        let first = table.require_column("synset_1")?;
        let second = table.require_column("synset_2")?;
        let score_col = table.require_column("majority_score")?;

        let mut lookup = Self::default();
        for (i, record) in table.records().iter().enumerate() {
            let raw = record[score_col].trim();
            if is_missing(raw) {
                lookup.skipped += 1;
                continue;
            }
            let score: f64 = raw
                .parse()
                .ok()
                .filter(|s: &f64| s.is_finite())
                .ok_or_else(|| table.invalid_value(i, "majority_score", raw))?;

            lookup.insert(&record[first], &record[second], score.trunc() as i64);
        }
        Ok(lookup)
    }

    /// Record a symmetric pair at the given level.
    pub fn insert(&mut self, a: &str, b: &str, level: i64) {
        self.entries
            .entry(a.to_string())
            .or_default()
            .entry(level)
            .or_default()
            .push(b.to_string());
        self.entries
            .entry(b.to_string())
            .or_default()
            .entry(level)
            .or_default()
            .push(a.to_string());
        self.pairs += 1;
    }

    /// Synsets at `level` from `synset`, in insertion order.
    pub fn candidates(&self, synset: &str, level: i64) -> &[String] {
        self.entries
            .get(synset)
            .and_then(|levels| levels.get(&level))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of pairs recorded.
    pub fn pair_count(&self) -> usize {
        self.pairs
    }

    /// Number of rows dropped for a missing score.
    pub fn skipped_count(&self) -> usize {
        self.skipped
    }
}

fn is_missing(raw: &str) -> bool {
    raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("na")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DatasetError;

    fn lookup_from(data: &str) -> DatasetResult<SimilarityLookup> {
        let table = Table::from_reader(data.as_bytes(), Path::new("sim.csv"))?;
        SimilarityLookup::from_table(&table)
    }

    #[test]
    fn pairs_are_symmetric() {
        let lookup = lookup_from("synset_1,synset_2,majority_score\nhorse.n.01,pony.n.01,3\n").unwrap();
        assert_eq!(lookup.candidates("horse.n.01", 3), &["pony.n.01".to_string()]);
        assert_eq!(lookup.candidates("pony.n.01", 3), &["horse.n.01".to_string()]);
        assert_eq!(lookup.pair_count(), 1);
    }

    #[test]
    fn fractional_scores_truncate() {
        let lookup = lookup_from("synset_1,synset_2,majority_score\na,b,2.9\nc,d,0.4\n").unwrap();
        assert_eq!(lookup.candidates("a", 2).len(), 1);
        assert!(lookup.candidates("a", 3).is_empty());
        assert_eq!(lookup.candidates("d", 0), &["c".to_string()]);
    }

    #[test]
    fn missing_scores_are_dropped() {
        let lookup = lookup_from("synset_1,synset_2,majority_score\na,b,\nc,d,NaN\ne,f,1\n").unwrap();
        assert_eq!(lookup.pair_count(), 1);
        assert_eq!(lookup.skipped_count(), 2);
        assert!(lookup.candidates("a", 0).is_empty());
    }

    #[test]
    fn unparseable_score_is_fatal() {
        let err = lookup_from("synset_1,synset_2,majority_score\na,b,very\n").unwrap_err();
        assert!(matches!(err, DatasetError::InvalidValue { line: 2, .. }));
    }

    #[test]
    fn unknown_synset_has_no_candidates() {
        let lookup = SimilarityLookup::default();
        assert!(lookup.candidates("ghost.n.01", 1).is_empty());
    }

    #[test]
    fn missing_score_column_is_fatal() {
        let err = lookup_from("synset_1,synset_2\na,b\n").unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn { .. }));
    }
}
