//! Duplicate resolution by same-bin substitution.
//!
//! The first row carrying a signature is kept. Each later row with the same
//! signature gets new predicted synsets drawn from the similarity lookups at
//! the row's own similarity level, so category and level (and therefore bin
//! membership) never change.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::dataset::SimilarityLookup;
use crate::types::{BinKey, CandidateRow};

use super::signature::Signature;

/// A duplicate for which no unused alternative existed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedDuplicate {
    /// Zero-based row position in the input
    pub row: usize,
    pub bin: BinKey,
}

/// Summary of a resolution run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DedupReport {
    pub rows: usize,
    pub total_duplicates: usize,
    pub replaced: usize,
    pub unresolved: Vec<UnresolvedDuplicate>,
}

impl DedupReport {
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
    }

    pub fn log(&self) {
        tracing::info!(
            "Replaced {}/{} duplicates across {} rows",
            self.replaced,
            self.total_duplicates,
            self.rows
        );
        if !self.unresolved.is_empty() {
            tracing::warn!(
                "{} duplicate(s) left unchanged for lack of a same-bin alternative",
                self.unresolved.len()
            );
        }
    }
}

/// Find a same-bin variant of `row` whose signature is not in `used`.
///
/// Dispatches on category: 1 swaps the predicted object, 2 the predicted
/// verb, 3 both (first unused verb × object combination). Candidates are
/// tried in shuffled order. Other categories have no replacement policy.
pub fn find_replacement<R: Rng + ?Sized>(
    row: &CandidateRow,
    used: &HashSet<Signature>,
    verbs: &SimilarityLookup,
    objects: &SimilarityLookup,
    rng: &mut R,
) -> Option<CandidateRow> {
    let level = i64::from(row.similarity_level);

    let (pred_verb, pred_object) = match row.category {
        1 => {
            let object_candidates =
                shuffled(objects.candidates(&row.gt_object_synset, level), rng);
            let object = object_candidates.into_iter().find(|o| {
                !used.contains(&Signature::with_predictions(row, &row.pred_verb_synset, o))
            })?;
            (row.pred_verb_synset.clone(), object)
        }
        2 => {
            let verb_candidates = shuffled(verbs.candidates(&row.gt_verb_synset, level), rng);
            let verb = verb_candidates.into_iter().find(|v| {
                !used.contains(&Signature::with_predictions(row, v, &row.pred_object_synset))
            })?;
            (verb, row.pred_object_synset.clone())
        }
        3 => {
            let verb_candidates = shuffled(verbs.candidates(&row.gt_verb_synset, level), rng);
            let object_candidates =
                shuffled(objects.candidates(&row.gt_object_synset, level), rng);
            verb_candidates.iter().find_map(|v| {
                object_candidates
                    .iter()
                    .find(|o| !used.contains(&Signature::with_predictions(row, v, o)))
                    .map(|o| (v.clone(), o.clone()))
            })?
        }
        _ => return None,
    };

    let mut replacement = row.clone();
    replacement.pred_verb_synset = pred_verb;
    replacement.pred_object_synset = pred_object;
    Some(replacement)
}

fn shuffled<R: Rng + ?Sized>(candidates: &[String], rng: &mut R) -> Vec<String> {
    let mut candidates = candidates.to_vec();
    candidates.shuffle(rng);
    candidates
}

/// Replaces signature collisions using verb and object similarity lookups.
pub struct DuplicateResolver<'a> {
    verbs: &'a SimilarityLookup,
    objects: &'a SimilarityLookup,
}

impl<'a> DuplicateResolver<'a> {
    pub fn new(verbs: &'a SimilarityLookup, objects: &'a SimilarityLookup) -> Self {
        Self { verbs, objects }
    }

    /// Resolve duplicates in place.
    ///
    /// Row count and order are preserved. Rows that cannot be resolved stay
    /// as they are and are listed in the report.
    pub fn resolve<R: Rng + ?Sized>(&self, rows: &mut [CandidateRow], rng: &mut R) -> DedupReport {
        let mut used = HashSet::new();
        let mut duplicates = Vec::new();
        for (idx, row) in rows.iter().enumerate() {
            if !used.insert(Signature::of(row)) {
                duplicates.push(idx);
            }
        }
        tracing::info!("Found {} duplicates to replace", duplicates.len());

        let mut report = DedupReport {
            rows: rows.len(),
            total_duplicates: duplicates.len(),
            ..DedupReport::default()
        };

        for idx in duplicates {
            let row = &rows[idx];
            match find_replacement(row, &used, self.verbs, self.objects, rng) {
                Some(replacement) => {
                    tracing::debug!(
                        "Row {}: {} / {} -> {} / {}",
                        idx,
                        row.pred_verb_synset,
                        row.pred_object_synset,
                        replacement.pred_verb_synset,
                        replacement.pred_object_synset
                    );
                    used.insert(Signature::of(&replacement));
                    rows[idx] = replacement;
                    report.replaced += 1;
                }
                None => {
                    tracing::warn!(
                        "Could not find replacement for row {} in bin {}",
                        idx,
                        row.bin()
                    );
                    report.unresolved.push(UnresolvedDuplicate {
                        row: idx,
                        bin: row.bin(),
                    });
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::comparison;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ride_horse(category: u8, level: u8) -> CandidateRow {
        comparison(
            category,
            level,
            ("ride", "horse"),
            ("ride.v.01", "horse.n.01"),
            ("mount.v.01", "pony.n.01"),
        )
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(17)
    }

    #[test]
    fn object_swap_for_category_one() {
        let mut objects = SimilarityLookup::default();
        objects.insert("horse.n.01", "mule.n.01", 2);
        let verbs = SimilarityLookup::default();

        let mut rows = vec![ride_horse(1, 2), ride_horse(1, 2)];
        let report = DuplicateResolver::new(&verbs, &objects).resolve(&mut rows, &mut rng());

        assert_eq!(report.total_duplicates, 1);
        assert_eq!(report.replaced, 1);
        assert!(report.is_clean());
        assert_eq!(rows[0], ride_horse(1, 2));
        assert_eq!(rows[1].pred_object_synset, "mule.n.01");
        assert_eq!(rows[1].pred_verb_synset, "mount.v.01");
    }

    #[test]
    fn no_candidate_at_level_leaves_row_unchanged() {
        let mut objects = SimilarityLookup::default();
        objects.insert("horse.n.01", "mule.n.01", 3);
        let verbs = SimilarityLookup::default();

        let mut rows = vec![ride_horse(1, 2), ride_horse(1, 2)];
        let report = DuplicateResolver::new(&verbs, &objects).resolve(&mut rows, &mut rng());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], ride_horse(1, 2));
        assert_eq!(report.replaced, 0);
        assert_eq!(
            report.unresolved,
            vec![UnresolvedDuplicate {
                row: 1,
                bin: BinKey::new(1, 2)
            }]
        );
    }

    #[test]
    fn verb_swap_for_category_two() {
        let mut verbs = SimilarityLookup::default();
        verbs.insert("ride.v.01", "straddle.v.01", 1);
        let objects = SimilarityLookup::default();

        let row = ride_horse(2, 1);
        let mut used = HashSet::new();
        used.insert(Signature::of(&row));

        let replacement = find_replacement(&row, &used, &verbs, &objects, &mut rng()).unwrap();
        assert_eq!(replacement.pred_verb_synset, "straddle.v.01");
        assert_eq!(replacement.pred_object_synset, "pony.n.01");
        assert_eq!(replacement.bin(), row.bin());
    }

    #[test]
    fn category_three_skips_used_combinations() {
        let mut verbs = SimilarityLookup::default();
        verbs.insert("ride.v.01", "straddle.v.01", 4);
        let mut objects = SimilarityLookup::default();
        objects.insert("horse.n.01", "mule.n.01", 4);
        objects.insert("horse.n.01", "donkey.n.01", 4);

        let row = ride_horse(3, 4);
        let mut used = HashSet::new();
        used.insert(Signature::of(&row));
        used.insert(Signature::with_predictions(&row, "straddle.v.01", "mule.n.01"));

        let replacement = find_replacement(&row, &used, &verbs, &objects, &mut rng()).unwrap();
        assert_eq!(replacement.pred_verb_synset, "straddle.v.01");
        assert_eq!(replacement.pred_object_synset, "donkey.n.01");
    }

    #[test]
    fn category_three_needs_both_lookups() {
        let verbs = SimilarityLookup::default();
        let mut objects = SimilarityLookup::default();
        objects.insert("horse.n.01", "mule.n.01", 4);

        let row = ride_horse(3, 4);
        let used = HashSet::new();
        assert!(find_replacement(&row, &used, &verbs, &objects, &mut rng()).is_none());
    }

    #[test]
    fn unknown_category_has_no_policy() {
        let mut objects = SimilarityLookup::default();
        objects.insert("horse.n.01", "mule.n.01", 2);
        let verbs = SimilarityLookup::default();
        let row = ride_horse(0, 2);
        assert!(find_replacement(&row, &HashSet::new(), &verbs, &objects, &mut rng()).is_none());
    }

    #[test]
    fn replacements_do_not_collide_with_each_other() {
        let mut objects = SimilarityLookup::default();
        objects.insert("horse.n.01", "mule.n.01", 2);
        objects.insert("horse.n.01", "donkey.n.01", 2);
        let verbs = SimilarityLookup::default();

        let mut rows = vec![ride_horse(1, 2), ride_horse(1, 2), ride_horse(1, 2), ride_horse(1, 2)];
        let report = DuplicateResolver::new(&verbs, &objects).resolve(&mut rows, &mut rng());

        assert_eq!(report.total_duplicates, 3);
        assert_eq!(report.replaced, 2);
        assert_eq!(report.unresolved.len(), 1);

        let resolved: HashSet<Signature> = rows
            .iter()
            .enumerate()
            .filter(|(i, _)| !report.unresolved.iter().any(|u| u.row == *i))
            .map(|(_, r)| Signature::of(r))
            .collect();
        assert_eq!(resolved.len(), 3);
        for row in &rows {
            assert_eq!(row.bin(), BinKey::new(1, 2));
        }
    }

    #[test]
    fn replacement_avoids_signatures_seen_later_in_input() {
        let mut objects = SimilarityLookup::default();
        objects.insert("horse.n.01", "mule.n.01", 2);
        objects.insert("horse.n.01", "donkey.n.01", 2);
        let verbs = SimilarityLookup::default();

        let mut later = ride_horse(1, 2);
        later.pred_object_synset = "mule.n.01".to_string();
        let mut rows = vec![ride_horse(1, 2), ride_horse(1, 2), later];
        let report = DuplicateResolver::new(&verbs, &objects).resolve(&mut rows, &mut rng());

        assert_eq!(report.replaced, 1);
        assert_eq!(rows[1].pred_object_synset, "donkey.n.01");
        assert_eq!(rows[2].pred_object_synset, "mule.n.01");
    }
}
