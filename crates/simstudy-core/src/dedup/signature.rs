//! Semantic signatures of comparison rows.

use crate::types::CandidateRow;

/// The six labels that identify a comparison item.
///
/// Two rows with equal signatures would show annotators the same question.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub gt_verb: String,
    pub gt_object: String,
    pub gt_verb_synset: String,
    pub gt_object_synset: String,
    pub pred_verb_synset: String,
    pub pred_object_synset: String,
}

impl Signature {
    pub fn of(row: &CandidateRow) -> Self {
        Self::with_predictions(row, &row.pred_verb_synset, &row.pred_object_synset)
    }

    /// Signature the row would have with different predicted synsets.
    pub fn with_predictions(row: &CandidateRow, pred_verb: &str, pred_object: &str) -> Self {
        Self {
            gt_verb: row.gt_verb.clone(),
            gt_object: row.gt_object.clone(),
            gt_verb_synset: row.gt_verb_synset.clone(),
            gt_object_synset: row.gt_object_synset.clone(),
            pred_verb_synset: pred_verb.to_string(),
            pred_object_synset: pred_object.to_string(),
        }
    }
}
