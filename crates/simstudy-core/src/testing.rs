//! Row builders shared by unit tests.

use crate::types::CandidateRow;

/// A row in the given bin whose ground-truth synsets are derived from the id,
/// so distinct ids never collide under either uniqueness key.
pub fn row_in_bin(image_id: &str, category: u8, level: u8) -> CandidateRow {
    CandidateRow {
        image_id: image_id.to_string(),
        category,
        similarity_level: level,
        gt_verb: "ride".to_string(),
        gt_object: "horse".to_string(),
        gt_verb_synset: format!("{image_id}.v.01"),
        gt_object_synset: format!("{image_id}.n.01"),
        pred_verb_synset: "mount.v.01".to_string(),
        pred_object_synset: "pony.n.01".to_string(),
        extra: vec![],
    }
}

/// A comparison row with explicit labels.
pub fn comparison(
    category: u8,
    level: u8,
    gt: (&str, &str),
    gt_synsets: (&str, &str),
    pred_synsets: (&str, &str),
) -> CandidateRow {
    CandidateRow {
        image_id: "img".to_string(),
        category,
        similarity_level: level,
        gt_verb: gt.0.to_string(),
        gt_object: gt.1.to_string(),
        gt_verb_synset: gt_synsets.0.to_string(),
        gt_object_synset: gt_synsets.1.to_string(),
        pred_verb_synset: pred_synsets.0.to_string(),
        pred_object_synset: pred_synsets.1.to_string(),
        extra: vec![],
    }
}
