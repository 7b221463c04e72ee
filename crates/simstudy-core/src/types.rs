//! Core data types shared by the sampling, deduplication and question stages.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dataset::Field;

/// A (category, similarity level) stratum.
///
/// Ordered by category first, then level, which is also the fixed sweep
/// order of the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BinKey {
    pub category: u8,
    pub level: u8,
}

impl BinKey {
    pub fn new(category: u8, level: u8) -> Self {
        Self { category, level }
    }
}

impl fmt::Display for BinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(cat={}, sim={})", self.category, self.level)
    }
}

/// One predicted-vs-ground-truth comparison item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRow {
    /// Source image identifier (not unique across rows)
    pub image_id: String,

    /// Which labels differ: 1 = object, 2 = verb, 3 = both
    pub category: u8,

    /// Similarity rating, 0 (dissimilar) to 4 (interchangeable)
    pub similarity_level: u8,

    pub gt_verb: String,
    pub gt_object: String,
    pub gt_verb_synset: String,
    pub gt_object_synset: String,
    pub pred_verb_synset: String,
    pub pred_object_synset: String,

    /// Values of non-comparison columns, in input column order
    pub extra: Vec<String>,
}

impl CandidateRow {
    pub fn bin(&self) -> BinKey {
        BinKey::new(self.category, self.similarity_level)
    }

    /// Text value of a comparison field.
    pub fn field(&self, field: Field) -> String {
        match field {
            Field::ImageId => self.image_id.clone(),
            Field::Category => self.category.to_string(),
            Field::SimilarityLevel => self.similarity_level.to_string(),
            Field::GtVerb => self.gt_verb.clone(),
            Field::GtObject => self.gt_object.clone(),
            Field::GtVerbSynset => self.gt_verb_synset.clone(),
            Field::GtObjectSynset => self.gt_object_synset.clone(),
            Field::PredVerbSynset => self.pred_verb_synset.clone(),
            Field::PredObjectSynset => self.pred_object_synset.clone(),
        }
    }
}

/// A single annotation question handed to the annotation form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Sequential identifier starting at 1
    pub id: usize,

    /// Rendered comparison text
    pub question: String,

    /// Answer labels, lowest similarity first
    pub choices: Vec<String>,
}
