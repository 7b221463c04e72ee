//! Uniqueness keys and the per-run set of keys already placed in the sample.

use std::collections::HashSet;

use crate::config::UniquenessKey;
use crate::types::CandidateRow;

/// The value a row is deduplicated on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    Image(String),
    GroundTruth {
        image_id: String,
        verb_synset: String,
        object_synset: String,
    },
}

impl UniquenessKey {
    /// Extract this kind of key from a row.
    pub fn key_of(self, row: &CandidateRow) -> RowKey {
        match self {
            UniquenessKey::ImageId => RowKey::Image(row.image_id.clone()),
            UniquenessKey::GroundTruth => RowKey::GroundTruth {
                image_id: row.image_id.clone(),
                verb_synset: row.gt_verb_synset.clone(),
                object_synset: row.gt_object_synset.clone(),
            },
        }
    }
}

/// Keys of every row currently in the sample.
///
/// Owned by a single sampling run. Keys are inserted as rows are accepted
/// and removed only when the balancing pass swaps a row out.
#[derive(Debug, Clone)]
pub struct UsedKeys {
    kind: UniquenessKey,
    keys: HashSet<RowKey>,
}

impl UsedKeys {
    pub fn new(kind: UniquenessKey) -> Self {
        Self {
            kind,
            keys: HashSet::new(),
        }
    }

    pub fn kind(&self) -> UniquenessKey {
        self.kind
    }

    /// Whether the row's key is already taken.
    pub fn contains(&self, row: &CandidateRow) -> bool {
        self.keys.contains(&self.kind.key_of(row))
    }

    /// Claim the row's key. Returns `false` if it was already taken.
    pub fn insert(&mut self, row: &CandidateRow) -> bool {
        self.keys.insert(self.kind.key_of(row))
    }

    /// Release the row's key. Returns `false` if it was not taken.
    pub fn remove(&mut self, row: &CandidateRow) -> bool {
        self.keys.remove(&self.kind.key_of(row))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
