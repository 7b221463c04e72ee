//! Read-only duplicate detection.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::CandidateRow;

use super::signature::Signature;

/// Rows sharing one signature. Every member is listed, including the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollisionGroup {
    pub rows: Vec<usize>,
}

impl CollisionGroup {
    /// Rows a resolver would have to replace.
    pub fn surplus(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }
}

/// Find every group of two or more rows with the same signature.
///
/// Groups are ordered by the position of their first member and each
/// group lists row positions in ascending order.
pub fn find_collisions(rows: &[CandidateRow]) -> Vec<CollisionGroup> {
    let mut slots: HashMap<Signature, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        let slot = *slots.entry(Signature::of(row)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(idx);
    }

    groups
        .into_iter()
        .filter(|members| members.len() > 1)
        .map(|rows| CollisionGroup { rows })
        .collect()
}
