//! Signature-level duplicate detection and resolution.

pub mod check;
pub mod resolver;
pub mod signature;

pub use check::{find_collisions, CollisionGroup};
pub use resolver::{find_replacement, DedupReport, DuplicateResolver, UnresolvedDuplicate};
pub use signature::Signature;
