//! In-memory implementations of [QuadIndex](crate::index::QuadIndex).
//!
//! All variants keep four levels of maps from encodings to the next level, prune levels that
//! become empty, and keep the number of quads below each level up to date.

mod level;
mod nested;
mod quoted;
mod record;
mod recursive;

pub use nested::NestedMapIndex;
pub use quoted::QuotedIndex;
pub use record::RecordIndex;
pub use recursive::{IndexNode, RecursiveIndex};
