//! In-memory dictionaries and quad indexes.

mod cardinality;
mod dictionary;
mod index;

pub use cardinality::CardinalitySet;
pub use dictionary::*;
pub use index::*;
