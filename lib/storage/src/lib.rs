#![doc(test(attr(deny(warnings))))]

//! Contains the storage layer of the quadstore: thread-safe term dictionaries and quad indexes.
//!
//! The [index] module defines the [QuadIndex](index::QuadIndex) contract and the logic for keeping
//! multiple permutations of an index consistent. The [memory] module contains the in-memory
//! implementations of dictionaries and indexes.

mod error;
pub mod index;
pub mod memory;

pub use error::StorageError;
