#![doc(test(attr(deny(warnings))))]

//! Encodings of RDF terms and the contract of the dictionaries that issue them.
//!
//! A [TermDictionary] maps terms to compact [EncodedTerm]s and back. Indexes only store encodings,
//! so they work with any dictionary that issues the encoding type they are instantiated with.
//!
//! Two encodings are provided:
//! - [ObjectId]: a 32-bit integer with a reserved high bit ([ObjectId::BITMASK]) for quoted
//!   triples and an optional term-type tag in the low bits.
//! - [Symbol]: a handle onto a process-wide interned string.

mod dictionary;
mod encoded_term;
mod error;
mod object_id;
mod symbol;

pub use dictionary::*;
pub use encoded_term::EncodedTerm;
pub use error::*;
pub use object_id::{ObjectId, TermTypeTag};
pub use symbol::Symbol;
