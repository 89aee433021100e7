use std::fmt::{Debug, Display};
use std::hash::Hash;

/// The data structure that is used to represent a single encoded RDF term.
///
/// Encodings are handed out by a [TermDictionary](crate::TermDictionary) and are only meaningful
/// together with the dictionary that issued them. Indexes only rely on the properties required by
/// this trait, so they can be used with any dictionary.
pub trait EncodedTerm:
    Debug + Display + Clone + Copy + PartialEq + Eq + Hash + Send + Sync + 'static
{
}
