//! Contains general data structures on quad indexes.
//!
//! A quad index represents a particular sorting of the quad components graph name, subject,
//! predicate, and object. For example, the [IndexComponents::GSPO] index represents that exact
//! ordering while the [IndexComponents::GPOS] has the predicate as the second component. Different
//! types of graph patterns may be better suited for different indexes.
//!
//! The primary trait in this module is the [QuadIndex]. We recommend users unfamiliar with the
//! architecture to explore this module from there. In addition, [IndexPermutations] provides access
//! to multiple indexes while implementing the reordering logic.

mod components;
mod error;
mod order;
mod pattern;
mod permutations;

pub use components::*;
pub use error::*;
pub use order::*;
pub use pattern::*;
pub use permutations::*;

use quadstore_encoding::{DictionaryError, DictionaryResult, EncodedTerm, TermDictionary};
use quadstore_model::{is_wildcard, Term, TermPattern};
use std::fmt::Debug;
use std::sync::Arc;

/// A quad that is sorted for some index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexQuad<TTerm: EncodedTerm>(pub [TTerm; 4]);

impl<TTerm: EncodedTerm> IndexQuad<TTerm> {
    /// Creates a new [IndexQuad] for an index with the given `components` from an encoded quad in
    /// subject, predicate, object, graph order.
    pub fn for_index(components: IndexComponents, quad: &[TTerm; 4]) -> Self {
        Self(order_quad_components(components, quad))
    }
}

/// Represents a single instance of a quad index with a given ordering.
///
/// An index stores encoded quads in the order of its [IndexComponents] and maps each of them to a
/// value. Presence-only indexes use `()` as value.
///
/// All patterns and quads that are passed to an index are expected to already be in the native
/// order of the index (see [order_quad_components]). In term patterns, [None] and
/// [Term::Variable] are wildcards. Reused variables are not checked for consistency across
/// positions.
pub trait QuadIndex: Debug + Send + Sync + Sized {
    /// The dictionary that is used for encoding and decoding terms.
    type Dictionary: TermDictionary<Encoding = Self::Encoding>;
    /// The data structure that is used to represent a single RDF term.
    type Encoding: EncodedTerm;
    /// The value that is stored for each quad.
    type Value: Debug + Clone + Send + Sync;

    /// Creates a new empty index.
    fn new(dictionary: Arc<Self::Dictionary>, components: IndexComponents) -> Self;

    /// Returns the components of the index.
    fn components(&self) -> IndexComponents;

    /// Returns the dictionary that is shared with other indexes.
    fn dictionary(&self) -> &Arc<Self::Dictionary>;

    /// Returns the total number of quads.
    fn len(&self) -> usize;

    /// Returns true if the index contains no quads.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts `quad` with the given `value`.
    ///
    /// Returns false, and keeps the existing value, if the quad is already present.
    fn set(&mut self, quad: IndexQuad<Self::Encoding>, value: Self::Value) -> bool;

    /// Removes `quad`. Levels that become empty are removed as well.
    ///
    /// Returns false if the quad is not present.
    fn remove(&mut self, quad: &IndexQuad<Self::Encoding>) -> bool;

    /// Returns the value of `quad`.
    fn get_encoded(&self, quad: &IndexQuad<Self::Encoding>) -> Option<&Self::Value>;

    /// Returns all quads, including their values, that match `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index contains an entry that cannot be turned back into an
    /// encoding.
    fn find_encoded_entries(
        &self,
        pattern: &EncodedQuadPattern<Self::Encoding>,
    ) -> DictionaryResult<Vec<(IndexQuad<Self::Encoding>, Self::Value)>>;

    /// Returns the number of quads that match `pattern`.
    fn count_encoded(&self, pattern: &EncodedQuadPattern<Self::Encoding>) -> usize;

    /// Clears the entire index.
    fn clear(&mut self);

    /// Returns all quads that match `pattern`.
    fn find_encoded(
        &self,
        pattern: &EncodedQuadPattern<Self::Encoding>,
    ) -> DictionaryResult<Vec<IndexQuad<Self::Encoding>>> {
        let entries = self.find_encoded_entries(pattern)?;
        Ok(entries.into_iter().map(|(quad, _)| quad).collect())
    }

    /// Encodes `pattern` without allocating new encodings.
    ///
    /// Returns [None] if a bound position refers to a term that has never been encoded, as no quad
    /// can match the pattern in that case.
    ///
    /// # Errors
    ///
    /// A quoted triple that contains variables cannot be encoded. Indexes that support matching
    /// inside quoted triples override this method.
    fn encode_pattern(
        &self,
        pattern: &TermPattern<'_>,
    ) -> DictionaryResult<Option<EncodedQuadPattern<Self::Encoding>>> {
        let mut result = [
            EncodedTermPattern::Any,
            EncodedTermPattern::Any,
            EncodedTermPattern::Any,
            EncodedTermPattern::Any,
        ];
        for (encoded, term) in result.iter_mut().zip(pattern) {
            let Some(term) = term.filter(|term| !term.is_variable()) else {
                continue;
            };
            match encode_bound_term::<Self::Dictionary>(self.dictionary(), term)? {
                None => return Ok(None),
                Some(encoding) => *encoded = EncodedTermPattern::Is(encoding),
            }
        }
        Ok(Some(result))
    }

    /// Returns the value of the quad with the given `terms`.
    fn get(&self, terms: &[Term; 4]) -> DictionaryResult<Option<&Self::Value>> {
        let mut encoded = Vec::with_capacity(4);
        for term in terms {
            match self.dictionary().encode_optional(term)? {
                None => return Ok(None),
                Some(encoding) => encoded.push(encoding),
            }
        }
        let Ok(encoded) = <[Self::Encoding; 4]>::try_from(encoded) else {
            return Ok(None);
        };
        Ok(self.get_encoded(&IndexQuad(encoded)))
    }

    /// Returns all quads that match `pattern` as terms.
    ///
    /// Bound positions are taken from the pattern. Only wildcard positions are decoded.
    fn find(&self, pattern: &TermPattern<'_>) -> DictionaryResult<Vec<[Term; 4]>> {
        let Some(encoded_pattern) = self.encode_pattern(pattern)? else {
            return Ok(Vec::new());
        };

        self.find_encoded(&encoded_pattern)?
            .into_iter()
            .map(|quad| {
                decode_index_quad::<Self::Dictionary>(
                    self.dictionary(),
                    pattern,
                    &encoded_pattern,
                    &quad,
                )
            })
            .collect()
    }

    /// Returns the number of quads that match `pattern`.
    fn count(&self, pattern: &TermPattern<'_>) -> DictionaryResult<usize> {
        Ok(self
            .encode_pattern(pattern)?
            .map_or(0, |encoded_pattern| self.count_encoded(&encoded_pattern)))
    }
}

/// Decodes the positions of `quad` that are not bound to a single term in `pattern`.
fn decode_index_quad<TDictionary: TermDictionary>(
    dictionary: &TDictionary,
    pattern: &TermPattern<'_>,
    encoded_pattern: &EncodedQuadPattern<TDictionary::Encoding>,
    quad: &IndexQuad<TDictionary::Encoding>,
) -> DictionaryResult<[Term; 4]> {
    let [a, b, c, d]: [DictionaryResult<Term>; 4] =
        std::array::from_fn(|i| match (&encoded_pattern[i], pattern[i]) {
            (EncodedTermPattern::Is(_), Some(term)) if !is_wildcard(Some(term)) => {
                Ok(term.clone())
            }
            _ => dictionary.decode(quad.0[i]),
        });
    Ok([a?, b?, c?, d?])
}

/// Encodes a bound pattern term without allocating.
///
/// Quoted triples outside the default graph are never stored, so such a term matches nothing
/// instead of failing.
pub(crate) fn encode_bound_term<TDictionary: TermDictionary + ?Sized>(
    dictionary: &TDictionary,
    term: &Term,
) -> DictionaryResult<Option<TDictionary::Encoding>> {
    match dictionary.encode_optional(term) {
        Err(DictionaryError::InvalidArgument(_)) => Ok(None),
        result => result,
    }
}
