use quadstore_encoding::EncodedTerm;
use rustc_hash::{FxHashMap, FxHashSet};

/// An encoded pattern for a single position of a quad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedTermPattern<TTerm: EncodedTerm> {
    /// Matches any encoding.
    Any,
    /// Matches exactly the given encoding.
    Is(TTerm),
    /// Matches any of the given encodings.
    ///
    /// This is used for quoted-triple patterns that contain variables. The set holds the encodings
    /// of all stored quoted triples that match the pattern.
    OneOf(FxHashSet<TTerm>),
}

/// An encoded pattern for an entire quad, in the native order of an index.
pub type EncodedQuadPattern<TTerm> = [EncodedTermPattern<TTerm>; 4];

/// Iterates over the entries of a single index level that match a pattern.
pub(crate) type TraversalIterator<'a, TTerm, TInner> =
    Box<dyn Iterator<Item = (&'a TTerm, &'a TInner)> + 'a>;

impl<TTerm: EncodedTerm> EncodedTermPattern<TTerm> {
    /// Returns true if `term` matches this pattern.
    pub fn matches(&self, term: &TTerm) -> bool {
        match self {
            EncodedTermPattern::Any => true,
            EncodedTermPattern::Is(expected) => expected == term,
            EncodedTermPattern::OneOf(candidates) => candidates.contains(term),
        }
    }

    /// Returns true if this pattern restricts the position.
    pub fn is_bound(&self) -> bool {
        !matches!(self, EncodedTermPattern::Any)
    }

    /// Returns the entries of `level` that match this pattern.
    ///
    /// For [EncodedTermPattern::OneOf], the smaller of the two sides is iterated and probed
    /// against the other one. The candidate set is borrowed, so selecting from many levels does not
    /// copy it.
    pub(crate) fn select<'a, TInner>(
        &'a self,
        level: &'a FxHashMap<TTerm, TInner>,
    ) -> TraversalIterator<'a, TTerm, TInner> {
        match self {
            EncodedTermPattern::Any => Box::new(level.iter()),
            EncodedTermPattern::Is(term) => Box::new(level.get_key_value(term).into_iter()),
            EncodedTermPattern::OneOf(candidates) if candidates.len() < level.len() => Box::new(
                candidates
                    .iter()
                    .filter_map(move |term| level.get_key_value(term)),
            ),
            EncodedTermPattern::OneOf(candidates) => Box::new(
                level
                    .iter()
                    .filter(move |(term, _)| candidates.contains(*term)),
            ),
        }
    }
}

/// Returns true if all patterns are [EncodedTermPattern::Any].
pub(crate) fn all_any<TTerm: EncodedTerm>(patterns: &[EncodedTermPattern<TTerm>]) -> bool {
    patterns.iter().all(|pattern| !pattern.is_bound())
}
