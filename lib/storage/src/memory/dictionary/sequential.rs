use crate::memory::dictionary::canonical::{CanonicalTermMap, ReverseEntry};
use crate::memory::dictionary::counter::IdCounter;
use quadstore_encoding::{ensure_encodable, DictionaryResult, ObjectId, TermDictionary};
use quadstore_model::Term;
use std::sync::Arc;

/// A dictionary keyed by the canonical string form of the terms that assigns sequential ids.
///
/// Quoted triples are stored like any other term, i.e., by their canonical string. Searching for
/// quoted triples is not supported. Use one of the quoted dictionaries for that purpose.
///
/// See [StringDictionary] and [TermMapDictionary].
#[derive(Debug)]
pub struct CanonicalDictionary<TEntry> {
    next_id: IdCounter,
    terms: CanonicalTermMap<TEntry>,
}

/// A [CanonicalDictionary] that re-parses the canonical string form on decoding.
pub type StringDictionary = CanonicalDictionary<Arc<str>>;

/// A [CanonicalDictionary] that keeps the full terms for decoding.
pub type TermMapDictionary = CanonicalDictionary<Term>;

impl<TEntry: ReverseEntry> CanonicalDictionary<TEntry> {
    /// Creates a new dictionary that only contains the default graph ([ObjectId::FIRST]).
    pub fn new() -> Self {
        Self {
            next_id: IdCounter::new(ObjectId::FIRST.as_u32() + 1, ObjectId::BITMASK),
            terms: CanonicalTermMap::with_default_graph(ObjectId::FIRST),
        }
    }
}

impl<TEntry: ReverseEntry> Default for CanonicalDictionary<TEntry> {
    fn default() -> Self {
        Self::new()
    }
}

impl<TEntry: ReverseEntry> TermDictionary for CanonicalDictionary<TEntry> {
    type Encoding = ObjectId;

    fn encode(&self, term: &Term) -> DictionaryResult<ObjectId> {
        ensure_encodable(term)?;
        self.terms
            .get_or_insert_with(term, || self.next_id.allocate().map(ObjectId::new))
    }

    fn encode_optional(&self, term: &Term) -> DictionaryResult<Option<ObjectId>> {
        ensure_encodable(term)?;
        Ok(self.terms.get(term))
    }

    fn decode(&self, encoding: ObjectId) -> DictionaryResult<Term> {
        self.terms.term(encoding)
    }

    fn encodings(&self) -> DictionaryResult<Vec<ObjectId>> {
        Ok(self.terms.ids())
    }
}
