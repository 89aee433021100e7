use crate::memory::dictionary::canonical::CanonicalTermMap;
use crate::memory::dictionary::counter::IdCounter;
use quadstore_encoding::{
    ensure_encodable, DictionaryError, DictionaryResult, ObjectId, TermDictionary, TermTypeTag,
};
use quadstore_model::Term;

/// The exclusive upper bound of the per-type counters.
const COUNTER_LIMIT: u32 = ObjectId::BITMASK >> ObjectId::TAG_BITS;

/// A dictionary that keeps one counter per [TermTypeTag] and packs the tag into the low bits of
/// each id (see [ObjectId::from_parts]).
///
/// The type of a term can therefore be obtained from its id alone ([PartitionedDictionary::term_type]).
/// Quoted triples are not supported.
#[derive(Debug)]
pub struct PartitionedDictionary {
    /// One counter for each tag, indexed by the tag value.
    counters: [IdCounter; 5],
    terms: CanonicalTermMap<Term>,
}

impl PartitionedDictionary {
    /// Creates a new dictionary that only contains the default graph.
    pub fn new() -> Self {
        // The first id of the default graph partition, i.e., from_parts(1, DefaultGraph).
        let default_graph =
            ObjectId::new((1 << ObjectId::TAG_BITS) | TermTypeTag::DefaultGraph as u32);

        Self {
            counters: TermTypeTag::ALL.map(|tag| match tag {
                TermTypeTag::DefaultGraph => IdCounter::new(2, COUNTER_LIMIT),
                _ => IdCounter::new(1, COUNTER_LIMIT),
            }),
            terms: CanonicalTermMap::with_default_graph(default_graph),
        }
    }

    /// Returns the term type of `encoding` without consulting a dictionary.
    pub fn term_type(encoding: ObjectId) -> Option<TermTypeTag> {
        encoding.type_tag()
    }

    fn allocate(&self, tag: TermTypeTag) -> DictionaryResult<ObjectId> {
        let counter = self
            .counters
            .get(tag as usize)
            .ok_or(DictionaryError::Exhausted)?
            .allocate()?;
        ObjectId::from_parts(counter, tag)
    }
}

impl Default for PartitionedDictionary {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the tag of `term`, rejecting terms that cannot be stored in a [PartitionedDictionary].
fn plain_term_tag(term: &Term) -> DictionaryResult<TermTypeTag> {
    ensure_encodable(term)?;
    TermTypeTag::of_term(term).ok_or_else(|| {
        DictionaryError::Unsupported(format!(
            "Term {term} cannot be stored in a partitioned dictionary."
        ))
    })
}

impl TermDictionary for PartitionedDictionary {
    type Encoding = ObjectId;

    fn encode(&self, term: &Term) -> DictionaryResult<ObjectId> {
        let tag = plain_term_tag(term)?;
        self.terms.get_or_insert_with(term, || self.allocate(tag))
    }

    fn encode_optional(&self, term: &Term) -> DictionaryResult<Option<ObjectId>> {
        plain_term_tag(term)?;
        Ok(self.terms.get(term))
    }

    fn decode(&self, encoding: ObjectId) -> DictionaryResult<Term> {
        self.terms.term(encoding)
    }

    fn encodings(&self) -> DictionaryResult<Vec<ObjectId>> {
        Ok(self.terms.ids())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadstore_model::{BlankNode, Literal, NamedNode};

    #[test]
    fn ids_carry_term_type() {
        let dictionary = PartitionedDictionary::new();
        let cases = [
            (
                Term::NamedNode(NamedNode::new_unchecked("http://example.com/a")),
                TermTypeTag::NamedNode,
            ),
            (
                Term::BlankNode(BlankNode::new_unchecked("b")),
                TermTypeTag::BlankNode,
            ),
            (
                Term::Literal(Literal::new_language_tagged_literal_unchecked("a", "en")),
                TermTypeTag::LanguageTaggedLiteral,
            ),
            (
                Term::Literal(Literal::new_simple_literal("a")),
                TermTypeTag::TypedLiteral,
            ),
            (Term::DefaultGraph, TermTypeTag::DefaultGraph),
        ];

        for (term, tag) in cases {
            let encoding = dictionary.encode(&term).unwrap();
            assert_eq!(PartitionedDictionary::term_type(encoding), Some(tag));
            assert_eq!(dictionary.decode(encoding).unwrap(), term);
        }
    }

    #[test]
    fn counters_are_independent() {
        let dictionary = PartitionedDictionary::new();
        let a = dictionary
            .encode(&Term::NamedNode(NamedNode::new_unchecked("a")))
            .unwrap();
        let b = dictionary
            .encode(&Term::BlankNode(BlankNode::new_unchecked("b")))
            .unwrap();
        let c = dictionary
            .encode(&Term::NamedNode(NamedNode::new_unchecked("c")))
            .unwrap();

        assert_eq!((a.counter(), b.counter(), c.counter()), (1, 1, 2));
        assert_eq!(
            dictionary.encode_optional(&Term::DefaultGraph).unwrap(),
            Some(ObjectId::new(12))
        );
    }

    #[test]
    fn quoted_triples_are_unsupported() {
        let dictionary = PartitionedDictionary::new();
        let a = Term::NamedNode(NamedNode::new_unchecked("a"));
        let result = dictionary.encode(&Term::triple(a.clone(), a.clone(), a));
        assert!(matches!(result, Err(DictionaryError::Unsupported(_))));
        assert_eq!(dictionary.encodings().unwrap().len(), 1);
    }
}
