use crate::index::EncodedTermPattern;
use quadstore_encoding::{
    ensure_encodable, quoted_pattern_graph_matches, DictionaryError, DictionaryResult, ObjectId,
    TermDictionary,
};
use quadstore_model::{Quad, Term};
use rustc_hash::FxHashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};
use tracing::trace;

/// A dictionary that stores quoted triples as references to the ids of their components.
///
/// Quoted triples are looked up by a key built from the component ids. Searching for quoted
/// triples scans the stored component ids. Only positions that hold a nested pattern with
/// variables need another lookup, which is resolved once per search.
#[derive(Debug, Default)]
pub struct ReferentialQuotedDictionary<TPlain> {
    plain: TPlain,
    triples: RwLock<ReferencedTriples>,
}

#[derive(Debug, Default)]
struct ReferencedTriples {
    /// The component ids of each quoted triple, indexed by its slot.
    components: Vec<[ObjectId; 3]>,
    /// Maps the reference key of the component ids to the id of the quoted triple.
    lookup: FxHashMap<String, ObjectId>,
}

fn reference_key([subject, predicate, object]: &[ObjectId; 3]) -> String {
    format!("{subject}_{predicate}_{object}")
}

impl<TPlain: TermDictionary<Encoding = ObjectId>> ReferentialQuotedDictionary<TPlain> {
    /// Creates a new [ReferentialQuotedDictionary] that stores plain terms in `plain`.
    pub fn new(plain: TPlain) -> Self {
        Self {
            plain,
            triples: RwLock::default(),
        }
    }

    /// Returns the dictionary for plain terms.
    pub fn plain(&self) -> &TPlain {
        &self.plain
    }

    fn read(&self) -> RwLockReadGuard<'_, ReferencedTriples> {
        self.triples.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup(&self, components: &[ObjectId; 3]) -> Option<ObjectId> {
        self.read().lookup.get(&reference_key(components)).copied()
    }

    /// Turns a component of a quoted-triple pattern into an encoded pattern.
    ///
    /// Returns [None] if no stored quoted triple can match the component.
    fn resolve_component(
        &self,
        term: &Term,
    ) -> DictionaryResult<Option<EncodedTermPattern<ObjectId>>> {
        match term {
            Term::Variable(_) => Ok(Some(EncodedTermPattern::Any)),
            Term::Triple(triple) if triple.has_variables() => {
                let candidates = self.find_quoted_triples_encoded(triple)?;
                Ok((!candidates.is_empty())
                    .then(|| EncodedTermPattern::OneOf(candidates.into_iter().collect())))
            }
            Term::Triple(triple) if !triple.graph.is_default_graph() => Ok(None),
            _ => Ok(self.encode_optional(term)?.map(EncodedTermPattern::Is)),
        }
    }
}

impl<TPlain: TermDictionary<Encoding = ObjectId>> TermDictionary
    for ReferentialQuotedDictionary<TPlain>
{
    type Encoding = ObjectId;

    fn encode(&self, term: &Term) -> DictionaryResult<ObjectId> {
        let Term::Triple(triple) = term else {
            return self.plain.encode(term);
        };

        ensure_encodable(term)?;
        let components = [
            self.encode(&triple.subject)?,
            self.encode(&triple.predicate)?,
            self.encode(&triple.object)?,
        ];
        if let Some(id) = self.lookup(&components) {
            return Ok(id);
        }

        let key = reference_key(&components);
        let mut triples = self.triples.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(id) = triples.lookup.get(&key) {
            return Ok(*id);
        }

        let id = ObjectId::from_quoted_slot(triples.components.len())?;
        triples.components.push(components);
        triples.lookup.insert(key, id);
        trace!(%term, %id, "Allocated quoted triple id");
        Ok(id)
    }

    fn encode_optional(&self, term: &Term) -> DictionaryResult<Option<ObjectId>> {
        let Term::Triple(triple) = term else {
            return self.plain.encode_optional(term);
        };

        ensure_encodable(term)?;
        let (Some(subject), Some(predicate), Some(object)) = (
            self.encode_optional(&triple.subject)?,
            self.encode_optional(&triple.predicate)?,
            self.encode_optional(&triple.object)?,
        ) else {
            return Ok(None);
        };
        Ok(self.lookup(&[subject, predicate, object]))
    }

    fn decode(&self, encoding: ObjectId) -> DictionaryResult<Term> {
        if !encoding.is_quoted() {
            return self.plain.decode(encoding);
        }

        let [subject, predicate, object] = encoding
            .quoted_slot()
            .and_then(|slot| self.read().components.get(slot).copied())
            .ok_or_else(|| DictionaryError::not_found(encoding))?;
        Ok(Term::triple(
            self.decode(subject)?,
            self.decode(predicate)?,
            self.decode(object)?,
        ))
    }

    fn encodings(&self) -> DictionaryResult<Vec<ObjectId>> {
        let mut encodings = self.plain.encodings()?;
        let num_quoted = self.read().components.len();
        for slot in 0..num_quoted {
            encodings.push(ObjectId::from_quoted_slot(slot)?);
        }
        Ok(encodings)
    }

    fn supports_quoted_triples(&self) -> bool {
        true
    }

    fn find_quoted_triples_encoded(&self, pattern: &Quad) -> DictionaryResult<Vec<ObjectId>> {
        if !quoted_pattern_graph_matches(pattern) {
            return Ok(Vec::new());
        }

        let (Some(subject), Some(predicate), Some(object)) = (
            self.resolve_component(&pattern.subject)?,
            self.resolve_component(&pattern.predicate)?,
            self.resolve_component(&pattern.object)?,
        ) else {
            return Ok(Vec::new());
        };

        let triples = self.read();
        let mut result = Vec::new();
        for (slot, [s, p, o]) in triples.components.iter().enumerate() {
            if subject.matches(s) && predicate.matches(p) && object.matches(o) {
                result.push(ObjectId::from_quoted_slot(slot)?);
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{QuotedIndexedDictionary, TermMapDictionary};
    use quadstore_model::NamedNode;

    fn iri(value: &str) -> Term {
        Term::NamedNode(NamedNode::new_unchecked(value))
    }

    #[test]
    fn reference_key_format() {
        let key = reference_key(&[ObjectId::new(2), ObjectId::new(3), ObjectId::new(4)]);
        insta::assert_snapshot!(key, @"2_3_4");
    }

    #[test]
    fn nested_components_are_registered() {
        let dictionary = ReferentialQuotedDictionary::<TermMapDictionary>::default();
        let inner = Term::triple(iri("bob"), iri("says"), iri("hello"));
        let outer = Term::triple(iri("alice"), iri("says"), inner.clone());

        let outer_id = dictionary.encode(&outer).unwrap();
        let inner_id = dictionary.encode_optional(&inner).unwrap().unwrap();
        assert!(inner_id.is_quoted());
        assert_ne!(inner_id, outer_id);
        assert_eq!(dictionary.decode(outer_id).unwrap(), outer);
    }

    #[test]
    fn same_ids_as_indexed_dictionary() {
        let referential = ReferentialQuotedDictionary::<TermMapDictionary>::default();
        let indexed = QuotedIndexedDictionary::<TermMapDictionary>::default();
        let terms = [
            iri("a"),
            Term::triple(iri("a"), iri("b"), iri("c")),
            Term::triple(iri("c"), iri("b"), Term::triple(iri("a"), iri("b"), iri("c"))),
        ];
        for term in &terms {
            assert_eq!(
                referential.encode(term).unwrap(),
                indexed.encode(term).unwrap()
            );
        }

        let pattern = Quad::triple(Term::variable("s"), iri("b"), Term::variable("o"));
        assert_eq!(
            referential.find_quoted_triples_encoded(&pattern).unwrap(),
            vec![
                ObjectId::from_quoted_slot(0).unwrap(),
                ObjectId::from_quoted_slot(1).unwrap()
            ]
        );
    }
}
