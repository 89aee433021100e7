use crate::index::{
    best_index_for_bound, order_quad_components, EncodedTermPattern, IndexComponents, IndexQuad,
    QuadIndex,
};
use crate::memory::index::RecursiveIndex;
use quadstore_encoding::{
    ensure_encodable, quoted_pattern_graph_matches, DictionaryError, DictionaryResult, ObjectId,
    TermDictionary,
};
use quadstore_model::{Quad, Term};
use rustc_hash::FxHashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

/// The rotations of the internal indexes. The graph is always the default graph.
const ROTATIONS: [IndexComponents; 3] = [
    IndexComponents::SPOG,
    IndexComponents::POSG,
    IndexComponents::OSPG,
];

/// A dictionary that stores quoted triples by the ids of their components and indexes them in
/// three rotations (SPO, POS, OSP).
///
/// Searching for quoted triples uses the rotation that serves the bound components of the pattern
/// best. Components that are themselves quoted patterns with variables are resolved recursively
/// into the set of matching quoted triples first.
///
/// The internal indexes only use the plain dictionary (for the default graph id). They never need
/// the quoted-triple capabilities of this dictionary.
#[derive(Debug)]
pub struct QuotedIndexedDictionary<TPlain: TermDictionary<Encoding = ObjectId>> {
    plain: Arc<TPlain>,
    triples: RwLock<QuotedTriples<TPlain>>,
}

#[derive(Debug)]
struct QuotedTriples<TPlain: TermDictionary<Encoding = ObjectId>> {
    /// The component ids of each quoted triple, indexed by its slot.
    components: Vec<[ObjectId; 3]>,
    /// Maps component ids to the id of the quoted triple.
    lookup: FxHashMap<[ObjectId; 3], ObjectId>,
    /// One index per entry in [ROTATIONS]. The value is the id of the quoted triple.
    rotations: Vec<RecursiveIndex<TPlain, ObjectId>>,
}

impl<TPlain: TermDictionary<Encoding = ObjectId>> QuotedTriples<TPlain> {
    fn insert(&mut self, components: [ObjectId; 3], default_graph: ObjectId, id: ObjectId) {
        self.components.push(components);
        self.lookup.insert(components, id);

        let [subject, predicate, object] = components;
        let quad = [subject, predicate, object, default_graph];
        for index in &mut self.rotations {
            index.set(IndexQuad::for_index(index.components(), &quad), id);
        }
    }
}

impl<TPlain: TermDictionary<Encoding = ObjectId>> QuotedIndexedDictionary<TPlain> {
    /// Creates a new [QuotedIndexedDictionary] that stores plain terms in `plain`.
    pub fn new(plain: TPlain) -> Self {
        Self::with_plain(Arc::new(plain))
    }

    /// Creates a new [QuotedIndexedDictionary] that stores plain terms in the shared `plain`
    /// dictionary.
    pub fn with_plain(plain: Arc<TPlain>) -> Self {
        let rotations = ROTATIONS
            .iter()
            .map(|components| RecursiveIndex::new(Arc::clone(&plain), *components))
            .collect();
        Self {
            plain,
            triples: RwLock::new(QuotedTriples {
                components: Vec::new(),
                lookup: FxHashMap::default(),
                rotations,
            }),
        }
    }

    /// Returns the dictionary for plain terms.
    pub fn plain(&self) -> &Arc<TPlain> {
        &self.plain
    }

    fn read(&self) -> RwLockReadGuard<'_, QuotedTriples<TPlain>> {
        self.triples.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, QuotedTriples<TPlain>> {
        self.triples.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encodes the components of a quoted triple without allocating.
    fn encode_components_optional(&self, triple: &Quad) -> DictionaryResult<Option<[ObjectId; 3]>> {
        let (Some(subject), Some(predicate), Some(object)) = (
            self.encode_optional(&triple.subject)?,
            self.encode_optional(&triple.predicate)?,
            self.encode_optional(&triple.object)?,
        ) else {
            return Ok(None);
        };
        Ok(Some([subject, predicate, object]))
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

impl<TPlain> Default for QuotedIndexedDictionary<TPlain>
where
    TPlain: TermDictionary<Encoding = ObjectId> + Default,
{
    fn default() -> Self {
        Self::new(TPlain::default())
    }
}

impl<TPlain: TermDictionary<Encoding = ObjectId>> TermDictionary
    for QuotedIndexedDictionary<TPlain>
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
        if let Some(id) = self.read().lookup.get(&components) {
            return Ok(*id);
        }

        let default_graph = self.plain.encode(&Term::DefaultGraph)?;
        let mut triples = self.write();
        if let Some(id) = triples.lookup.get(&components) {
            return Ok(*id);
        }

        let id = ObjectId::from_quoted_slot(triples.components.len())?;
        triples.insert(components, default_graph, id);
        trace!(%term, %id, "Allocated quoted triple id");
        Ok(id)
    }

    fn encode_optional(&self, term: &Term) -> DictionaryResult<Option<ObjectId>> {
        let Term::Triple(triple) = term else {
            return self.plain.encode_optional(term);
        };

        ensure_encodable(term)?;
        let Some(components) = self.encode_components_optional(triple)? else {
            return Ok(None);
        };
        Ok(self.read().lookup.get(&components).copied())
    }

    fn decode(&self, encoding: ObjectId) -> DictionaryResult<Term> {
        if !encoding.is_quoted() {
            return self.plain.decode(encoding);
        }

        let components = encoding
            .quoted_slot()
            .and_then(|slot| self.read().components.get(slot).copied())
            .ok_or_else(|| DictionaryError::not_found(encoding))?;

        let [subject, predicate, object] = components;
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

        // Nested patterns are resolved before locking, as resolving them locks as well.
        let (Some(subject), Some(predicate), Some(object)) = (
            self.resolve_component(&pattern.subject)?,
            self.resolve_component(&pattern.predicate)?,
            self.resolve_component(&pattern.object)?,
        ) else {
            return Ok(Vec::new());
        };
        let pattern = [subject, predicate, object, EncodedTermPattern::Any];

        let bound = [
            pattern[0].is_bound(),
            pattern[1].is_bound(),
            pattern[2].is_bound(),
            false,
        ];
        let rotation = best_index_for_bound(&ROTATIONS, bound).unwrap_or_default();

        let triples = self.read();
        let Some(index) = triples.rotations.get(rotation) else {
            return Ok(Vec::new());
        };
        trace!(index = %index.components(), "Searching quoted triples");

        let pattern = order_quad_components(index.components(), &pattern);
        let entries = index.find_encoded_entries(&pattern)?;
        Ok(entries.into_iter().map(|(_, id)| id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{QuotedDictionary, TermMapDictionary};
    use itertools::Itertools;
    use quadstore_model::{Literal, NamedNode};

    fn iri(value: &str) -> Term {
        Term::NamedNode(NamedNode::new_unchecked(value))
    }

    fn example_triples() -> Vec<Term> {
        let says = iri("says");
        let nested = Term::triple(
            iri("bob"),
            says.clone(),
            Term::triple(
                iri("carol"),
                says.clone(),
                Term::Literal(Literal::new_simple_literal("Hello")),
            ),
        );
        vec![
            Term::triple(iri("violets"), iri("haveColor"), iri("blue")),
            Term::triple(iri("violets"), iri("haveColor"), iri("darkBlue")),
            Term::triple(iri("roses"), iri("haveColor"), iri("red")),
            Term::triple(iri("alice"), says.clone(), nested),
            Term::triple(iri("alice"), iri("likes"), iri("violets")),
        ]
    }

    /// Builds one pattern per combination of bound and unbound components of `triple`.
    fn patterns_for(triple: &Quad) -> Vec<Quad> {
        let components = [&triple.subject, &triple.predicate, &triple.object];
        (0..3)
            .map(|_| [false, true])
            .multi_cartesian_product()
            .map(|bound| {
                let [subject, predicate, object] = std::array::from_fn(|i| {
                    if bound[i] {
                        components[i].clone()
                    } else {
                        Term::variable(format!("v{i}"))
                    }
                });
                Quad::triple(subject, predicate, object)
            })
            .collect()
    }

    #[test]
    fn roundtrip_nested_triples() {
        let dictionary = QuotedIndexedDictionary::<TermMapDictionary>::default();
        for triple in example_triples() {
            let encoding = dictionary.encode(&triple).unwrap();
            assert!(encoding.is_quoted());
            assert_eq!(dictionary.decode(encoding).unwrap(), triple);
            assert_eq!(dictionary.encode(&triple).unwrap(), encoding);
            assert_eq!(dictionary.encode_optional(&triple).unwrap(), Some(encoding));
        }
    }

    #[test]
    fn decode_unknown_quoted_id_fails() {
        let dictionary = QuotedIndexedDictionary::<TermMapDictionary>::default();
        let encoding = ObjectId::from_quoted_slot(3).unwrap();
        assert_eq!(
            dictionary.decode(encoding),
            Err(DictionaryError::not_found(encoding))
        );
    }

    #[test]
    fn equivalent_to_linear_scan() {
        let indexed = QuotedIndexedDictionary::<TermMapDictionary>::default();
        let linear = QuotedDictionary::<TermMapDictionary>::default();
        for triple in example_triples() {
            indexed.encode(&triple).unwrap();
            linear.encode(&triple).unwrap();
        }

        let mut patterns = Vec::new();
        for triple in example_triples() {
            let Term::Triple(triple) = triple else {
                continue;
            };
            patterns.extend(patterns_for(&triple));
        }
        patterns.push(Quad::triple(
            Term::variable("s"),
            iri("says"),
            Term::triple(iri("bob"), Term::variable("p"), Term::variable("o")),
        ));
        patterns.push(Quad::triple(iri("unknown"), Term::variable("p"), Term::variable("o")));

        for pattern in patterns {
            let expected = linear
                .find_quoted_triples(&pattern)
                .unwrap()
                .into_iter()
                .sorted_by_key(ToString::to_string)
                .collect::<Vec<_>>();
            let actual = indexed
                .find_quoted_triples(&pattern)
                .unwrap()
                .into_iter()
                .sorted_by_key(ToString::to_string)
                .collect::<Vec<_>>();
            assert_eq!(actual, expected, "Results differ for pattern {pattern}");
        }
    }

    #[test]
    fn pattern_in_named_graph_matches_nothing() {
        let dictionary = QuotedIndexedDictionary::<TermMapDictionary>::default();
        dictionary
            .encode(&Term::triple(iri("s"), iri("p"), iri("o")))
            .unwrap();

        let pattern = Quad::new(Term::variable("s"), iri("p"), iri("o"), iri("g"));
        assert!(dictionary.find_quoted_triples(&pattern).unwrap().is_empty());
    }
}
