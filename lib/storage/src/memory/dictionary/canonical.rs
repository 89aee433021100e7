use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use quadstore_encoding::{DictionaryError, DictionaryResult, ObjectId};
use quadstore_model::Term;
use rustc_hash::FxHasher;
use std::fmt::Debug;
use std::hash::BuildHasherDefault;
use std::sync::Arc;
use tracing::trace;

/// What a [CanonicalTermMap] stores for restoring a term from its id.
pub trait ReverseEntry: Debug + Send + Sync + Sized {
    fn new(key: &Arc<str>, term: &Term) -> Self;

    fn to_term(&self) -> DictionaryResult<Term>;
}

/// Only keeps the canonical string and parses it again on decoding.
impl ReverseEntry for Arc<str> {
    fn new(key: &Arc<str>, _term: &Term) -> Self {
        Arc::clone(key)
    }

    fn to_term(&self) -> DictionaryResult<Term> {
        self.parse().map_err(|error| {
            DictionaryError::Corrupted(format!("Stored term '{self}' cannot be parsed: {error}"))
        })
    }
}

/// Keeps a copy of the entire term.
impl ReverseEntry for Term {
    fn new(_key: &Arc<str>, term: &Term) -> Self {
        term.clone()
    }

    fn to_term(&self) -> DictionaryResult<Term> {
        Ok(self.clone())
    }
}

/// Maps terms to object ids by their canonical string form, and object ids back to terms.
#[derive(Debug)]
pub(super) struct CanonicalTermMap<TEntry> {
    /// Maps the canonical string of a term to its object id.
    term2id: DashMap<Arc<str>, ObjectId, BuildHasherDefault<FxHasher>>,
    /// Maps object ids to what is needed for restoring the term.
    id2term: DashMap<ObjectId, TEntry, BuildHasherDefault<FxHasher>>,
}

impl<TEntry: ReverseEntry> CanonicalTermMap<TEntry> {
    /// Creates a new mapping that only contains the default graph with the given id.
    pub(super) fn with_default_graph(default_graph: ObjectId) -> Self {
        let result = Self {
            term2id: DashMap::with_hasher(BuildHasherDefault::default()),
            id2term: DashMap::with_hasher(BuildHasherDefault::default()),
        };

        let key = Arc::<str>::from(Term::DefaultGraph.to_string());
        result
            .id2term
            .insert(default_graph, TEntry::new(&key, &Term::DefaultGraph));
        result.term2id.insert(key, default_graph);
        result
    }

    /// Returns the id of `term` if it has been inserted before.
    pub(super) fn get(&self, term: &Term) -> Option<ObjectId> {
        self.term2id
            .get(term.to_string().as_str())
            .map(|entry| *entry)
    }

    /// Returns the id of `term`, calling `allocate` for a new id if the term is not yet known.
    ///
    /// The entry of the term stays locked while allocating, so each term is only assigned a
    /// single id.
    pub(super) fn get_or_insert_with(
        &self,
        term: &Term,
        allocate: impl FnOnce() -> DictionaryResult<ObjectId>,
    ) -> DictionaryResult<ObjectId> {
        let key = term.to_string();
        if let Some(id) = self.term2id.get(key.as_str()) {
            return Ok(*id);
        }

        match self.term2id.entry(Arc::from(key)) {
            Entry::Occupied(entry) => Ok(*entry.get()),
            Entry::Vacant(entry) => {
                let id = allocate()?;
                self.id2term.insert(id, TEntry::new(entry.key(), term));
                trace!(term = %entry.key(), %id, "Allocated object id");
                entry.insert(id);
                Ok(id)
            }
        }
    }

    /// Returns the term with the given `id`.
    pub(super) fn term(&self, id: ObjectId) -> DictionaryResult<Term> {
        self.id2term
            .get(&id)
            .ok_or_else(|| DictionaryError::not_found(id))?
            .to_term()
    }

    /// Returns all ids.
    pub(super) fn ids(&self) -> Vec<ObjectId> {
        self.id2term.iter().map(|entry| *entry.key()).collect()
    }
}
