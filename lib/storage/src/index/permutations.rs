use crate::error::StorageError;
use crate::index::{
    best_index, order_quad_components, restore_quad_components, IndexComponents, IndexQuad,
    QuadIndex,
};
use crate::memory::CardinalitySet;
use itertools::Itertools;
use quadstore_encoding::TermDictionary;
use quadstore_model::{Quad, Term, TermPattern};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};

/// Configures the indexes of an [IndexPermutations].
///
/// The components are (de)serialized in their string form, e.g.,
/// `{"components": ["GSPO", "GPOS"], "index_nodes": false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfiguration {
    /// One index is created for each entry.
    pub components: Vec<IndexComponents>,
    /// Whether to keep track of the terms that are used as subject or object.
    #[serde(default)]
    pub index_nodes: bool,
}

impl IndexConfiguration {
    /// Creates a new [IndexConfiguration] without a node index.
    pub fn new(components: impl IntoIterator<Item = IndexComponents>) -> Self {
        Self {
            components: components.into_iter().collect(),
            index_nodes: false,
        }
    }

    /// Enables or disables the node index.
    #[must_use]
    pub fn with_node_index(mut self, index_nodes: bool) -> Self {
        self.index_nodes = index_nodes;
        self
    }

    /// Checks that at least one index is configured and that no index is configured twice.
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.components.is_empty() {
            return Err(StorageError::InvalidConfiguration(
                "At least one index must be configured.".to_owned(),
            ));
        }

        if let Some(duplicate) = self.components.iter().duplicates().next() {
            return Err(StorageError::InvalidConfiguration(format!(
                "Index {duplicate} is configured more than once."
            )));
        }

        Ok(())
    }
}

impl Default for IndexConfiguration {
    fn default() -> Self {
        Self::new([
            IndexComponents::GSPO,
            IndexComponents::GPOS,
            IndexComponents::GOSP,
        ])
    }
}

/// Represents a set of multiple indexes, each of which indexes a different ordering of the
/// quad components (e.g., GSPO, GPOS). This is necessary as different quad patterns require
/// different index structures.
///
/// For example, the pattern `<S> <P> ?o` can be best served by having an SPO index. The lookup would
/// then look up `<S>`, traverse into the next level looking up `<P>`, and lastly enumerate the
/// entries and bind them to `?o`. However, the pattern `?s <P> <O>` cannot be efficiently
/// evaluated with an SPO index. For this pattern, a POS or OPS index should be used.
///
/// All indexes share one dictionary and are kept consistent: every insertion and deletion touches
/// all of them. Quads and patterns are given in subject, predicate, object, graph order.
#[derive(Debug)]
pub struct IndexPermutations<TIndex: QuadIndex> {
    /// The dictionary that is shared by all indexes.
    dictionary: Arc<TIndex::Dictionary>,
    /// The index variations.
    indexes: Vec<TIndex>,
    /// Counts how often a term is used as subject or object, if enabled.
    nodes: Option<CardinalitySet<TIndex::Encoding>>,
}

impl<TIndex: QuadIndex<Value = ()>> IndexPermutations<TIndex> {
    /// Creates a new [IndexPermutations] with one empty index per configured permutation.
    ///
    /// # Errors
    ///
    /// Returns [StorageError::InvalidConfiguration] if the configuration is invalid (see
    /// [IndexConfiguration::validate]).
    pub fn new(
        dictionary: Arc<TIndex::Dictionary>,
        configuration: &IndexConfiguration,
    ) -> Result<Self, StorageError> {
        configuration.validate()?;

        let indexes = configuration
            .components
            .iter()
            .map(|components| TIndex::new(Arc::clone(&dictionary), *components))
            .collect::<Vec<_>>();
        debug!(
            indexes = %configuration.components.iter().join(","),
            index_nodes = configuration.index_nodes,
            "Created index permutations"
        );

        Ok(Self {
            dictionary,
            indexes,
            nodes: configuration.index_nodes.then(CardinalitySet::new),
        })
    }

    /// Returns the dictionary that is shared by all indexes.
    pub fn dictionary(&self) -> &Arc<TIndex::Dictionary> {
        &self.dictionary
    }

    /// Finds an index with the given `components`.
    pub fn find_index(&self, components: IndexComponents) -> Option<&TIndex> {
        self.indexes
            .iter()
            .find(|index| index.components() == components)
    }

    /// Chooses the index for evaluating `pattern` and returns its position.
    pub fn choose_index(&self, pattern: &TermPattern<'_>) -> usize {
        let candidates = self
            .indexes
            .iter()
            .map(QuadIndex::components)
            .collect::<Vec<_>>();
        let chosen = best_index(&candidates, pattern).unwrap_or_default();
        trace!(
            index = %candidates.get(chosen).map(ToString::to_string).unwrap_or_default(),
            "Chose index for pattern"
        );
        chosen
    }

    /// Returns the number of quads.
    pub fn len(&self) -> usize {
        self.indexes.first().map_or(0, QuadIndex::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts `quad` into all indexes, encoding its terms if necessary.
    ///
    /// Returns false if the quad was already present. If any term cannot be stored, the dictionary
    /// is left unchanged.
    pub fn add(&mut self, quad: &Quad) -> Result<bool, StorageError> {
        // Rejects unstorable terms before the first encoding is allocated.
        for term in quad.terms() {
            self.dictionary.encode_optional(term)?;
        }

        let encoded = [
            self.dictionary.encode(&quad.subject)?,
            self.dictionary.encode(&quad.predicate)?,
            self.dictionary.encode(&quad.object)?,
            self.dictionary.encode(&quad.graph)?,
        ];

        let mut inserted = false;
        for index in &mut self.indexes {
            inserted = index.set(IndexQuad::for_index(index.components(), &encoded), ());
        }

        if inserted {
            if let Some(nodes) = &mut self.nodes {
                nodes.add(encoded[0]);
                nodes.add(encoded[2]);
            }
        }

        Ok(inserted)
    }

    /// Removes `quad` from all indexes.
    ///
    /// Returns false if the quad was not present.
    pub fn remove(&mut self, quad: &Quad) -> Result<bool, StorageError> {
        let Some(encoded) = self.encode_quad_optional(quad)? else {
            return Ok(false);
        };

        let mut removed = false;
        for index in &mut self.indexes {
            let components = index.components();
            removed = index.remove(&IndexQuad::for_index(components, &encoded));
        }

        if removed {
            if let Some(nodes) = &mut self.nodes {
                nodes.remove(&encoded[0]);
                nodes.remove(&encoded[2]);
            }
        }

        Ok(removed)
    }

    /// Returns true if `quad` is present.
    pub fn contains(&self, quad: &Quad) -> Result<bool, StorageError> {
        let (Some(encoded), Some(index)) = (self.encode_quad_optional(quad)?, self.indexes.first())
        else {
            return Ok(false);
        };

        let quad = IndexQuad::for_index(index.components(), &encoded);
        Ok(index.get_encoded(&quad).is_some())
    }

    /// Returns all quads that match `pattern` using the index chosen by
    /// [IndexPermutations::choose_index].
    pub fn find(&self, pattern: &TermPattern<'_>) -> Result<Vec<Quad>, StorageError> {
        let Some(index) = self.indexes.get(self.choose_index(pattern)) else {
            return Ok(Vec::new());
        };

        let components = index.components();
        let quads = index
            .find(&order_quad_components(components, pattern))?
            .into_iter()
            .map(|terms| Quad::from_terms(restore_quad_components(components, &terms)))
            .collect();
        Ok(quads)
    }

    /// Returns the number of quads that match `pattern`.
    pub fn count(&self, pattern: &TermPattern<'_>) -> Result<usize, StorageError> {
        let Some(index) = self.indexes.get(self.choose_index(pattern)) else {
            return Ok(0);
        };

        let components = index.components();
        Ok(index.count(&order_quad_components(components, pattern))?)
    }

    /// Returns all terms that are used as subject or object of at least one quad.
    ///
    /// # Errors
    ///
    /// Returns [StorageError::InvalidConfiguration] if the node index is disabled.
    pub fn nodes(&self) -> Result<Vec<Term>, StorageError> {
        let Some(nodes) = &self.nodes else {
            return Err(StorageError::InvalidConfiguration(
                "The node index is disabled.".to_owned(),
            ));
        };

        let terms = nodes
            .keys()
            .map(|encoding| self.dictionary.decode(*encoding))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(terms)
    }

    fn encode_quad_optional(
        &self,
        quad: &Quad,
    ) -> Result<Option<[TIndex::Encoding; 4]>, StorageError> {
        let mut encoded = Vec::with_capacity(4);
        for term in quad.terms() {
            match self.dictionary.encode_optional(term)? {
                None => return Ok(None),
                Some(encoding) => encoded.push(encoding),
            }
        }
        Ok(<[TIndex::Encoding; 4]>::try_from(encoded).ok())
    }
}
