use crate::index::{EncodedQuadPattern, IndexComponents, IndexQuad, QuadIndex};
use crate::memory::index::level::{IndexLeaf, IndexLevel, IndexLevelImpl};
use quadstore_encoding::{DictionaryResult, TermDictionary};
use std::fmt::Debug;
use std::sync::Arc;

type NestedLevels<TTerm, TValue> =
    IndexLevel<TTerm, IndexLevel<TTerm, IndexLevel<TTerm, IndexLeaf<TTerm, TValue>>>>;

/// A quad index that consists of four nested hash map levels.
///
/// Each level has its own type, so the depth of the index is fixed at compile time.
#[derive(Debug)]
pub struct NestedMapIndex<TDictionary: TermDictionary, TValue = ()> {
    dictionary: Arc<TDictionary>,
    components: IndexComponents,
    levels: NestedLevels<TDictionary::Encoding, TValue>,
}

impl<TDictionary, TValue> QuadIndex for NestedMapIndex<TDictionary, TValue>
where
    TDictionary: TermDictionary,
    TValue: Debug + Clone + Send + Sync,
{
    type Dictionary = TDictionary;
    type Encoding = TDictionary::Encoding;
    type Value = TValue;

    fn new(dictionary: Arc<TDictionary>, components: IndexComponents) -> Self {
        Self {
            dictionary,
            components,
            levels: NestedLevels::default(),
        }
    }

    fn components(&self) -> IndexComponents {
        self.components
    }

    fn dictionary(&self) -> &Arc<TDictionary> {
        &self.dictionary
    }

    fn len(&self) -> usize {
        self.levels.num_quads()
    }

    fn set(&mut self, quad: IndexQuad<Self::Encoding>, value: TValue) -> bool {
        self.levels.insert(&quad, value, 0)
    }

    fn remove(&mut self, quad: &IndexQuad<Self::Encoding>) -> bool {
        self.levels.remove(quad, 0)
    }

    fn get_encoded(&self, quad: &IndexQuad<Self::Encoding>) -> Option<&TValue> {
        self.levels.get(quad, 0)
    }

    fn find_encoded_entries(
        &self,
        pattern: &EncodedQuadPattern<Self::Encoding>,
    ) -> DictionaryResult<Vec<(IndexQuad<Self::Encoding>, TValue)>> {
        let mut result = Vec::new();
        self.levels
            .collect(pattern, &mut Vec::with_capacity(4), &mut result);
        Ok(result)
    }

    fn count_encoded(&self, pattern: &EncodedQuadPattern<Self::Encoding>) -> usize {
        self.levels.count(pattern, 0)
    }

    fn clear(&mut self) {
        self.levels = NestedLevels::default();
    }
}
