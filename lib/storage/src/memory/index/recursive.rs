use crate::index::{all_any, EncodedQuadPattern, IndexComponents, IndexQuad, QuadIndex};
use quadstore_encoding::{DictionaryResult, EncodedTerm, TermDictionary};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::fmt::Debug;
use std::sync::Arc;

/// The depth of the last level of an index.
const LEAF_DEPTH: usize = 3;

/// A node in a [RecursiveIndex].
///
/// Branches on the first three levels map to further nodes, branches on the last level map to
/// leaves.
#[derive(Debug, Clone)]
pub enum IndexNode<TTerm: EncodedTerm, TValue> {
    /// An inner node, together with the number of quads below it.
    Branch {
        children: FxHashMap<TTerm, IndexNode<TTerm, TValue>>,
        len: usize,
    },
    /// The value of a quad.
    Leaf(TValue),
}

impl<TTerm: EncodedTerm, TValue: Clone> IndexNode<TTerm, TValue> {
    fn branch() -> Self {
        Self::Branch {
            children: FxHashMap::default(),
            len: 0,
        }
    }

    /// Returns the number of quads below this node.
    pub fn len(&self) -> usize {
        match self {
            IndexNode::Branch { len, .. } => *len,
            IndexNode::Leaf(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, quad: &IndexQuad<TTerm>, value: TValue, depth: usize) -> bool {
        let IndexNode::Branch { children, len } = self else {
            return false;
        };

        let part = quad.0[depth];
        let inserted = if depth == LEAF_DEPTH {
            match children.entry(part) {
                Entry::Occupied(_) => false,
                Entry::Vacant(entry) => {
                    entry.insert(IndexNode::Leaf(value));
                    true
                }
            }
        } else {
            children
                .entry(part)
                .or_insert_with(IndexNode::branch)
                .insert(quad, value, depth + 1)
        };

        if inserted {
            *len += 1;
        }
        inserted
    }

    fn remove(&mut self, quad: &IndexQuad<TTerm>, depth: usize) -> bool {
        let IndexNode::Branch { children, len } = self else {
            return false;
        };

        let part = quad.0[depth];
        let removed = if depth == LEAF_DEPTH {
            children.remove(&part).is_some()
        } else {
            let Some(child) = children.get_mut(&part) else {
                return false;
            };
            let removed = child.remove(quad, depth + 1);
            if child.is_empty() {
                children.remove(&part);
            }
            removed
        };

        if removed {
            *len -= 1;
        }
        removed
    }

    fn get(&self, quad: &IndexQuad<TTerm>, depth: usize) -> Option<&TValue> {
        match self {
            IndexNode::Branch { children, .. } => children
                .get(quad.0.get(depth)?)
                .and_then(|child| child.get(quad, depth + 1)),
            IndexNode::Leaf(value) => Some(value),
        }
    }

    fn collect(
        &self,
        pattern: &EncodedQuadPattern<TTerm>,
        prefix: &mut Vec<TTerm>,
        result: &mut Vec<(IndexQuad<TTerm>, TValue)>,
    ) {
        match self {
            IndexNode::Branch { children, .. } => {
                let Some(level_pattern) = pattern.get(prefix.len()) else {
                    return;
                };
                for (part, child) in level_pattern.select(children) {
                    prefix.push(*part);
                    child.collect(pattern, prefix, result);
                    prefix.pop();
                }
            }
            IndexNode::Leaf(value) => {
                if let Ok(quad) = <[TTerm; 4]>::try_from(prefix.as_slice()) {
                    result.push((IndexQuad(quad), value.clone()));
                }
            }
        }
    }

    fn count(&self, pattern: &EncodedQuadPattern<TTerm>, depth: usize) -> usize {
        match self {
            IndexNode::Branch { children, len } => {
                if all_any(&pattern[depth..]) {
                    return *len;
                }
                pattern[depth]
                    .select(children)
                    .map(|(_, child)| child.count(pattern, depth + 1))
                    .sum()
            }
            IndexNode::Leaf(_) => 1,
        }
    }
}

/// A quad index whose levels are walked by recursion over the depth instead of by one type per
/// level.
///
/// This is the base of the [QuotedIndex](super::QuotedIndex) and of the internal indexes of the
/// [QuotedIndexedDictionary](crate::memory::QuotedIndexedDictionary).
#[derive(Debug)]
pub struct RecursiveIndex<TDictionary: TermDictionary, TValue = ()> {
    dictionary: Arc<TDictionary>,
    components: IndexComponents,
    root: IndexNode<TDictionary::Encoding, TValue>,
}

impl<TDictionary, TValue> QuadIndex for RecursiveIndex<TDictionary, TValue>
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
            root: IndexNode::branch(),
        }
    }

    fn components(&self) -> IndexComponents {
        self.components
    }

    fn dictionary(&self) -> &Arc<TDictionary> {
        &self.dictionary
    }

    fn len(&self) -> usize {
        self.root.len()
    }

    fn set(&mut self, quad: IndexQuad<Self::Encoding>, value: TValue) -> bool {
        self.root.insert(&quad, value, 0)
    }

    fn remove(&mut self, quad: &IndexQuad<Self::Encoding>) -> bool {
        self.root.remove(quad, 0)
    }

    fn get_encoded(&self, quad: &IndexQuad<Self::Encoding>) -> Option<&TValue> {
        self.root.get(quad, 0)
    }

    fn find_encoded_entries(
        &self,
        pattern: &EncodedQuadPattern<Self::Encoding>,
    ) -> DictionaryResult<Vec<(IndexQuad<Self::Encoding>, TValue)>> {
        let mut result = Vec::new();
        self.root
            .collect(pattern, &mut Vec::with_capacity(4), &mut result);
        Ok(result)
    }

    fn count_encoded(&self, pattern: &EncodedQuadPattern<Self::Encoding>) -> usize {
        self.root.count(pattern, 0)
    }

    fn clear(&mut self) {
        self.root = IndexNode::branch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::TermMapDictionary;
    use quadstore_encoding::ObjectId;

    fn quad(ids: [u32; 4]) -> IndexQuad<ObjectId> {
        IndexQuad(ids.map(ObjectId::new))
    }

    #[test]
    fn remove_prunes_empty_branches() {
        let mut index = RecursiveIndex::<TermMapDictionary>::new(
            Arc::new(TermMapDictionary::new()),
            IndexComponents::GSPO,
        );
        assert!(index.set(quad([1, 2, 3, 4]), ()));
        assert!(index.set(quad([1, 2, 5, 6]), ()));
        assert!(index.set(quad([7, 2, 3, 4]), ()));

        assert!(index.remove(&quad([1, 2, 3, 4])));
        assert!(index.remove(&quad([1, 2, 5, 6])));

        let IndexNode::Branch { children, len } = &index.root else {
            panic!("Root must be a branch");
        };
        assert_eq!(*len, 1);
        assert_eq!(children.len(), 1);
        assert!(children.contains_key(&ObjectId::new(7)));
    }

    #[test]
    fn branch_lengths_count_quads() {
        let mut index = RecursiveIndex::<TermMapDictionary>::new(
            Arc::new(TermMapDictionary::new()),
            IndexComponents::GSPO,
        );
        index.set(quad([1, 2, 3, 4]), ());
        index.set(quad([1, 2, 3, 5]), ());
        index.set(quad([1, 3, 3, 5]), ());

        let IndexNode::Branch { children, .. } = &index.root else {
            panic!("Root must be a branch");
        };
        assert_eq!(children.get(&ObjectId::new(1)).map(IndexNode::len), Some(3));
    }
}
