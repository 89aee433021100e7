use crate::index::{all_any, EncodedQuadPattern, EncodedTermPattern, IndexQuad};
use quadstore_encoding::EncodedTerm;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::fmt::Debug;

/// Contains the logic for a single index level.
pub(super) trait IndexLevelImpl: Debug + Default + Send + Sync {
    /// The encoding of the terms in the index.
    type Term: EncodedTerm;
    /// The value that is stored for each quad.
    type Value;

    /// Inserts the quad into the index.
    fn insert(
        &mut self,
        quad: &IndexQuad<Self::Term>,
        value: Self::Value,
        cur_depth: usize,
    ) -> bool;

    /// Deletes the quad from the index.
    fn remove(&mut self, quad: &IndexQuad<Self::Term>, cur_depth: usize) -> bool;

    /// Returns the value of the quad.
    fn get(&self, quad: &IndexQuad<Self::Term>, cur_depth: usize) -> Option<&Self::Value>;

    /// The number of quads in the index part.
    fn num_quads(&self) -> usize;

    /// Collects all quads that match `pattern`. `prefix` holds the terms of the upper levels.
    fn collect(
        &self,
        pattern: &EncodedQuadPattern<Self::Term>,
        prefix: &mut Vec<Self::Term>,
        result: &mut Vec<(IndexQuad<Self::Term>, Self::Value)>,
    );

    /// Counts all quads that match `pattern`.
    fn count(&self, pattern: &EncodedQuadPattern<Self::Term>, cur_depth: usize) -> usize;
}

/// An index level is a mapping from an encoded term to the next level. By traversing multiple
/// index levels, users can access the data in the index.
///
/// The level keeps track of the number of quads below it, so counting a level without further
/// restrictions does not require a traversal.
#[derive(Debug)]
pub(super) struct IndexLevel<TTerm, TInner> {
    entries: FxHashMap<TTerm, TInner>,
    num_quads: usize,
}

impl<TTerm, TInner> Default for IndexLevel<TTerm, TInner> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
            num_quads: 0,
        }
    }
}

impl<TTerm, TInner> IndexLevelImpl for IndexLevel<TTerm, TInner>
where
    TTerm: EncodedTerm,
    TInner: IndexLevelImpl<Term = TTerm>,
{
    type Term = TTerm;
    type Value = TInner::Value;

    fn insert(
        &mut self,
        quad: &IndexQuad<TTerm>,
        value: TInner::Value,
        cur_depth: usize,
    ) -> bool {
        let part = quad.0[cur_depth];
        let content = self.entries.entry(part).or_default();
        let inserted = content.insert(quad, value, cur_depth + 1);
        if inserted {
            self.num_quads += 1;
        }
        inserted
    }

    fn remove(&mut self, quad: &IndexQuad<TTerm>, cur_depth: usize) -> bool {
        let part = quad.0[cur_depth];

        let Some(content) = self.entries.get_mut(&part) else {
            return false;
        };

        let removed = content.remove(quad, cur_depth + 1);
        if content.num_quads() == 0 {
            self.entries.remove(&part);
        }
        if removed {
            self.num_quads -= 1;
        }
        removed
    }

    fn get(&self, quad: &IndexQuad<TTerm>, cur_depth: usize) -> Option<&TInner::Value> {
        self.entries
            .get(&quad.0[cur_depth])
            .and_then(|content| content.get(quad, cur_depth + 1))
    }

    fn num_quads(&self) -> usize {
        self.num_quads
    }

    fn collect(
        &self,
        pattern: &EncodedQuadPattern<TTerm>,
        prefix: &mut Vec<TTerm>,
        result: &mut Vec<(IndexQuad<TTerm>, TInner::Value)>,
    ) {
        for (part, content) in pattern[prefix.len()].select(&self.entries) {
            prefix.push(*part);
            content.collect(pattern, prefix, result);
            prefix.pop();
        }
    }

    fn count(&self, pattern: &EncodedQuadPattern<TTerm>, cur_depth: usize) -> usize {
        if all_any(&pattern[cur_depth..]) {
            return self.num_quads;
        }

        pattern[cur_depth]
            .select(&self.entries)
            .map(|(_, content)| content.count(pattern, cur_depth + 1))
            .sum()
    }
}

/// The last index level that maps the last term of a quad to its value.
#[derive(Debug)]
pub(super) struct IndexLeaf<TTerm, TValue>(FxHashMap<TTerm, TValue>);

impl<TTerm, TValue> Default for IndexLeaf<TTerm, TValue> {
    fn default() -> Self {
        Self(FxHashMap::default())
    }
}

impl<TTerm, TValue> IndexLevelImpl for IndexLeaf<TTerm, TValue>
where
    TTerm: EncodedTerm,
    TValue: Debug + Clone + Send + Sync,
{
    type Term = TTerm;
    type Value = TValue;

    fn insert(&mut self, quad: &IndexQuad<TTerm>, value: TValue, cur_depth: usize) -> bool {
        match self.0.entry(quad.0[cur_depth]) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    fn remove(&mut self, quad: &IndexQuad<TTerm>, cur_depth: usize) -> bool {
        self.0.remove(&quad.0[cur_depth]).is_some()
    }

    fn get(&self, quad: &IndexQuad<TTerm>, cur_depth: usize) -> Option<&TValue> {
        self.0.get(&quad.0[cur_depth])
    }

    fn num_quads(&self) -> usize {
        self.0.len()
    }

    fn collect(
        &self,
        pattern: &EncodedQuadPattern<TTerm>,
        prefix: &mut Vec<TTerm>,
        result: &mut Vec<(IndexQuad<TTerm>, TValue)>,
    ) {
        let &[first, second, third] = prefix.as_slice() else {
            return;
        };

        for (part, value) in pattern[3].select(&self.0) {
            result.push((IndexQuad([first, second, third, *part]), value.clone()));
        }
    }

    fn count(&self, pattern: &EncodedQuadPattern<TTerm>, _cur_depth: usize) -> usize {
        match &pattern[3] {
            EncodedTermPattern::Any => self.0.len(),
            EncodedTermPattern::Is(part) => usize::from(self.0.contains_key(part)),
            pattern => pattern.select(&self.0).count(),
        }
    }
}
