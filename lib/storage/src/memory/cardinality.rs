use rustc_hash::FxHashMap;
use std::hash::Hash;

/// A reference-counted multiset.
///
/// Keys are removed once their count drops to zero, so [CardinalitySet::keys] only returns keys
/// that are currently in use.
#[derive(Debug, Clone)]
pub struct CardinalitySet<TKey> {
    counts: FxHashMap<TKey, usize>,
}

impl<TKey: Eq + Hash> Default for CardinalitySet<TKey> {
    fn default() -> Self {
        Self::new()
    }
}

impl<TKey: Eq + Hash> CardinalitySet<TKey> {
    /// Creates a new empty [CardinalitySet].
    pub fn new() -> Self {
        Self {
            counts: FxHashMap::default(),
        }
    }

    /// Increments the count of `key` and returns the new count.
    pub fn add(&mut self, key: TKey) -> usize {
        let count = self.counts.entry(key).or_default();
        *count += 1;
        *count
    }

    /// Decrements the count of `key` and returns the new count.
    ///
    /// Removing an absent key is a no-op that returns zero.
    pub fn remove(&mut self, key: &TKey) -> usize {
        let Some(count) = self.counts.get_mut(key) else {
            return 0;
        };

        *count -= 1;
        let count = *count;
        if count == 0 {
            self.counts.remove(key);
        }
        count
    }

    /// Returns the current count of `key`, which is zero for absent keys.
    pub fn count(&self, key: &TKey) -> usize {
        self.counts.get(key).copied().unwrap_or_default()
    }

    /// Returns all keys with a count greater than zero.
    pub fn keys(&self) -> impl Iterator<Item = &TKey> {
        self.counts.keys()
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
