use crate::index::{
    EncodedQuadPattern, EncodedTermPattern, IndexComponents, IndexQuad, QuadIndex,
};
use quadstore_encoding::{DictionaryError, DictionaryResult, EncodedTerm, TermDictionary};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::str::FromStr;
use std::sync::Arc;

/// A record that maps the string form of an encoding to the next level.
type Record<T> = BTreeMap<String, T>;

/// A quad index that consists of four nested records keyed by the string form of the encodings.
///
/// Records are ordered maps, so quads are returned in the lexicographic order of the string forms
/// of their encodings. Encodings are parsed back with [FromStr] when they are enumerated.
#[derive(Debug)]
pub struct RecordIndex<TDictionary: TermDictionary, TValue = ()> {
    dictionary: Arc<TDictionary>,
    components: IndexComponents,
    records: Record<Record<Record<Record<TValue>>>>,
    len: usize,
}

impl<TDictionary, TValue> QuadIndex for RecordIndex<TDictionary, TValue>
where
    TDictionary: TermDictionary,
    TDictionary::Encoding: FromStr,
    TValue: Debug + Clone + Send + Sync,
{
    type Dictionary = TDictionary;
    type Encoding = TDictionary::Encoding;
    type Value = TValue;

    fn new(dictionary: Arc<TDictionary>, components: IndexComponents) -> Self {
        Self {
            dictionary,
            components,
            records: BTreeMap::new(),
            len: 0,
        }
    }

    fn components(&self) -> IndexComponents {
        self.components
    }

    fn dictionary(&self) -> &Arc<TDictionary> {
        &self.dictionary
    }

    fn len(&self) -> usize {
        self.len
    }

    fn set(&mut self, quad: IndexQuad<Self::Encoding>, value: TValue) -> bool {
        let [first, second, third, fourth] = quad.0.map(|term| term.to_string());
        let leaf = self
            .records
            .entry(first)
            .or_default()
            .entry(second)
            .or_default()
            .entry(third)
            .or_default();

        match leaf.entry(fourth) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value);
                self.len += 1;
                true
            }
        }
    }

    fn remove(&mut self, quad: &IndexQuad<Self::Encoding>) -> bool {
        let [first, second, third, fourth] = quad.0.map(|term| term.to_string());
        let Some(level1) = self.records.get_mut(&first) else {
            return false;
        };
        let Some(level2) = level1.get_mut(&second) else {
            return false;
        };
        let Some(level3) = level2.get_mut(&third) else {
            return false;
        };
        if level3.remove(&fourth).is_none() {
            return false;
        }

        if level3.is_empty() {
            level2.remove(&third);
        }
        if level2.is_empty() {
            level1.remove(&second);
        }
        if level1.is_empty() {
            self.records.remove(&first);
        }
        self.len -= 1;
        true
    }

    fn get_encoded(&self, quad: &IndexQuad<Self::Encoding>) -> Option<&TValue> {
        let [first, second, third, fourth] = quad.0.map(|term| term.to_string());
        self.records
            .get(&first)?
            .get(&second)?
            .get(&third)?
            .get(&fourth)
    }

    fn find_encoded_entries(
        &self,
        pattern: &EncodedQuadPattern<Self::Encoding>,
    ) -> DictionaryResult<Vec<(IndexQuad<Self::Encoding>, TValue)>> {
        let mut result = Vec::new();
        for (first, level1) in fields(&self.records, &pattern[0])? {
            for (second, level2) in fields(level1, &pattern[1])? {
                for (third, level3) in fields(level2, &pattern[2])? {
                    for (fourth, value) in fields(level3, &pattern[3])? {
                        let quad = IndexQuad([first, second, third, fourth]);
                        result.push((quad, value.clone()));
                    }
                }
            }
        }
        Ok(result)
    }

    fn count_encoded(&self, pattern: &EncodedQuadPattern<Self::Encoding>) -> usize {
        if pattern.iter().all(|pattern| !pattern.is_bound()) {
            return self.len;
        }

        let mut count = 0;
        for level1 in field_values(&self.records, &pattern[0]) {
            for level2 in field_values(level1, &pattern[1]) {
                for level3 in field_values(level2, &pattern[2]) {
                    count += match &pattern[3] {
                        EncodedTermPattern::Any => level3.len(),
                        pattern => field_values(level3, pattern).count(),
                    };
                }
            }
        }
        count
    }

    fn clear(&mut self) {
        self.records.clear();
        self.len = 0;
    }
}

/// Returns the fields of `record` that match `pattern`, together with their parsed keys.
fn fields<'record, TTerm, TValue>(
    record: &'record Record<TValue>,
    pattern: &EncodedTermPattern<TTerm>,
) -> DictionaryResult<Vec<(TTerm, &'record TValue)>>
where
    TTerm: EncodedTerm + FromStr,
{
    match pattern {
        EncodedTermPattern::Any => record
            .iter()
            .map(|(key, value)| Ok((parse_key(key)?, value)))
            .collect(),
        EncodedTermPattern::Is(term) => Ok(record
            .get(&term.to_string())
            .map(|value| (*term, value))
            .into_iter()
            .collect()),
        EncodedTermPattern::OneOf(terms) => {
            let mut result = terms
                .iter()
                .map(|term| (term.to_string(), *term))
                .filter_map(|(key, term)| {
                    let (key, value) = record.get_key_value(&key)?;
                    Some((key, term, value))
                })
                .collect::<Vec<_>>();
            result.sort_unstable_by(|(lhs, ..), (rhs, ..)| lhs.cmp(rhs));
            Ok(result
                .into_iter()
                .map(|(_, term, value)| (term, value))
                .collect())
        }
    }
}

/// Returns the values of all fields of `record` that match `pattern` without parsing keys.
fn field_values<'record, TTerm: EncodedTerm, TValue>(
    record: &'record Record<TValue>,
    pattern: &EncodedTermPattern<TTerm>,
) -> Box<dyn Iterator<Item = &'record TValue> + 'record> {
    match pattern {
        EncodedTermPattern::Any => Box::new(record.values()),
        EncodedTermPattern::Is(term) => Box::new(record.get(&term.to_string()).into_iter()),
        EncodedTermPattern::OneOf(terms) => {
            let values = terms
                .iter()
                .filter_map(|term| record.get(&term.to_string()))
                .collect::<Vec<_>>();
            Box::new(values.into_iter())
        }
    }
}

fn parse_key<TTerm: FromStr>(key: &str) -> DictionaryResult<TTerm> {
    key.parse().map_err(|_| {
        DictionaryError::Corrupted(format!("Record key '{key}' is not a valid encoding."))
    })
}
