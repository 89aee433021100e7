use crate::index::{
    encode_bound_term, EncodedQuadPattern, EncodedTermPattern, IndexComponents, IndexQuad,
    QuadIndex,
};
use crate::memory::index::RecursiveIndex;
use quadstore_encoding::{DictionaryResult, TermDictionary};
use quadstore_model::{Term, TermPattern};
use std::fmt::Debug;
use std::sync::Arc;

/// A [RecursiveIndex] that can match inside quoted triples.
///
/// A pattern position that holds a quoted triple with variables is resolved to the set of all
/// stored quoted triples that match it (see [TermDictionary::find_quoted_triples_encoded]). The
/// index level is then joined against that set. The dictionary must support quoted triples for
/// such patterns.
#[derive(Debug)]
pub struct QuotedIndex<TDictionary: TermDictionary, TValue = ()> {
    inner: RecursiveIndex<TDictionary, TValue>,
}

impl<TDictionary, TValue> QuadIndex for QuotedIndex<TDictionary, TValue>
where
    TDictionary: TermDictionary,
    TValue: Debug + Clone + Send + Sync,
{
    type Dictionary = TDictionary;
    type Encoding = TDictionary::Encoding;
    type Value = TValue;

    fn new(dictionary: Arc<TDictionary>, components: IndexComponents) -> Self {
        Self {
            inner: RecursiveIndex::new(dictionary, components),
        }
    }

    fn components(&self) -> IndexComponents {
        self.inner.components()
    }

    fn dictionary(&self) -> &Arc<TDictionary> {
        self.inner.dictionary()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn set(&mut self, quad: IndexQuad<Self::Encoding>, value: TValue) -> bool {
        self.inner.set(quad, value)
    }

    fn remove(&mut self, quad: &IndexQuad<Self::Encoding>) -> bool {
        self.inner.remove(quad)
    }

    fn get_encoded(&self, quad: &IndexQuad<Self::Encoding>) -> Option<&TValue> {
        self.inner.get_encoded(quad)
    }

    fn find_encoded_entries(
        &self,
        pattern: &EncodedQuadPattern<Self::Encoding>,
    ) -> DictionaryResult<Vec<(IndexQuad<Self::Encoding>, TValue)>> {
        self.inner.find_encoded_entries(pattern)
    }

    fn count_encoded(&self, pattern: &EncodedQuadPattern<Self::Encoding>) -> usize {
        self.inner.count_encoded(pattern)
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn encode_pattern(
        &self,
        pattern: &TermPattern<'_>,
    ) -> DictionaryResult<Option<EncodedQuadPattern<Self::Encoding>>> {
        let mut result: EncodedQuadPattern<Self::Encoding> =
            std::array::from_fn(|_| EncodedTermPattern::Any);
        for (encoded, term) in result.iter_mut().zip(pattern) {
            let Some(term) = term.filter(|term| !term.is_variable()) else {
                continue;
            };

            match term {
                Term::Triple(triple) if triple.has_variables() => {
                    let candidates = self.dictionary().find_quoted_triples_encoded(triple)?;
                    if candidates.is_empty() {
                        return Ok(None);
                    }
                    *encoded = EncodedTermPattern::OneOf(candidates.into_iter().collect());
                }
                _ => match encode_bound_term::<TDictionary>(self.dictionary(), term)? {
                    None => return Ok(None),
                    Some(encoding) => *encoded = EncodedTermPattern::Is(encoding),
                },
            }
        }
        Ok(Some(result))
    }
}
