use quadstore_encoding::{
    ensure_encodable, quoted_pattern_graph_matches, DictionaryError, DictionaryResult, ObjectId,
    TermDictionary,
};
use quadstore_model::{Quad, Term};

/// A dictionary that stores plain terms in one dictionary and quoted triples in a separate
/// sub-dictionary.
///
/// The ids of quoted triples are the ids from the sub-dictionary with the [ObjectId::BITMASK] set.
/// The components of a quoted triple are registered in this dictionary before the triple itself.
///
/// Searching for quoted triples scans all stored quoted triples. See
/// [QuotedIndexedDictionary](super::QuotedIndexedDictionary) for an indexed alternative.
#[derive(Debug, Default)]
pub struct QuotedDictionary<TPlain, TQuoted = TPlain> {
    plain: TPlain,
    quoted: TQuoted,
}

impl<TPlain, TQuoted> QuotedDictionary<TPlain, TQuoted>
where
    TPlain: TermDictionary<Encoding = ObjectId>,
    TQuoted: TermDictionary<Encoding = ObjectId>,
{
    /// Creates a new [QuotedDictionary]. `quoted` must accept quoted triples as opaque terms.
    pub fn new(plain: TPlain, quoted: TQuoted) -> Self {
        Self { plain, quoted }
    }

    /// Returns the dictionary for plain terms.
    pub fn plain(&self) -> &TPlain {
        &self.plain
    }

    /// Returns the ids of all quoted triples in the sub-dictionary (without the bitmask).
    fn quoted_ids(&self) -> DictionaryResult<Vec<ObjectId>> {
        let default_graph = self.quoted.encode_optional(&Term::DefaultGraph)?;
        let mut ids = self.quoted.encodings()?;
        ids.retain(|id| Some(*id) != default_graph);
        Ok(ids)
    }
}

impl<TPlain, TQuoted> TermDictionary for QuotedDictionary<TPlain, TQuoted>
where
    TPlain: TermDictionary<Encoding = ObjectId>,
    TQuoted: TermDictionary<Encoding = ObjectId>,
{
    type Encoding = ObjectId;

    fn encode(&self, term: &Term) -> DictionaryResult<ObjectId> {
        let Term::Triple(triple) = term else {
            return self.plain.encode(term);
        };

        ensure_encodable(term)?;
        self.encode(&triple.subject)?;
        self.encode(&triple.predicate)?;
        self.encode(&triple.object)?;
        self.quoted.encode(term)?.to_quoted()
    }

    fn encode_optional(&self, term: &Term) -> DictionaryResult<Option<ObjectId>> {
        if term.as_triple().is_none() {
            return self.plain.encode_optional(term);
        }

        ensure_encodable(term)?;
        self.quoted
            .encode_optional(term)?
            .map(ObjectId::to_quoted)
            .transpose()
    }

    fn decode(&self, encoding: ObjectId) -> DictionaryResult<Term> {
        if !encoding.is_quoted() {
            return self.plain.decode(encoding);
        }

        match self.quoted.decode(encoding.without_bitmask()) {
            Ok(term @ Term::Triple(_)) => Ok(term),
            Ok(_) | Err(DictionaryError::NotFound { .. }) => {
                Err(DictionaryError::not_found(encoding))
            }
            Err(error) => Err(error),
        }
    }

    fn encodings(&self) -> DictionaryResult<Vec<ObjectId>> {
        let mut encodings = self.plain.encodings()?;
        for id in self.quoted_ids()? {
            encodings.push(id.to_quoted()?);
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

        let mut result = Vec::new();
        for id in self.quoted_ids()? {
            if let Term::Triple(triple) = self.quoted.decode(id)? {
                if triple.matches(pattern) {
                    result.push(id.to_quoted()?);
                }
            }
        }
        Ok(result)
    }
}
