use crate::{DictionaryError, DictionaryResult, EncodedTerm};
use quadstore_model::{Quad, Term};
use std::fmt::Debug;

/// A bidirectional mapping between terms and their encodings.
///
/// Encodings are allocated lazily on the first call to [TermDictionary::encode] and then stay
/// stable for the lifetime of the dictionary. Entries are never removed or reassigned.
///
/// All methods take `&self`. Implementations synchronize internally, such that allocating an
/// encoding and publishing it is a single atomic step. A dictionary is usually shared by multiple
/// indexes via an [Arc](std::sync::Arc).
///
/// # Quoted Triples
///
/// Dictionaries that support quoted triples also support searching for stored quoted triples that
/// match a pattern (see [TermDictionary::find_quoted_triples]). All other dictionaries return
/// [DictionaryError::Unsupported] from these methods.
pub trait TermDictionary: Debug + Send + Sync {
    /// The encoding that is issued by this dictionary.
    type Encoding: EncodedTerm;

    /// Returns the encoding of `term`, allocating a new one if the term has not been seen before.
    ///
    /// # Errors
    ///
    /// - [DictionaryError::Unsupported] if `term` is or contains a variable, or if `term` is a
    ///   quoted triple and the dictionary does not support them.
    /// - [DictionaryError::InvalidArgument] if `term` contains a quoted triple in a non-default
    ///   graph.
    fn encode(&self, term: &Term) -> DictionaryResult<Self::Encoding>;

    /// Returns the encoding of `term` if it has been encoded before. Never allocates.
    ///
    /// # Errors
    ///
    /// The same as [TermDictionary::encode].
    fn encode_optional(&self, term: &Term) -> DictionaryResult<Option<Self::Encoding>>;

    /// Returns the term for the given `encoding`.
    ///
    /// # Errors
    ///
    /// Returns [DictionaryError::NotFound] if the encoding has never been issued by this
    /// dictionary.
    fn decode(&self, encoding: Self::Encoding) -> DictionaryResult<Term>;

    /// Returns all encodings that have been issued so far. The order is unspecified.
    fn encodings(&self) -> DictionaryResult<Vec<Self::Encoding>>;

    /// Returns true if this dictionary can encode quoted triples and search for them.
    fn supports_quoted_triples(&self) -> bool {
        false
    }

    /// Returns the encodings of all stored quoted triples that match `pattern`.
    ///
    /// Variables in the pattern, including variables nested in quoted sub-patterns, match any
    /// term. The graph of `pattern` must be the default graph or a variable. Otherwise, the result
    /// is empty as quoted triples only exist in the default graph.
    fn find_quoted_triples_encoded(
        &self,
        _pattern: &Quad,
    ) -> DictionaryResult<Vec<Self::Encoding>> {
        Err(DictionaryError::Unsupported(format!(
            "{} does not support quoted triples.",
            std::any::type_name::<Self>()
        )))
    }

    /// Returns all stored quoted triples that match `pattern`.
    ///
    /// See [TermDictionary::find_quoted_triples_encoded].
    fn find_quoted_triples(&self, pattern: &Quad) -> DictionaryResult<Vec<Term>> {
        self.find_quoted_triples_encoded(pattern)?
            .into_iter()
            .map(|encoding| self.decode(encoding))
            .collect()
    }
}

/// Checks that `term` can be stored in a dictionary.
///
/// # Errors
///
/// - [DictionaryError::Unsupported] if `term` is or (transitively) contains a variable.
/// - [DictionaryError::InvalidArgument] if `term` (transitively) contains a quoted triple whose
///   graph is not the default graph.
pub fn ensure_encodable(term: &Term) -> DictionaryResult<()> {
    match term {
        Term::Variable(variable) => Err(DictionaryError::Unsupported(format!(
            "Variable {variable} cannot be encoded."
        ))),
        Term::Triple(triple) => {
            if !triple.graph.is_default_graph() {
                return Err(DictionaryError::InvalidArgument(format!(
                    "Quoted triple {triple} is not in the default graph."
                )));
            }
            ensure_encodable(&triple.subject)?;
            ensure_encodable(&triple.predicate)?;
            ensure_encodable(&triple.object)
        }
        _ => Ok(()),
    }
}

/// Returns true if quoted triples matching `pattern` may exist at all, i.e., if the graph of the
/// pattern is the default graph or a variable.
pub fn quoted_pattern_graph_matches(pattern: &Quad) -> bool {
    matches!(pattern.graph, Term::DefaultGraph | Term::Variable(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadstore_model::NamedNode;

    fn iri(value: &str) -> Term {
        Term::NamedNode(NamedNode::new_unchecked(value))
    }

    #[test]
    fn variables_are_unsupported() {
        assert!(matches!(
            ensure_encodable(&Term::variable("x")),
            Err(DictionaryError::Unsupported(_))
        ));
        assert!(matches!(
            ensure_encodable(&Term::triple(iri("s"), iri("p"), Term::variable("o"))),
            Err(DictionaryError::Unsupported(_))
        ));
    }

    #[test]
    fn quoted_triples_must_be_in_default_graph() {
        let quoted = Term::Triple(Box::new(Quad::new(iri("s"), iri("p"), iri("o"), iri("g"))));
        assert!(matches!(
            ensure_encodable(&quoted),
            Err(DictionaryError::InvalidArgument(_))
        ));

        let nested = Term::triple(iri("a"), iri("b"), quoted);
        assert!(matches!(
            ensure_encodable(&nested),
            Err(DictionaryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn plain_and_quoted_terms_are_encodable() {
        assert_eq!(ensure_encodable(&iri("s")), Ok(()));
        assert_eq!(ensure_encodable(&Term::DefaultGraph), Ok(()));
        assert_eq!(
            ensure_encodable(&Term::triple(iri("s"), iri("p"), iri("o"))),
            Ok(())
        );
    }

    #[test]
    fn quoted_pattern_graphs() {
        assert!(quoted_pattern_graph_matches(&Quad::triple(
            iri("s"),
            iri("p"),
            iri("o")
        )));
        assert!(quoted_pattern_graph_matches(&Quad::new(
            iri("s"),
            iri("p"),
            iri("o"),
            Term::variable("g")
        )));
        assert!(!quoted_pattern_graph_matches(&Quad::new(
            iri("s"),
            iri("p"),
            iri("o"),
            iri("g")
        )));
    }
}
