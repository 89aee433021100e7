//! Thread-safe in-memory implementations of [TermDictionary](quadstore_encoding::TermDictionary).
//!
//! All dictionaries that use [ObjectId](quadstore_encoding::ObjectId)s pre-allocate the default
//! graph. The quoted dictionaries wrap a plain dictionary and add support for quoted triples,
//! whose ids have the [ObjectId::BITMASK](quadstore_encoding::ObjectId::BITMASK) set.

mod canonical;
mod counter;
mod partitioned;
mod quoted;
mod quoted_indexed;
mod referential;
mod sequential;
mod symbol;

pub use canonical::ReverseEntry;
pub use partitioned::PartitionedDictionary;
pub use quoted::QuotedDictionary;
pub use quoted_indexed::QuotedIndexedDictionary;
pub use referential::ReferentialQuotedDictionary;
pub use sequential::{CanonicalDictionary, StringDictionary, TermMapDictionary};
pub use symbol::SymbolDictionary;

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use quadstore_encoding::{DictionaryError, ObjectId, TermDictionary};
    use quadstore_model::{Literal, NamedNode, Quad, Term};

    fn iri(value: &str) -> Term {
        Term::NamedNode(NamedNode::new_unchecked(value))
    }

    fn says() -> Term {
        iri("http://example.com/says")
    }

    fn hello_chain() -> Term {
        Term::triple(
            iri("http://example.com/alice"),
            says(),
            Term::triple(
                iri("http://example.com/bob"),
                says(),
                Term::triple(
                    iri("http://example.com/carol"),
                    says(),
                    Term::Literal(Literal::new_simple_literal("Hello")),
                ),
            ),
        )
    }

    fn quoted_dictionaries() -> Vec<(&'static str, Box<dyn TermDictionary<Encoding = ObjectId>>)> {
        vec![
            (
                "linear",
                Box::new(QuotedDictionary::<TermMapDictionary>::default()),
            ),
            (
                "linear-string",
                Box::new(QuotedDictionary::<StringDictionary>::default()),
            ),
            (
                "indexed",
                Box::new(QuotedIndexedDictionary::<TermMapDictionary>::default()),
            ),
            (
                "indexed-partitioned",
                Box::new(QuotedIndexedDictionary::new(PartitionedDictionary::new())),
            ),
            (
                "referential",
                Box::new(ReferentialQuotedDictionary::<TermMapDictionary>::default()),
            ),
        ]
    }

    fn sorted(dictionary: &dyn TermDictionary<Encoding = ObjectId>, pattern: &Quad) -> Vec<String> {
        dictionary
            .find_quoted_triples(pattern)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .sorted()
            .collect()
    }

    #[test]
    fn plain_and_quoted_ids_are_disjoint() {
        for (name, dictionary) in quoted_dictionaries() {
            let plain = dictionary.encode(&iri("http://example.com/a")).unwrap();
            let quoted = dictionary
                .encode(&Term::triple(
                    iri("http://example.com/a"),
                    iri("http://example.com/a"),
                    iri("http://example.com/a"),
                ))
                .unwrap();
            assert!(!plain.is_quoted(), "{name}");
            assert!(quoted.is_quoted(), "{name}");
            assert_ne!(plain.without_bitmask(), ObjectId::NOT_FOUND, "{name}");
        }
    }

    #[test]
    fn decode_nested_triples() {
        for (name, dictionary) in quoted_dictionaries() {
            let term = hello_chain();
            let encoding = dictionary.encode(&term).unwrap();
            assert_eq!(dictionary.decode(encoding).unwrap(), term, "{name}");
        }
    }

    #[test]
    fn decode_not_found() {
        for (name, dictionary) in quoted_dictionaries() {
            assert_eq!(
                dictionary.decode(ObjectId::NOT_FOUND),
                Err(DictionaryError::not_found(ObjectId::NOT_FOUND)),
                "{name}"
            );
        }
    }

    #[test]
    fn default_graph_is_preallocated() {
        for (name, dictionary) in quoted_dictionaries() {
            let before = dictionary.encodings().unwrap();
            let encoding = dictionary.encode_optional(&Term::DefaultGraph).unwrap();
            assert!(encoding.is_some(), "{name}");
            assert_eq!(before.len(), 1, "{name}");
            assert_eq!(
                dictionary.decode(before[0]).unwrap(),
                Term::DefaultGraph,
                "{name}"
            );
        }
    }

    #[test]
    fn quoted_triple_in_named_graph_is_rejected() {
        for (name, dictionary) in quoted_dictionaries() {
            let term = Term::Triple(Box::new(Quad::new(
                iri("http://example.com/s"),
                iri("http://example.com/p"),
                iri("http://example.com/o"),
                iri("http://example.com/g"),
            )));
            assert!(
                matches!(
                    dictionary.encode(&term),
                    Err(DictionaryError::InvalidArgument(_))
                ),
                "{name}"
            );
        }
    }

    #[test]
    fn find_quoted_triples_with_nested_pattern() {
        for (name, dictionary) in quoted_dictionaries() {
            dictionary.encode(&hello_chain()).unwrap();
            dictionary
                .encode(&Term::triple(
                    iri("http://example.com/violets"),
                    iri("http://example.com/haveColor"),
                    iri("http://example.com/blue"),
                ))
                .unwrap();

            let pattern = Quad::triple(
                iri("http://example.com/alice"),
                says(),
                Term::triple(Term::variable("who"), says(), Term::variable("what")),
            );
            let result = dictionary.find_quoted_triples(&pattern).unwrap();
            assert_eq!(result, vec![hello_chain()], "{name}");

            let pattern = Quad::triple(
                Term::variable("s"),
                iri("http://example.com/haveColor"),
                Term::variable("o"),
            );
            insta::allow_duplicates! {
                insta::assert_debug_snapshot!(sorted(dictionary.as_ref(), &pattern), @r#"
                [
                    "<<<http://example.com/violets> <http://example.com/haveColor> <http://example.com/blue>>>",
                ]
                "#);
            }
        }
    }

    #[test]
    fn all_quoted_dictionaries_find_the_same_triples() {
        let dictionaries = quoted_dictionaries();
        let triples = [
            hello_chain(),
            Term::triple(iri("v"), iri("color"), iri("blue")),
            Term::triple(iri("r"), iri("color"), iri("red")),
            Term::triple(iri("v"), iri("smell"), Literal::new_simple_literal("sweet")),
            Term::triple(
                Term::triple(iri("v"), iri("color"), iri("blue")),
                iri("statedBy"),
                iri("poet"),
            ),
        ];
        for (_, dictionary) in &dictionaries {
            for triple in &triples {
                dictionary.encode(triple).unwrap();
            }
        }

        let variable = |name: &str| Term::variable(name);
        let patterns = [
            Quad::triple(variable("s"), variable("p"), variable("o")),
            Quad::triple(iri("v"), variable("p"), variable("o")),
            Quad::triple(variable("s"), iri("color"), variable("o")),
            Quad::triple(variable("s"), variable("p"), iri("blue")),
            Quad::triple(iri("v"), iri("color"), variable("o")),
            Quad::triple(variable("s"), iri("color"), iri("red")),
            Quad::triple(iri("v"), variable("p"), iri("blue")),
            Quad::triple(iri("v"), iri("color"), iri("blue")),
            Quad::triple(iri("unknown"), variable("p"), variable("o")),
            Quad::triple(
                Term::triple(variable("a"), iri("color"), variable("b")),
                variable("p"),
                variable("o"),
            ),
            Quad::triple(
                variable("s"),
                says(),
                Term::triple(iri("http://example.com/bob"), says(), variable("x")),
            ),
            Quad::new(variable("s"), variable("p"), variable("o"), variable("g")),
            Quad::new(variable("s"), variable("p"), variable("o"), iri("g")),
        ];

        for pattern in &patterns {
            let expected = sorted(dictionaries[0].1.as_ref(), pattern);
            for (name, dictionary) in &dictionaries[1..] {
                assert_eq!(
                    sorted(dictionary.as_ref(), pattern),
                    expected,
                    "{name} differs for {pattern}"
                );
            }
        }
    }

    #[test]
    fn plain_dictionaries_do_not_support_quoted_triples() {
        let pattern = Quad::triple(Term::variable("s"), Term::variable("p"), Term::variable("o"));
        let dictionaries: Vec<Box<dyn TermDictionary<Encoding = ObjectId>>> = vec![
            Box::new(StringDictionary::default()),
            Box::new(TermMapDictionary::default()),
            Box::new(PartitionedDictionary::new()),
        ];
        for dictionary in dictionaries {
            assert!(!dictionary.supports_quoted_triples());
            assert!(matches!(
                dictionary.find_quoted_triples_encoded(&pattern),
                Err(DictionaryError::Unsupported(_))
            ));
        }
    }
}
