use crate::{DictionaryError, DictionaryResult, EncodedTerm};
use quadstore_model::Term;
use std::fmt::{Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;

/// An integer encoding of a term.
///
/// # Layout
///
/// - `0` is reserved. No dictionary ever issues it, so decoding it always fails.
/// - If the [ObjectId::BITMASK] bit is set, the id refers to a quoted triple. The remaining bits
///   hold a 1-based slot in the quoted-triple storage of the dictionary.
/// - Otherwise, the id refers to a plain term. Sequential dictionaries use the value directly as a
///   counter. Partitioned dictionaries pack a counter and a [TermTypeTag] with
///   [ObjectId::from_parts], so the term type can be recovered with [ObjectId::type_tag].
///
/// Plain ids and quoted ids therefore never collide, independent of the dictionary in use.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    /// The high bit that marks encodings of quoted triples.
    pub const BITMASK: u32 = 1 << 31;
    /// The number of low bits that hold the [TermTypeTag] in the partitioned layout.
    pub const TAG_BITS: u32 = 3;
    /// The reserved id that is never issued.
    pub const NOT_FOUND: ObjectId = ObjectId(0);
    /// The first id that a sequential dictionary issues.
    pub const FIRST: ObjectId = ObjectId(1);

    const TAG_MASK: u32 = (1 << Self::TAG_BITS) - 1;

    /// Creates an [ObjectId] from its raw value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns true if this id refers to a quoted triple.
    pub fn is_quoted(self) -> bool {
        self.0 & Self::BITMASK != 0
    }

    /// Returns the id that follows this plain id in a sequential dictionary.
    ///
    /// Returns [DictionaryError::Exhausted] if the next id would run into the quoted range.
    pub fn next(self) -> DictionaryResult<ObjectId> {
        match self.0.checked_add(1) {
            Some(next) if next & Self::BITMASK == 0 => Ok(ObjectId(next)),
            _ => Err(DictionaryError::Exhausted),
        }
    }

    /// Marks this plain id as the encoding of a quoted triple.
    ///
    /// This is used by dictionaries that store quoted triples in a separate plain dictionary.
    pub fn to_quoted(self) -> DictionaryResult<ObjectId> {
        if self.is_quoted() || self == Self::NOT_FOUND {
            return Err(DictionaryError::InvalidArgument(format!(
                "Object id {self} cannot be used for a quoted triple."
            )));
        }
        Ok(ObjectId(self.0 | Self::BITMASK))
    }

    /// Removes the [ObjectId::BITMASK] from this id.
    pub fn without_bitmask(self) -> ObjectId {
        ObjectId(self.0 & !Self::BITMASK)
    }

    /// Creates the id of the quoted triple stored at the 0-based `slot`.
    pub fn from_quoted_slot(slot: usize) -> DictionaryResult<ObjectId> {
        let value = u32::try_from(slot)
            .ok()
            .and_then(|slot| slot.checked_add(1))
            .filter(|value| value & Self::BITMASK == 0)
            .ok_or(DictionaryError::Exhausted)?;
        Ok(ObjectId(value | Self::BITMASK))
    }

    /// Returns the 0-based slot of a quoted triple id, or [None] for plain ids and for the
    /// reserved quoted id without a slot.
    pub fn quoted_slot(self) -> Option<usize> {
        if !self.is_quoted() {
            return None;
        }
        let slot = self.without_bitmask().0.checked_sub(1)?;
        usize::try_from(slot).ok()
    }

    /// Packs a per-type `counter` and a `tag` into a plain id.
    ///
    /// Returns [DictionaryError::Exhausted] if the counter does not fit into the bits that remain
    /// below the [ObjectId::BITMASK].
    pub fn from_parts(counter: u32, tag: TermTypeTag) -> DictionaryResult<ObjectId> {
        let value = counter
            .checked_shl(Self::TAG_BITS)
            .filter(|shifted| shifted >> Self::TAG_BITS == counter)
            .map(|shifted| shifted | tag as u32)
            .filter(|value| value & Self::BITMASK == 0)
            .ok_or(DictionaryError::Exhausted)?;
        Ok(ObjectId(value))
    }

    /// Returns the [TermTypeTag] of an id in the partitioned layout.
    ///
    /// Returns [None] for quoted ids and for tag values that are not assigned.
    pub fn type_tag(self) -> Option<TermTypeTag> {
        if self.is_quoted() {
            return None;
        }
        TermTypeTag::from_bits(self.0 & Self::TAG_MASK)
    }

    /// Returns the per-type counter of an id in the partitioned layout.
    pub fn counter(self) -> u32 {
        self.without_bitmask().0 >> Self::TAG_BITS
    }
}

impl EncodedTerm for ObjectId {}

impl From<u32> for ObjectId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<ObjectId> for u32 {
    fn from(value: ObjectId) -> Self {
        value.0
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// The term type stored in the low bits of a partitioned [ObjectId].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum TermTypeTag {
    NamedNode = 0,
    BlankNode = 1,
    LanguageTaggedLiteral = 2,
    TypedLiteral = 3,
    DefaultGraph = 4,
}

impl TermTypeTag {
    /// All tags, ordered by their bit value.
    pub const ALL: [TermTypeTag; 5] = [
        TermTypeTag::NamedNode,
        TermTypeTag::BlankNode,
        TermTypeTag::LanguageTaggedLiteral,
        TermTypeTag::TypedLiteral,
        TermTypeTag::DefaultGraph,
    ];

    /// Returns the tag for the given bit value.
    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| *tag as u32 == bits)
    }

    /// Returns the tag of a plain term, or [None] for variables and quoted triples.
    pub fn of_term(term: &Term) -> Option<Self> {
        match term {
            Term::NamedNode(_) => Some(TermTypeTag::NamedNode),
            Term::BlankNode(_) => Some(TermTypeTag::BlankNode),
            Term::Literal(literal) if literal.language().is_some() => {
                Some(TermTypeTag::LanguageTaggedLiteral)
            }
            Term::Literal(_) => Some(TermTypeTag::TypedLiteral),
            Term::DefaultGraph => Some(TermTypeTag::DefaultGraph),
            Term::Variable(_) | Term::Triple(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadstore_model::{Literal, NamedNode};

    #[test]
    fn quoted_slots_are_one_based() {
        let first = ObjectId::from_quoted_slot(0).unwrap();
        assert_eq!(first.as_u32(), ObjectId::BITMASK | 1);
        assert!(first.is_quoted());
        assert_eq!(first.quoted_slot(), Some(0));

        assert_eq!(ObjectId::new(ObjectId::BITMASK).quoted_slot(), None);
        assert_eq!(ObjectId::new(5).quoted_slot(), None);
    }

    #[test]
    fn to_quoted_sets_bitmask() {
        let id = ObjectId::new(42).to_quoted().unwrap();
        assert!(id.is_quoted());
        assert_eq!(id.without_bitmask(), ObjectId::new(42));
        assert!(id.to_quoted().is_err());
        assert!(ObjectId::NOT_FOUND.to_quoted().is_err());
    }

    #[test]
    fn sequential_ids_never_reach_bitmask() {
        assert_eq!(ObjectId::FIRST.next(), Ok(ObjectId::new(2)));
        assert_eq!(
            ObjectId::new(ObjectId::BITMASK - 1).next(),
            Err(DictionaryError::Exhausted)
        );
    }

    #[test]
    fn partitioned_layout() {
        for tag in TermTypeTag::ALL {
            let id = ObjectId::from_parts(17, tag).unwrap();
            assert_eq!(id.type_tag(), Some(tag));
            assert_eq!(id.counter(), 17);
            assert!(!id.is_quoted());
        }

        assert_eq!(
            ObjectId::from_parts(1, TermTypeTag::DefaultGraph)
                .unwrap()
                .as_u32(),
            12
        );
        assert_eq!(
            ObjectId::from_parts(1 << 28, TermTypeTag::NamedNode),
            Err(DictionaryError::Exhausted)
        );
    }

    #[test]
    fn term_type_tags() {
        let iri = Term::NamedNode(NamedNode::new_unchecked("http://example.com/a"));
        let lang = Term::Literal(Literal::new_language_tagged_literal_unchecked("a", "en"));
        let typed = Term::Literal(Literal::new_simple_literal("a"));

        assert_eq!(TermTypeTag::of_term(&iri), Some(TermTypeTag::NamedNode));
        assert_eq!(
            TermTypeTag::of_term(&lang),
            Some(TermTypeTag::LanguageTaggedLiteral)
        );
        assert_eq!(TermTypeTag::of_term(&typed), Some(TermTypeTag::TypedLiteral));
        assert_eq!(TermTypeTag::of_term(&Term::variable("x")), None);
    }

    #[test]
    fn display_and_parse() {
        let id = ObjectId::new(ObjectId::BITMASK | 3);
        insta::assert_snapshot!(id, @"2147483651");
        assert_eq!(id.to_string().parse::<ObjectId>(), Ok(id));
    }
}
