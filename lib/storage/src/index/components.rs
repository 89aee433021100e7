use crate::index::IndexComponentsCreationError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Represents a list of *disjunct* index components.
///
/// The string form lists the components in order, e.g., `GSPO`. It is also used for
/// (de)serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IndexComponents([IndexComponent; 4]);

impl IndexComponents {
    /// A GSPO index.
    pub const GSPO: IndexComponents = IndexComponents([
        IndexComponent::GraphName,
        IndexComponent::Subject,
        IndexComponent::Predicate,
        IndexComponent::Object,
    ]);

    /// A GPOS index.
    pub const GPOS: IndexComponents = IndexComponents([
        IndexComponent::GraphName,
        IndexComponent::Predicate,
        IndexComponent::Object,
        IndexComponent::Subject,
    ]);

    /// A GOSP index.
    pub const GOSP: IndexComponents = IndexComponents([
        IndexComponent::GraphName,
        IndexComponent::Object,
        IndexComponent::Subject,
        IndexComponent::Predicate,
    ]);

    /// An SPOG index.
    pub const SPOG: IndexComponents = IndexComponents([
        IndexComponent::Subject,
        IndexComponent::Predicate,
        IndexComponent::Object,
        IndexComponent::GraphName,
    ]);

    /// A POSG index.
    pub const POSG: IndexComponents = IndexComponents([
        IndexComponent::Predicate,
        IndexComponent::Object,
        IndexComponent::Subject,
        IndexComponent::GraphName,
    ]);

    /// An OSPG index.
    pub const OSPG: IndexComponents = IndexComponents([
        IndexComponent::Object,
        IndexComponent::Subject,
        IndexComponent::Predicate,
        IndexComponent::GraphName,
    ]);

    /// Tries to create a new [IndexComponents].
    ///
    /// Returns an error if an [IndexComponent] appears more than once.
    pub fn try_new(
        components: [IndexComponent; 4],
    ) -> Result<Self, IndexComponentsCreationError> {
        if !components.iter().all_unique() {
            return Err(IndexComponentsCreationError);
        }

        Ok(IndexComponents(components))
    }

    /// Returns a reference to the inner array.
    pub fn inner(&self) -> &[IndexComponent; 4] {
        &self.0
    }
}

impl Display for IndexComponents {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for component in &self.0 {
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

impl FromStr for IndexComponents {
    type Err = IndexComponentsCreationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = s
            .chars()
            .map(IndexComponent::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let components = <[IndexComponent; 4]>::try_from(components)
            .map_err(|_| IndexComponentsCreationError)?;
        Self::try_new(components)
    }
}

impl TryFrom<String> for IndexComponents {
    type Error = IndexComponentsCreationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IndexComponents> for String {
    fn from(value: IndexComponents) -> Self {
        value.to_string()
    }
}

/// Represents what part of an RDF quad is indexed at the given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndexComponent {
    /// The graph name
    GraphName,
    /// The subject
    Subject,
    /// The predicate
    Predicate,
    /// The object
    Object,
}

impl IndexComponent {
    /// Returns the index of the component in a subject, predicate, object, graph quad.
    pub fn quad_index(self) -> usize {
        match self {
            IndexComponent::Subject => 0,
            IndexComponent::Predicate => 1,
            IndexComponent::Object => 2,
            IndexComponent::GraphName => 3,
        }
    }
}

impl Display for IndexComponent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexComponent::GraphName => write!(f, "G"),
            IndexComponent::Subject => write!(f, "S"),
            IndexComponent::Predicate => write!(f, "P"),
            IndexComponent::Object => write!(f, "O"),
        }
    }
}

impl TryFrom<char> for IndexComponent {
    type Error = IndexComponentsCreationError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase() {
            'G' => Ok(IndexComponent::GraphName),
            'S' => Ok(IndexComponent::Subject),
            'P' => Ok(IndexComponent::Predicate),
            'O' => Ok(IndexComponent::Object),
            _ => Err(IndexComponentsCreationError),
        }
    }
}
