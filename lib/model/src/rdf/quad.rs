use crate::Term;
use std::fmt::{Display, Formatter};

/// A pattern over the four components of a quad.
///
/// [None] and [Term::Variable] are both wildcards. The order of the components depends on the
/// context: quad-level APIs use subject, predicate, object, graph while index-level APIs use the
/// native order of the index.
pub type TermPattern<'term> = [Option<&'term Term>; 4];

/// A quad consisting of a subject, a predicate, an object, and a graph.
///
/// The same structure is used for quoted triples, in which case the graph is the
/// [Term::DefaultGraph].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
    pub graph: Term,
}

impl Quad {
    /// Creates a new [Quad].
    pub fn new(
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        object: impl Into<Term>,
        graph: impl Into<Term>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            graph: graph.into(),
        }
    }

    /// Creates a new [Quad] in the default graph.
    pub fn triple(
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        object: impl Into<Term>,
    ) -> Self {
        Self::new(subject, predicate, object, Term::DefaultGraph)
    }

    /// Creates a [Quad] from its components in subject, predicate, object, graph order.
    pub fn from_terms([subject, predicate, object, graph]: [Term; 4]) -> Self {
        Self {
            subject,
            predicate,
            object,
            graph,
        }
    }

    /// Returns references to the components in subject, predicate, object, graph order.
    pub fn terms(&self) -> [&Term; 4] {
        [&self.subject, &self.predicate, &self.object, &self.graph]
    }

    /// Returns the components in subject, predicate, object, graph order.
    pub fn into_terms(self) -> [Term; 4] {
        [self.subject, self.predicate, self.object, self.graph]
    }

    /// Returns this quad as a [TermPattern] in subject, predicate, object, graph order.
    pub fn as_pattern(&self) -> TermPattern<'_> {
        self.terms().map(Some)
    }

    /// Returns true if any component is or contains a variable.
    pub fn has_variables(&self) -> bool {
        self.terms().iter().any(|term| term.has_variables())
    }

    /// Checks whether every component matches the corresponding component of `pattern`.
    ///
    /// See [Term::matches].
    pub fn matches(&self, pattern: &Quad) -> bool {
        self.terms()
            .iter()
            .zip(pattern.terms())
            .all(|(term, pattern)| term.matches(pattern))
    }
}

impl Display for Quad {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if !self.graph.is_default_graph() {
            write!(f, " {}", self.graph)?;
        }
        Ok(())
    }
}

impl From<oxrdf::Quad> for Quad {
    fn from(value: oxrdf::Quad) -> Self {
        Self {
            subject: value.subject.into(),
            predicate: value.predicate.into(),
            object: value.object.into(),
            graph: value.graph_name.into(),
        }
    }
}

impl From<oxrdf::Triple> for Quad {
    fn from(value: oxrdf::Triple) -> Self {
        Self::triple(value.subject, value.predicate, value.object)
    }
}

/// Returns true if the given pattern component is a wildcard (i.e., missing or a variable).
pub fn is_wildcard(term: Option<&Term>) -> bool {
    match term {
        None => true,
        Some(term) => term.is_variable(),
    }
}
