use crate::rdf::canonical::{write_term, TermParser};
use crate::{Quad, TermSyntaxError};
use oxrdf::{BlankNode, Literal, NamedNode, Variable};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// An RDF term, a variable, or a quoted triple.
///
/// Quoted triples may appear anywhere a term is valid and may be nested arbitrarily deep. A quoted
/// triple is represented as a [Quad] whose graph is expected to be [Term::DefaultGraph]. Storage
/// layers reject quoted triples with another graph.
///
/// [Term::Variable] never denotes a stored value. It is only used in patterns, where it acts as a
/// wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// An IRI.
    NamedNode(NamedNode),
    /// A blank node.
    BlankNode(BlankNode),
    /// A literal with an optional language tag or a datatype.
    Literal(Literal),
    /// The default graph.
    DefaultGraph,
    /// A variable that matches any term in a pattern.
    Variable(Variable),
    /// A quoted triple.
    Triple(Box<Quad>),
}

/// The type of a [Term].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TermType {
    NamedNode,
    BlankNode,
    Literal,
    DefaultGraph,
    Variable,
    Triple,
}

impl Term {
    /// Creates a quoted triple in the default graph.
    pub fn triple(
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        object: impl Into<Term>,
    ) -> Self {
        Self::Triple(Box::new(Quad::triple(subject, predicate, object)))
    }

    /// Creates a variable term without validating the name.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(Variable::new_unchecked(name))
    }

    /// Returns the [TermType] of this term.
    pub fn term_type(&self) -> TermType {
        match self {
            Term::NamedNode(_) => TermType::NamedNode,
            Term::BlankNode(_) => TermType::BlankNode,
            Term::Literal(_) => TermType::Literal,
            Term::DefaultGraph => TermType::DefaultGraph,
            Term::Variable(_) => TermType::Variable,
            Term::Triple(_) => TermType::Triple,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn is_default_graph(&self) -> bool {
        matches!(self, Term::DefaultGraph)
    }

    /// Returns the quoted triple if this term is one.
    pub fn as_triple(&self) -> Option<&Quad> {
        match self {
            Term::Triple(triple) => Some(triple),
            _ => None,
        }
    }

    /// Returns true if this term is a variable or a quoted triple that (transitively) contains a
    /// variable.
    pub fn has_variables(&self) -> bool {
        match self {
            Term::Variable(_) => true,
            Term::Triple(triple) => triple.has_variables(),
            _ => false,
        }
    }

    /// Checks whether this term matches the given `pattern`.
    ///
    /// A variable in the pattern matches any term. Quoted triples are matched component-wise, so
    /// variables nested in a quoted pattern are wildcards as well. All other terms must be equal.
    ///
    /// A variable that is used more than once is not required to match the same term in each
    /// position.
    pub fn matches(&self, pattern: &Term) -> bool {
        match (self, pattern) {
            (_, Term::Variable(_)) => true,
            (Term::Triple(triple), Term::Triple(pattern)) => triple.matches(pattern),
            (term, pattern) => term == pattern,
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_term(f, self)
    }
}

impl FromStr for Term {
    type Err = TermSyntaxError;

    /// Parses the canonical string form of a term, as produced by the [Display] implementation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TermParser::new(s).parse()
    }
}

impl From<NamedNode> for Term {
    fn from(value: NamedNode) -> Self {
        Self::NamedNode(value)
    }
}

impl From<BlankNode> for Term {
    fn from(value: BlankNode) -> Self {
        Self::BlankNode(value)
    }
}

impl From<Literal> for Term {
    fn from(value: Literal) -> Self {
        Self::Literal(value)
    }
}

impl From<Variable> for Term {
    fn from(value: Variable) -> Self {
        Self::Variable(value)
    }
}

impl From<Quad> for Term {
    fn from(value: Quad) -> Self {
        Self::Triple(Box::new(value))
    }
}

impl From<oxrdf::Term> for Term {
    fn from(value: oxrdf::Term) -> Self {
        match value {
            oxrdf::Term::NamedNode(node) => Self::NamedNode(node),
            oxrdf::Term::BlankNode(node) => Self::BlankNode(node),
            oxrdf::Term::Literal(literal) => Self::Literal(literal),
        }
    }
}

impl From<oxrdf::Subject> for Term {
    fn from(value: oxrdf::Subject) -> Self {
        match value {
            oxrdf::Subject::NamedNode(node) => Self::NamedNode(node),
            oxrdf::Subject::BlankNode(node) => Self::BlankNode(node),
        }
    }
}

impl From<oxrdf::GraphName> for Term {
    fn from(value: oxrdf::GraphName) -> Self {
        match value {
            oxrdf::GraphName::NamedNode(node) => Self::NamedNode(node),
            oxrdf::GraphName::BlankNode(node) => Self::BlankNode(node),
            oxrdf::GraphName::DefaultGraph => Self::DefaultGraph,
        }
    }
}
