//! The data model of the quadstore: RDF terms (including quoted triples, the default graph, and
//! variables) and quads of such terms.
//!
//! Atomic terms are backed by the data model of [oxrdf]. On top of that, this crate adds the
//! variants that a pattern-matching quadstore needs: [Term::DefaultGraph], [Term::Variable], and
//! the recursively nested [Term::Triple].

mod error;
mod rdf;

pub use error::*;
pub use rdf::*;

// Re-export some oxrdf types.
pub use oxrdf::vocab;
pub use oxrdf::{BlankNode, Literal, NamedNode, Variable};
