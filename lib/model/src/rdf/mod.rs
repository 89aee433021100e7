mod canonical;
mod quad;
mod term;

pub use quad::{is_wildcard, Quad, TermPattern};
pub use term::{Term, TermType};
