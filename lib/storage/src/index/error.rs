use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Hash)]
#[error("Index components must contain each of G, S, P, and O exactly once.")]
pub struct IndexComponentsCreationError;
