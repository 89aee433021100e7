use thiserror::Error;

/// An error that is returned if a string is not a valid canonical term representation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid term syntax at position {position}: {message}")]
pub struct TermSyntaxError {
    /// The byte offset in the input at which the error was detected.
    pub position: usize,
    /// A description of the problem.
    pub message: String,
}

impl TermSyntaxError {
    /// Creates a new [TermSyntaxError].
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}
