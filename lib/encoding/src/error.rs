use thiserror::Error;

/// The result type of all [TermDictionary](crate::TermDictionary) operations.
pub type DictionaryResult<T> = Result<T, DictionaryError>;

/// An error that is returned by a [TermDictionary](crate::TermDictionary).
///
/// None of these errors leaves the dictionary in a partially updated state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DictionaryError {
    /// The encoding has never been issued by this dictionary.
    #[error("Encoding {encoding} is not known to the dictionary.")]
    NotFound { encoding: String },
    /// The term or the operation is not supported by this dictionary.
    #[error("Unsupported: {0}")]
    Unsupported(String),
    /// The term cannot be encoded in its current form.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The dictionary ran out of encodings.
    #[error("The dictionary cannot allocate any more encodings.")]
    Exhausted,
    /// The dictionary holds an entry that cannot be turned back into a term.
    #[error("Corrupted dictionary entry: {0}")]
    Corrupted(String),
}

impl DictionaryError {
    /// Creates a [DictionaryError::NotFound] for the given `encoding`.
    pub fn not_found(encoding: impl ToString) -> Self {
        Self::NotFound {
            encoding: encoding.to_string(),
        }
    }
}
