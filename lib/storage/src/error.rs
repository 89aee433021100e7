use quadstore_encoding::DictionaryError;
use thiserror::Error;

/// An error that is returned by the storage layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// An error while encoding or decoding terms.
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
    /// The storage has been configured in an invalid way.
    #[error("Invalid storage configuration: {0}")]
    InvalidConfiguration(String),
}
