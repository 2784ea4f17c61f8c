//! Error types for the index crate.

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IndexError {
    /// A lookup key is not present in the index.
    #[error("key '{key}' not found in index {index}")]
    KeyNotFound { index: String, key: String },

    /// No index with this name is registered for the record type.
    #[error("no index \"{name}\" found for {datatype}")]
    UnknownIndex { datatype: String, name: String },

    /// The record belongs to a different type than the index.
    #[error("index {index} cannot hold a {actual} record")]
    TypeMismatch { index: String, actual: String },

    /// The record has not been posted yet, so it has no canonical hash.
    #[error("record {0} has not been posted")]
    NotPersisted(String),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
