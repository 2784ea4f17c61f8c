//! Error types for revision chain operations.

use arec_types::ItemHash;
use thiserror::Error;

/// Errors that can occur while navigating a revision chain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    /// Caller supplied neither or both of two mutually exclusive arguments.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested revision is out of range or not part of the chain.
    #[error("no revision {revision} found for record {record}")]
    RevisionNotFound { record: ItemHash, revision: String },
}

/// Convenience alias for chain results.
pub type ChainResult<T> = Result<T, ChainError>;
