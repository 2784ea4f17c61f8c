//! Error types for record store operations.

use arec_types::ItemHash;
use thiserror::Error;

/// Errors that can occur while posting, fetching, or forgetting records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A fetched post's type has no registered record definition.
    #[error(
        "received post type '{post_type}' from channel '{channel}' has no registered record type; \
         it provides the fields {fields:?}"
    )]
    UnresolvableType {
        post_type: String,
        channel: String,
        fields: Vec<String>,
    },

    /// A fetched post resolved to a different record type than requested.
    #[error("post {item_hash} is a '{actual}' record, expected '{expected}'")]
    TypeMismatch {
        item_hash: ItemHash,
        expected: String,
        actual: String,
    },

    /// Post content could not be converted to or from the record type.
    #[error("malformed '{post_type}' content: {reason}")]
    MalformedContent { post_type: String, reason: String },

    /// `forget` was called on a record that is already forgotten.
    #[error("{0} has already been forgotten")]
    AlreadyForgotten(String),

    /// The record was forgotten; it can no longer be posted or navigated.
    #[error("{0} has been forgotten and can no longer be changed or navigated")]
    RecordForgotten(String),

    /// The operation needs a posted record, but this one has no canonical
    /// hash yet.
    #[error("{0} has not been posted yet")]
    NotPersisted(String),

    /// Invalid or unreadable store configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Revision selection failed.
    #[error(transparent)]
    Chain(#[from] arec_chain::ChainError),

    /// Index registration or lookup failed.
    #[error(transparent)]
    Index(#[from] arec_index::IndexError),

    /// The post network client reported a failure.
    #[error("client error: {0}")]
    Client(#[from] arec_client::ClientError),
}

/// Convenience alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;
