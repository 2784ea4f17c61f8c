//! Error types for post network clients.

use arec_types::{ItemHash, MessageType};
use thiserror::Error;

/// Errors reported by a [`PostClient`](crate::PostClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The network acknowledged a different kind of message than was sent.
    #[error("expected message type '{expected}' but actually received '{received}'")]
    UnexpectedMessageType {
        expected: MessageType,
        received: MessageType,
    },

    /// The network refused the message, e.g. a forget by a non-owner.
    #[error("network rejected {hash}: {reason}")]
    Rejected { hash: ItemHash, reason: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
