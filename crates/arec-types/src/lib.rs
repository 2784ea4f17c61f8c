//! Foundation types for arec.
//!
//! arec maps mutable records onto an append-only, content-addressed post
//! network. This crate holds the vocabulary every other arec crate shares:
//! the identifiers posts are addressed by and the raw shape of a post as the
//! network returns it.
//!
//! # Key Types
//!
//! - [`ItemHash`] — Content-addressed identifier of a single post
//! - [`Address`] — Sender address of the account that signed a post
//! - [`MessageType`] — Kind of network message a receipt acknowledges
//! - [`RawPost`] — One post as returned by the network, before decoding

pub mod address;
pub mod error;
pub mod hash;
pub mod post;

pub use address::Address;
pub use error::TypeError;
pub use hash::ItemHash;
pub use post::{MessageType, RawPost};
