//! Revision chains for arec.
//!
//! A record on the post network is an append-only sequence of posts: the
//! original post (revision 0), whose hash is the record's canonical hash, and
//! every later post that references it. A [`RevisionChain`] is the in-memory
//! view of that sequence plus a cursor naming which revision's content is
//! currently materialized.
//!
//! # Invariants
//!
//! 1. The chain is never empty; position 0 is always the canonical hash.
//! 2. The cursor always points inside the chain.
//! 3. Hashes are only appended, never removed or reordered.

pub mod chain;
pub mod error;
pub mod selector;

pub use chain::RevisionChain;
pub use error::{ChainError, ChainResult};
pub use selector::RevisionSelector;
