//! Cryptographic primitives for arec.
//!
//! Provides domain-separated BLAKE3 hashing for post identifiers and the
//! Ed25519-backed [`Account`] that posts are sent from.
//!
//! All crypto operations wrap established libraries — no custom cryptography.

pub mod account;
pub mod hasher;

pub use account::{Account, AccountError};
pub use hasher::{ContentHasher, HasherError};
