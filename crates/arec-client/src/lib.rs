//! Post network client interface for arec.
//!
//! arec never talks to the network itself. Every read and write goes through
//! a [`PostClient`], which exposes the three operations the record layer
//! needs: create a post, list posts by filter, and forget posts.
//!
//! - [`PostClient`] — the async client trait
//! - [`PostQuery`] — conjunctive filter for `get_posts`
//! - [`PostReceipt`] — acknowledgement of a submitted message
//! - [`InMemoryPostClient`] — a `RwLock`-guarded network for tests and embedding

pub mod client;
pub mod error;
pub mod memory;
pub mod query;

pub use client::{PostClient, PostReceipt};
pub use error::{ClientError, ClientResult};
pub use memory::InMemoryPostClient;
pub use query::PostQuery;
