//! Record store for arec.
//!
//! Application code works with [`Record`]s: typed values that can be created,
//! updated, navigated through their history, looked up by index, and
//! forgotten. Underneath, every change is an immutable post on an
//! append-only network; a record is the chain of posts that share one
//! canonical hash.
//!
//! # Key Types
//!
//! - [`RecordStore`] -- all record operations, on top of a [`PostClient`](arec_client::PostClient)
//! - [`Record`] -- a typed record plus its revision chain
//! - [`RecordContent`] -- implemented by every record payload type
//! - [`TypeRegistry`] -- post type name to typed decoder
//! - [`StoreConfig`] -- default channel, fallback account, fetch fan-out
//!
//! # Lifecycle
//!
//! 1. `create` posts revision 0 and adds the record to its type's indices.
//! 2. `upsert` posts a new revision referencing the canonical hash.
//! 3. `fetch_revision` re-reads any revision from the network.
//! 4. `forget` removes every revision from the network. Nothing can be done
//!    with a forgotten record afterwards.

pub mod config;
pub mod error;
pub mod record;
pub mod registry;
pub mod store;

pub use config::{StoreConfig, DEFAULT_CHANNEL};
pub use error::{StoreError, StoreResult};
pub use record::{Record, RecordContent};
pub use registry::TypeRegistry;
pub use store::RecordStore;

// Re-export the types callers need alongside the store.
pub use arec_chain::{ChainError, RevisionChain, RevisionSelector};
pub use arec_client::{ClientError, InMemoryPostClient, PostClient, PostQuery, PostReceipt};
pub use arec_crypto::Account;
pub use arec_index::{Index, IndexError};
pub use arec_types::{Address, ItemHash, MessageType, RawPost};
