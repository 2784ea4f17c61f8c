//! Secondary indices for arec.
//!
//! An [`Index`] maps the value of one content field to the canonical hash of
//! the record carrying it, so records can be looked up by something other
//! than their hash. Indices are derived, in-memory views: they are filled as
//! records are created and never persisted.
//!
//! # Key Types
//!
//! - [`Index`] -- single-field lookup table for one record type
//! - [`IndexRegistry`] -- per-type table of registered indices
//! - [`Indexable`] -- what a record must expose to be indexed

pub mod error;
pub mod index;
pub mod registry;

pub use error::{IndexError, IndexResult};
pub use index::{key_from_value, Index, Indexable};
pub use registry::IndexRegistry;
