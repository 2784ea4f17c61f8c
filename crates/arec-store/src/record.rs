use std::fmt;
use std::ops::{Deref, DerefMut};

use arec_chain::RevisionChain;
use arec_index::Indexable;
use arec_types::ItemHash;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

/// User-defined payload of a record type.
///
/// `TYPE_NAME` is the post type tag the content is stored under; it must be
/// unique among the types registered with a store.
pub trait RecordContent: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TYPE_NAME: &'static str;
}

/// A mutable record backed by an immutable chain of posts.
///
/// A record starts out unposted. The first post gives it a canonical hash;
/// every later upsert appends a revision. Forgetting is terminal.
///
/// Derefs to its content, so fields can be read and assigned directly.
#[derive(Clone, Debug)]
pub struct Record<T> {
    content: T,
    chain: Option<RevisionChain>,
    channel: Option<String>,
    forgotten: bool,
}

impl<T: RecordContent> Record<T> {
    /// An unposted record.
    pub fn new(content: T) -> Self {
        Self {
            content,
            chain: None,
            channel: None,
            forgotten: false,
        }
    }

    pub(crate) fn from_chain(content: T, chain: RevisionChain, channel: String) -> Self {
        Self {
            content,
            chain: Some(chain),
            channel: Some(channel),
            forgotten: false,
        }
    }

    pub fn content(&self) -> &T {
        &self.content
    }

    pub fn into_content(self) -> T {
        self.content
    }

    /// Canonical hash: the hash of the record's first post.
    pub fn item_hash(&self) -> Option<ItemHash> {
        self.chain.as_ref().map(RevisionChain::canonical)
    }

    /// Revision hashes, oldest first. Empty until the first post.
    pub fn revision_hashes(&self) -> &[ItemHash] {
        match &self.chain {
            Some(chain) => chain.hashes(),
            None => &[],
        }
    }

    /// Index of the revision whose content is materialized.
    pub fn current_revision(&self) -> Option<usize> {
        self.chain.as_ref().map(RevisionChain::current)
    }

    /// Channel the record's original post was sent to.
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    pub fn is_forgotten(&self) -> bool {
        self.forgotten
    }

    pub fn chain(&self) -> Option<&RevisionChain> {
        self.chain.as_ref()
    }

    pub(crate) fn chain_mut(&mut self) -> Option<&mut RevisionChain> {
        self.chain.as_mut()
    }

    pub(crate) fn originate(&mut self, chain: RevisionChain, channel: &str) {
        self.chain = Some(chain);
        self.channel = Some(channel.to_string());
    }

    pub(crate) fn set_content(&mut self, content: T) {
        self.content = content;
    }

    pub(crate) fn mark_forgotten(&mut self) {
        self.forgotten = true;
    }

    /// The content as it is stored on the network.
    pub fn content_value(&self) -> StoreResult<Value> {
        serde_json::to_value(&self.content).map_err(|e| StoreError::MalformedContent {
            post_type: T::TYPE_NAME.to_string(),
            reason: e.to_string(),
        })
    }
}

impl<T: RecordContent> Deref for Record<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.content
    }
}

impl<T: RecordContent> DerefMut for Record<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.content
    }
}

impl<T: RecordContent> fmt::Display for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.item_hash() {
            Some(hash) => write!(f, "{}({})", T::TYPE_NAME, hash),
            None => write!(f, "{}(unposted)", T::TYPE_NAME),
        }
    }
}

impl<T: RecordContent> Indexable for Record<T> {
    fn type_name(&self) -> &str {
        T::TYPE_NAME
    }

    fn canonical_hash(&self) -> Option<ItemHash> {
        self.item_hash()
    }

    fn field_value(&self, field: &str) -> Option<Value> {
        match serde_json::to_value(&self.content).ok()? {
            Value::Object(mut map) => map.remove(field),
            _ => None,
        }
    }
}
