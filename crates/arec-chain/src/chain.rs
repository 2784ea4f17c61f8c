//! The [`RevisionChain`] structure.

use arec_types::ItemHash;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChainError, ChainResult};
use crate::selector::RevisionSelector;

/// Ordered revision history of one record.
///
/// `hashes[0]` is the canonical hash; `hashes[i]` for `i > 0` are the
/// amending posts, oldest first. `current` is the revision whose content is
/// materialized in the owning record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionChain {
    hashes: Vec<ItemHash>,
    current: usize,
}

impl RevisionChain {
    /// A chain holding only the original post.
    pub fn originate(canonical: ItemHash) -> Self {
        Self {
            hashes: vec![canonical],
            current: 0,
        }
    }

    /// Rebuild a chain from its canonical hash and the amending revisions
    /// (oldest first), with the cursor on `own`.
    ///
    /// `own` need not be the tail: a post fetched concurrently with newer
    /// amendments sits somewhere in the middle.
    pub fn from_revisions(
        canonical: ItemHash,
        revisions: Vec<ItemHash>,
        own: ItemHash,
    ) -> ChainResult<Self> {
        let mut chain = Self::originate(canonical);
        chain.merge_revisions(revisions);
        chain.current = chain.position(&own).ok_or_else(|| ChainError::RevisionNotFound {
            record: canonical,
            revision: own.to_string(),
        })?;
        Ok(chain)
    }

    /// The record's canonical hash.
    pub fn canonical(&self) -> ItemHash {
        self.hashes[0]
    }

    /// All revision hashes, oldest first.
    pub fn hashes(&self) -> &[ItemHash] {
        &self.hashes
    }

    /// Number of revisions, including the original.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Always `false`; a chain holds at least its original post.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Index of the materialized revision.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Hash of the materialized revision.
    pub fn current_hash(&self) -> ItemHash {
        self.hashes[self.current]
    }

    /// Hash of the newest revision.
    pub fn tail(&self) -> ItemHash {
        self.hashes[self.hashes.len() - 1]
    }

    pub fn hash_at(&self, revision: usize) -> Option<ItemHash> {
        self.hashes.get(revision).copied()
    }

    pub fn position(&self, hash: &ItemHash) -> Option<usize> {
        self.hashes.iter().position(|h| h == hash)
    }

    /// Append a newly posted revision and move the cursor onto it.
    pub fn append(&mut self, hash: ItemHash) -> usize {
        self.hashes.push(hash);
        self.current = self.hashes.len() - 1;
        debug!(
            canonical = %self.canonical().short_hex(),
            revision = self.current,
            "revision appended"
        );
        self.current
    }

    /// Merge `revisions` (oldest first) into the chain.
    ///
    /// Hashes the chain already holds keep their positions; unseen ones are
    /// appended in the given order. The cursor does not move. Returns the
    /// number of revisions added.
    pub fn merge_revisions(&mut self, revisions: Vec<ItemHash>) -> usize {
        let before = self.hashes.len();
        for hash in revisions {
            if self.position(&hash).is_none() {
                self.hashes.push(hash);
            }
        }
        let added = self.hashes.len() - before;
        if added > 0 {
            debug!(
                canonical = %self.canonical().short_hex(),
                added,
                len = self.hashes.len(),
                "revisions merged"
            );
        }
        added
    }

    /// Resolve a selector to a revision index without moving the cursor.
    pub fn resolve(&self, selector: RevisionSelector) -> ChainResult<usize> {
        let not_found = || ChainError::RevisionNotFound {
            record: self.canonical(),
            revision: selector.to_string(),
        };
        match selector {
            RevisionSelector::Number(n) => {
                let len = self.hashes.len() as i64;
                let index = if n < 0 { len + n } else { n };
                if index < 0 || index >= len {
                    return Err(not_found());
                }
                Ok(index as usize)
            }
            RevisionSelector::Hash(h) => self.position(&h).ok_or_else(not_found),
        }
    }

    /// Move the cursor. Returns `false` if it was already there.
    pub fn set_current(&mut self, revision: usize) -> ChainResult<bool> {
        if revision >= self.hashes.len() {
            return Err(ChainError::RevisionNotFound {
                record: self.canonical(),
                revision: format!("no. {revision}"),
            });
        }
        let moved = self.current != revision;
        self.current = revision;
        Ok(moved)
    }
}
