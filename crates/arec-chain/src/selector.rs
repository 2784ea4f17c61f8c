use std::fmt;

use arec_types::ItemHash;
use serde::{Deserialize, Serialize};

use crate::error::{ChainError, ChainResult};

/// Names one revision of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevisionSelector {
    /// Revision number. 0 is the original post; negative numbers count from
    /// the newest revision, so `-1` is the tail.
    Number(i64),
    /// The item hash of one of the record's posts.
    Hash(ItemHash),
}

impl RevisionSelector {
    /// Build a selector from exactly one of a revision number or hash.
    pub fn from_parts(rev_no: Option<i64>, rev_hash: Option<ItemHash>) -> ChainResult<Self> {
        match (rev_no, rev_hash) {
            (Some(n), None) => Ok(Self::Number(n)),
            (None, Some(h)) => Ok(Self::Hash(h)),
            (None, None) => Err(ChainError::InvalidArgument(
                "either a revision number or a revision hash must be provided".into(),
            )),
            (Some(_), Some(_)) => Err(ChainError::InvalidArgument(
                "provide a revision number or a revision hash, not both".into(),
            )),
        }
    }
}

impl fmt::Display for RevisionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "no. {n}"),
            Self::Hash(h) => write!(f, "{h}"),
        }
    }
}

impl From<i64> for RevisionSelector {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<ItemHash> for RevisionSelector {
    fn from(h: ItemHash) -> Self {
        Self::Hash(h)
    }
}
