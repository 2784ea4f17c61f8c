use arec_crypto::Account;
use arec_types::{ItemHash, MessageType, RawPost};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, ClientResult};
use crate::query::PostQuery;

/// Acknowledgement returned by the network for a submitted message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReceipt {
    pub item_hash: ItemHash,
    pub message_type: MessageType,
}

impl PostReceipt {
    /// The acknowledged item hash, if the receipt is for the expected kind of
    /// message.
    pub fn expect_type(&self, expected: MessageType) -> ClientResult<ItemHash> {
        if self.message_type != expected {
            return Err(ClientError::UnexpectedMessageType {
                expected,
                received: self.message_type,
            });
        }
        Ok(self.item_hash)
    }
}

/// Client interface to the post network.
///
/// Implementations own transport, signing and retry policy; callers see only
/// the outcome of each operation.
#[async_trait]
pub trait PostClient: Send + Sync {
    /// Submit a post. `reference` present amends the record with that
    /// canonical hash; absent originates a new one.
    async fn create_post(
        &self,
        account: &Account,
        content: Value,
        post_type: &str,
        channel: &str,
        reference: Option<ItemHash>,
    ) -> ClientResult<PostReceipt>;

    /// List posts matching every filter set on `query`, newest first.
    async fn get_posts(&self, query: &PostQuery) -> ClientResult<Vec<RawPost>>;

    /// Irrevocably forget a set of posts.
    async fn forget(
        &self,
        account: &Account,
        hashes: &[ItemHash],
        reason: Option<&str>,
        channel: &str,
    ) -> ClientResult<PostReceipt>;
}
