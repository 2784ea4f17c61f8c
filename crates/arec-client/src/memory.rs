use std::sync::RwLock;

use arec_crypto::{Account, ContentHasher};
use arec_types::{ItemHash, MessageType, RawPost};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::client::{PostClient, PostReceipt};
use crate::error::{ClientError, ClientResult};
use crate::query::PostQuery;

/// In-memory post network.
///
/// Intended for tests and embedding. Posts are kept in submission order
/// behind a `RwLock`; reads return matches newest first, the way the live
/// network does. Forgotten posts are removed outright.
pub struct InMemoryPostClient {
    state: RwLock<NetworkState>,
}

#[derive(Default)]
struct NetworkState {
    posts: Vec<RawPost>,
    clock: u64,
}

impl NetworkState {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

impl InMemoryPostClient {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(NetworkState::default()),
        }
    }

    /// Number of posts currently held.
    pub fn post_count(&self) -> usize {
        self.state.read().expect("lock poisoned").posts.len()
    }

    /// Insert a post exactly as given, as if another writer had sent it.
    ///
    /// The post's `time` is overwritten with the network clock so it sorts
    /// as the newest post.
    pub fn insert_raw(&self, mut post: RawPost) {
        let mut state = self.state.write().expect("lock poisoned");
        post.time = state.tick();
        state.posts.push(post);
    }
}

impl Default for InMemoryPostClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostClient for InMemoryPostClient {
    async fn create_post(
        &self,
        account: &Account,
        content: Value,
        post_type: &str,
        channel: &str,
        reference: Option<ItemHash>,
    ) -> ClientResult<PostReceipt> {
        let mut state = self.state.write().expect("lock poisoned");
        let time = state.tick();
        // The clock is part of the preimage so reposting identical content
        // still yields a fresh hash.
        let item_hash = ContentHasher::POST
            .hash_json(&json!({
                "sender": account.address(),
                "type": post_type,
                "channel": channel,
                "ref": reference,
                "content": &content,
                "time": time,
            }))
            .map_err(|e| ClientError::Serialization(e.to_string()))?;

        state.posts.push(RawPost {
            item_hash,
            post_type: post_type.to_string(),
            channel: channel.to_string(),
            sender: account.address().clone(),
            reference,
            content,
            time,
        });
        debug!(item_hash = %item_hash.short_hex(), post_type, channel, "post accepted");

        Ok(PostReceipt {
            item_hash,
            message_type: MessageType::Post,
        })
    }

    async fn get_posts(&self, query: &PostQuery) -> ClientResult<Vec<RawPost>> {
        let state = self.state.read().expect("lock poisoned");
        let mut posts: Vec<RawPost> = state
            .posts
            .iter()
            .filter(|post| query.matches(post))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.time.cmp(&a.time));
        Ok(posts)
    }

    async fn forget(
        &self,
        account: &Account,
        hashes: &[ItemHash],
        reason: Option<&str>,
        channel: &str,
    ) -> ClientResult<PostReceipt> {
        let mut state = self.state.write().expect("lock poisoned");

        // All-or-nothing: check ownership before removing anything.
        for post in state.posts.iter().filter(|p| hashes.contains(&p.item_hash)) {
            if &post.sender != account.address() {
                return Err(ClientError::Rejected {
                    hash: post.item_hash,
                    reason: format!("{} does not own this post", account.address()),
                });
            }
        }

        let before = state.posts.len();
        state.posts.retain(|p| !hashes.contains(&p.item_hash));
        let removed = before - state.posts.len();

        let time = state.tick();
        let item_hash = ContentHasher::POST
            .hash_json(&json!({
                "sender": account.address(),
                "forget": hashes,
                "reason": reason,
                "channel": channel,
                "time": time,
            }))
            .map_err(|e| ClientError::Serialization(e.to_string()))?;
        debug!(requested = hashes.len(), removed, channel, "posts forgotten");

        Ok(PostReceipt {
            item_hash,
            message_type: MessageType::Forget,
        })
    }
}

impl std::fmt::Debug for InMemoryPostClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryPostClient")
            .field("post_count", &self.post_count())
            .finish()
    }
}
