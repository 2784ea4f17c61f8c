use std::sync::{Arc, RwLock};

use arec_chain::{ChainError, RevisionChain, RevisionSelector};
use arec_client::{PostClient, PostQuery};
use arec_crypto::Account;
use arec_index::{Index, IndexRegistry};
use arec_types::{Address, ItemHash, MessageType, RawPost};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::record::{Record, RecordContent};
use crate::registry::TypeRegistry;

/// Typed record operations on top of a [`PostClient`].
///
/// The store owns everything that would otherwise be process-wide state:
/// the fallback account, the table of decodable record types, and the
/// indices registered per type.
pub struct RecordStore {
    client: Arc<dyn PostClient>,
    config: StoreConfig,
    fallback: Account,
    types: RwLock<TypeRegistry>,
    indices: RwLock<IndexRegistry>,
}

impl RecordStore {
    /// Create a store, resolving the fallback account from `config`.
    pub fn new(client: Arc<dyn PostClient>, config: StoreConfig) -> StoreResult<Self> {
        let fallback = config.resolve_fallback_account()?;
        Ok(Self::with_account(client, config, fallback))
    }

    /// Create a store with an explicit fallback account.
    pub fn with_account(client: Arc<dyn PostClient>, config: StoreConfig, fallback: Account) -> Self {
        info!(
            channel = %config.default_channel,
            fallback = %fallback.address(),
            "record store ready"
        );
        Self {
            client,
            config,
            fallback,
            types: RwLock::new(TypeRegistry::new()),
            indices: RwLock::new(IndexRegistry::new()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn fallback_account(&self) -> &Account {
        &self.fallback
    }

    // ---- Registration ----

    /// Make `T` decodable from fetched posts.
    pub fn register<T: RecordContent>(&self) -> bool {
        self.types.write().expect("lock poisoned").register::<T>()
    }

    /// Register an index over `field` of `T` records.
    ///
    /// Only records created after registration are indexed.
    pub fn add_index<T: RecordContent>(&self, field: &str) -> bool {
        self.indices
            .write()
            .expect("lock poisoned")
            .register(T::TYPE_NAME, field)
    }

    /// A snapshot of one of `T`'s indices.
    pub fn index<T: RecordContent>(&self, name: &str) -> StoreResult<Index> {
        let indices = self.indices.read().expect("lock poisoned");
        Ok(indices.get(T::TYPE_NAME, name)?.clone())
    }

    // ---- Writes ----

    /// Post `content` as a new record.
    pub async fn create<T: RecordContent>(&self, content: T) -> StoreResult<Record<T>> {
        let mut record = Record::new(content);
        self.upsert(&mut record).await?;
        Ok(record)
    }

    /// Post the record's current content as its next revision.
    pub async fn upsert<T: RecordContent>(&self, record: &mut Record<T>) -> StoreResult<()> {
        self.upsert_with(record, None, None).await
    }

    /// [`upsert`](Self::upsert) with an explicit account and channel.
    ///
    /// A record enters the indices of its type only on its first post; later
    /// revisions leave index entries untouched even if the indexed field
    /// changed.
    pub async fn upsert_with<T: RecordContent>(
        &self,
        record: &mut Record<T>,
        account: Option<&Account>,
        channel: Option<&str>,
    ) -> StoreResult<()> {
        self.post_or_amend(record, account, channel).await?;
        if record.current_revision() == Some(0) {
            let added = self
                .indices
                .write()
                .expect("lock poisoned")
                .add_record(&*record)?;
            debug!(record = %record, indices = added, "record indexed");
        }
        Ok(())
    }

    /// Post the record's content: as a new record if it has never been
    /// posted, otherwise as an amendment referencing its canonical hash.
    pub async fn post_or_amend<T: RecordContent>(
        &self,
        record: &mut Record<T>,
        account: Option<&Account>,
        channel: Option<&str>,
    ) -> StoreResult<ItemHash> {
        if record.is_forgotten() {
            return Err(StoreError::RecordForgotten(record.to_string()));
        }
        let account = account.unwrap_or(&self.fallback);
        let channel = channel.unwrap_or(self.config.default_channel.as_str());
        let content = record.content_value()?;

        let receipt = self
            .client
            .create_post(account, content, T::TYPE_NAME, channel, record.item_hash())
            .await?;
        let hash = receipt.expect_type(MessageType::Post)?;

        match record.chain_mut() {
            Some(chain) => {
                chain.append(hash);
            }
            None => record.originate(RevisionChain::originate(hash), channel),
        }
        debug!(
            record = %record,
            revision = record.current_revision().unwrap_or_default(),
            item_hash = %hash.short_hex(),
            channel,
            "record posted"
        );
        Ok(hash)
    }

    /// Forget every post of the record. Terminal.
    pub async fn forget<T: RecordContent>(&self, record: &mut Record<T>) -> StoreResult<()> {
        self.forget_with(record, None, None).await
    }

    pub async fn forget_with<T: RecordContent>(
        &self,
        record: &mut Record<T>,
        account: Option<&Account>,
        channel: Option<&str>,
    ) -> StoreResult<()> {
        if record.is_forgotten() {
            return Err(StoreError::AlreadyForgotten(record.to_string()));
        }
        let hashes = record
            .chain()
            .ok_or_else(|| StoreError::NotPersisted(record.to_string()))?
            .hashes()
            .to_vec();
        let account = account.unwrap_or(&self.fallback);
        let channel = channel.unwrap_or(self.config.default_channel.as_str());

        let receipt = self.client.forget(account, &hashes, None, channel).await?;
        receipt.expect_type(MessageType::Forget)?;
        record.mark_forgotten();

        info!(record = %record, revisions = hashes.len(), channel, "record forgotten");
        Ok(())
    }

    // ---- Revisions ----

    /// Materialize the revision named by exactly one of `rev_no` or
    /// `rev_hash`. Negative revision numbers count from the newest revision.
    pub async fn fetch_revision<T: RecordContent>(
        &self,
        record: &mut Record<T>,
        rev_no: Option<i64>,
        rev_hash: Option<ItemHash>,
    ) -> StoreResult<()> {
        let selector = RevisionSelector::from_parts(rev_no, rev_hash)?;
        self.fetch_revision_at(record, selector).await
    }

    /// Materialize the revision named by `selector`.
    ///
    /// The content is always read from the network. The persisted chain is
    /// not altered; only the record's content and cursor move.
    pub async fn fetch_revision_at<T: RecordContent>(
        &self,
        record: &mut Record<T>,
        selector: RevisionSelector,
    ) -> StoreResult<()> {
        if record.is_forgotten() {
            return Err(StoreError::RecordForgotten(record.to_string()));
        }
        let chain = record
            .chain()
            .ok_or_else(|| StoreError::NotPersisted(record.to_string()))?;
        let target = chain.resolve(selector)?;
        if target == chain.current() {
            return Ok(());
        }
        let canonical = chain.canonical();
        let hash = chain.hash_at(target).ok_or_else(|| ChainError::RevisionNotFound {
            record: canonical,
            revision: selector.to_string(),
        })?;

        let query = PostQuery::new()
            .with_hashes(vec![hash])
            .with_type(T::TYPE_NAME);
        let post = self
            .client
            .get_posts(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ChainError::RevisionNotFound {
                record: canonical,
                revision: hash.to_string(),
            })?;
        let content = self.decode::<T>(&post)?;

        record.set_content(content);
        if let Some(chain) = record.chain_mut() {
            chain.set_current(target)?;
        }
        debug!(record = %record, revision = target, "revision materialized");
        Ok(())
    }

    /// Pick up revisions posted since the record was loaded.
    ///
    /// Amendments are searched for in the record's own channel and merged
    /// into the chain; known revisions and the cursor stay where they are.
    pub async fn update_revision_hashes<T: RecordContent>(
        &self,
        record: &mut Record<T>,
    ) -> StoreResult<()> {
        let canonical = record
            .item_hash()
            .ok_or_else(|| StoreError::NotPersisted(record.to_string()))?;
        let channel = record.channel().map(str::to_string);
        let revisions = self
            .fetch_revisions::<T>(canonical, channel.as_deref(), None)
            .await?;
        if let Some(chain) = record.chain_mut() {
            chain.merge_revisions(revisions);
        }
        Ok(())
    }

    /// Hashes of every post amending `reference`, oldest first.
    ///
    /// With neither `channel` nor `owner`, the default channel is searched.
    pub async fn fetch_revisions<T: RecordContent>(
        &self,
        reference: ItemHash,
        channel: Option<&str>,
        owner: Option<&Address>,
    ) -> StoreResult<Vec<ItemHash>> {
        let query = self.scoped(
            PostQuery::new()
                .with_refs(vec![reference])
                .with_type(T::TYPE_NAME),
            channel,
            owner,
            channel.is_none() && owner.is_none(),
        );
        let posts = self.client.get_posts(&query).await?;
        debug!(
            reference = %reference.short_hex(),
            count = posts.len(),
            "revisions fetched"
        );
        // The network answers newest first.
        Ok(posts.into_iter().rev().map(|post| post.item_hash).collect())
    }

    // ---- Reconstruction ----

    /// Rebuild a record from one of its posts.
    ///
    /// The cursor lands on the post's own revision, which is not necessarily
    /// the newest one.
    pub async fn from_post<T: RecordContent>(&self, post: RawPost) -> StoreResult<Record<T>> {
        let content = self.decode::<T>(&post)?;
        let canonical = post.canonical_hash();
        let revisions = self
            .fetch_revisions::<T>(canonical, Some(&post.channel), None)
            .await?;
        let chain = RevisionChain::from_revisions(canonical, revisions, post.item_hash)?;
        Ok(Record::from_chain(content, chain, post.channel))
    }

    /// Fetch records by hash, or by channel and owner.
    ///
    /// With none of the three filters, the default channel is searched.
    /// Records are reconstructed concurrently and returned in the network's
    /// order.
    pub async fn fetch_records<T: RecordContent>(
        &self,
        hashes: Option<Vec<ItemHash>>,
        channel: Option<&str>,
        owner: Option<&Address>,
    ) -> StoreResult<Vec<Record<T>>> {
        if hashes.as_ref().is_some_and(Vec::is_empty) {
            return Ok(Vec::new());
        }
        let use_default = hashes.is_none() && channel.is_none() && owner.is_none();
        let mut query = PostQuery::new().with_type(T::TYPE_NAME);
        if let Some(hashes) = hashes {
            query = query.with_hashes(hashes);
        }
        let query = self.scoped(query, channel, owner, use_default);

        let posts = self.client.get_posts(&query).await?;
        debug!(post_type = T::TYPE_NAME, count = posts.len(), "reconstructing records");

        stream::iter(posts.into_iter().map(|post| self.from_post::<T>(post)))
            .buffered(self.config.fetch_concurrency.max(1))
            .try_collect()
            .await
    }

    /// Fetch records by canonical hash.
    pub async fn fetch<T: RecordContent>(&self, hashes: &[ItemHash]) -> StoreResult<Vec<Record<T>>> {
        self.fetch_records(Some(hashes.to_vec()), None, None).await
    }

    /// Every `T` post in the default channel.
    pub async fn fetch_all<T: RecordContent>(&self) -> StoreResult<Vec<Record<T>>> {
        self.fetch_records(None, None, None).await
    }

    /// Fetch records whose indexed field matches one of `keys`.
    ///
    /// `index` is either the bare field name or `"{Type}.{field}"`.
    pub async fn query<T: RecordContent, K: AsRef<str>>(
        &self,
        keys: &[K],
        index: &str,
    ) -> StoreResult<Vec<Record<T>>> {
        let keys: Vec<String> = keys.iter().map(|k| k.as_ref().to_string()).collect();
        self.fetch_indexed(index, Some(keys.as_slice())).await
    }

    /// Fetch indexed records. `None` fetches everything in the index.
    pub async fn fetch_indexed<T: RecordContent>(
        &self,
        index: &str,
        keys: Option<&[String]>,
    ) -> StoreResult<Vec<Record<T>>> {
        let hashes = {
            let indices = self.indices.read().expect("lock poisoned");
            indices.get(T::TYPE_NAME, index)?.resolve(keys)?
        };
        self.fetch_records(Some(hashes), None, None).await
    }

    // ---- Helpers ----

    fn scoped(
        &self,
        mut query: PostQuery,
        channel: Option<&str>,
        owner: Option<&Address>,
        use_default: bool,
    ) -> PostQuery {
        if let Some(channel) = channel {
            query = query.with_channel(channel);
        } else if use_default {
            query = query.with_channel(self.config.default_channel.clone());
        }
        if let Some(owner) = owner {
            query = query.with_address(owner.clone());
        }
        query
    }

    fn decode<T: RecordContent>(&self, post: &RawPost) -> StoreResult<T> {
        let types = self.types.read().expect("lock poisoned");
        types.decode::<T>(post).inspect_err(|e| {
            if let StoreError::UnresolvableType { post_type, channel, .. } = e {
                warn!(post_type, channel, item_hash = %post.item_hash.short_hex(), "unresolvable post type");
            }
        })
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("config", &self.config)
            .field("fallback", &self.fallback)
            .finish()
    }
}
