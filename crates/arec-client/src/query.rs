use arec_types::{Address, ItemHash, RawPost};
use serde::{Deserialize, Serialize};

/// Filter for [`PostClient::get_posts`](crate::PostClient::get_posts).
///
/// Every filter that is set must match; an unset filter matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostQuery {
    pub hashes: Option<Vec<ItemHash>>,
    pub refs: Option<Vec<ItemHash>>,
    pub channels: Option<Vec<String>>,
    pub types: Option<Vec<String>>,
    pub addresses: Option<Vec<Address>>,
}

impl PostQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hashes(mut self, hashes: Vec<ItemHash>) -> Self {
        self.hashes = Some(hashes);
        self
    }

    pub fn with_refs(mut self, refs: Vec<ItemHash>) -> Self {
        self.refs = Some(refs);
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channels.get_or_insert_with(Vec::new).push(channel.into());
        self
    }

    pub fn with_type(mut self, post_type: impl Into<String>) -> Self {
        self.types.get_or_insert_with(Vec::new).push(post_type.into());
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.addresses.get_or_insert_with(Vec::new).push(address);
        self
    }

    /// Whether `post` passes every filter set on this query.
    pub fn matches(&self, post: &RawPost) -> bool {
        fn allows<T: PartialEq>(filter: &Option<Vec<T>>, value: &T) -> bool {
            filter.as_ref().map_or(true, |allowed| allowed.contains(value))
        }

        let ref_ok = match (&self.refs, &post.reference) {
            (None, _) => true,
            (Some(refs), Some(r)) => refs.contains(r),
            (Some(_), None) => false,
        };

        ref_ok
            && allows(&self.hashes, &post.item_hash)
            && allows(&self.channels, &post.channel)
            && allows(&self.types, &post.post_type)
            && allows(&self.addresses, &post.sender)
    }
}
