//! Explicit table of the record types a store can decode.

use std::any::Any;
use std::collections::HashMap;

use arec_types::RawPost;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::record::RecordContent;

type Decoder = fn(Value) -> Result<Box<dyn Any + Send>, serde_json::Error>;

fn decode_as<T: RecordContent>(value: Value) -> Result<Box<dyn Any + Send>, serde_json::Error> {
    Ok(Box::new(serde_json::from_value::<T>(value)?))
}

/// Maps post type names to typed decoders.
///
/// Populated at startup, before any fetch. A post whose type is not
/// registered cannot be turned into a record.
#[derive(Default)]
pub struct TypeRegistry {
    decoders: HashMap<String, Decoder>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under its type name. Returns `false` if the name was
    /// already taken; the earlier registration is replaced.
    pub fn register<T: RecordContent>(&mut self) -> bool {
        self.decoders
            .insert(T::TYPE_NAME.to_string(), decode_as::<T> as Decoder)
            .is_none()
    }

    pub fn is_registered(&self, post_type: &str) -> bool {
        self.decoders.contains_key(post_type)
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.decoders.keys().cloned().collect();
        names.sort();
        names
    }

    /// Decode the content of `post` as a `T`.
    pub fn decode<T: RecordContent>(&self, post: &RawPost) -> StoreResult<T> {
        let decoder =
            self.decoders
                .get(&post.post_type)
                .ok_or_else(|| StoreError::UnresolvableType {
                    post_type: post.post_type.clone(),
                    channel: post.channel.clone(),
                    fields: post.field_names(),
                })?;

        let decoded = decoder(post.content.clone()).map_err(|e| StoreError::MalformedContent {
            post_type: post.post_type.clone(),
            reason: format!("{}: {e}", post.item_hash),
        })?;

        decoded
            .downcast::<T>()
            .map(|content| *content)
            .map_err(|_| StoreError::TypeMismatch {
                item_hash: post.item_hash,
                expected: T::TYPE_NAME.to_string(),
                actual: post.post_type.clone(),
            })
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.names())
            .finish()
    }
}
