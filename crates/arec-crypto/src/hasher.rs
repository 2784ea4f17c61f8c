use arec_types::ItemHash;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g., `"arec-post-v1"`) that is
/// prepended to every hash computation, so a post and an address derived
/// from the same bytes never collide.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for post item hashes.
    pub const POST: Self = Self {
        domain: "arec-post-v1",
    };
    /// Hasher for account addresses.
    pub const ADDRESS: Self = Self {
        domain: "arec-address-v1",
    };

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> ItemHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        ItemHash::from_hash(*hasher.finalize().as_bytes())
    }

    /// Hash a serializable value as JSON with domain separation.
    pub fn hash_json<T: serde::Serialize>(&self, value: &T) -> Result<ItemHash, HasherError> {
        let data =
            serde_json::to_vec(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok(self.hash(&data))
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let id1 = ContentHasher::POST.hash(b"hello world");
        let id2 = ContentHasher::POST.hash(b"hello world");
        assert_eq!(id1, id2);
    }

    #[test]
    fn different_domains_produce_different_hashes() {
        let data = b"same content";
        assert_ne!(
            ContentHasher::POST.hash(data),
            ContentHasher::ADDRESS.hash(data)
        );
    }

    #[test]
    fn hash_json_depends_on_content() {
        let a = ContentHasher::POST
            .hash_json(&serde_json::json!({"value": 1}))
            .unwrap();
        let b = ContentHasher::POST
            .hash_json(&serde_json::json!({"value": 2}))
            .unwrap();
        assert_ne!(a, b);
    }
}
