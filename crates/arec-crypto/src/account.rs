use arec_types::Address;

use crate::hasher::ContentHasher;

/// An account that posts are sent from.
///
/// Wraps an Ed25519 keypair. The account's [`Address`] is derived from the
/// public key, so the same seed always resolves to the same address.
#[derive(Clone)]
pub struct Account {
    key: ed25519_dalek::SigningKey,
    address: Address,
}

impl Account {
    /// Generate a fresh account with a random key.
    pub fn generate() -> Self {
        let mut csprng = rand::thread_rng();
        Self::from_key(ed25519_dalek::SigningKey::generate(&mut csprng))
    }

    /// Deterministic account from a raw 32-byte secret.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self::from_key(ed25519_dalek::SigningKey::from_bytes(&seed))
    }

    /// Deterministic account from a hex-encoded 32-byte secret.
    pub fn from_hex_seed(seed: &str) -> Result<Self, AccountError> {
        let bytes = hex::decode(seed).map_err(|e| AccountError::InvalidSeed(e.to_string()))?;
        let seed: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            AccountError::InvalidSeed(format!("expected 32 bytes, got {}", b.len()))
        })?;
        Ok(Self::from_seed(seed))
    }

    fn from_key(key: ed25519_dalek::SigningKey) -> Self {
        let digest = ContentHasher::ADDRESS.hash(key.verifying_key().as_bytes());
        let mut raw = [0u8; Address::BYTE_LEN];
        raw.copy_from_slice(&digest.as_bytes()[..Address::BYTE_LEN]);
        Self {
            key,
            address: Address::from_bytes(raw),
        }
    }

    /// The address posts from this account are attributed to.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Raw public key bytes.
    pub fn public_key(&self) -> [u8; 32] {
        self.key.verifying_key().to_bytes()
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Errors from account resolution.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("invalid account seed: {0}")]
    InvalidSeed(String),
}
