use std::path::Path;

use arec_crypto::Account;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Channel used when a caller names neither a channel nor an owner.
pub const DEFAULT_CHANNEL: &str = "AREC_TEST";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub default_channel: String,
    /// Hex-encoded 32-byte seed of the fallback account. A random account is
    /// generated when unset.
    pub fallback_seed: Option<String>,
    /// Maximum number of records reconstructed concurrently by one fetch.
    pub fetch_concurrency: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_channel: DEFAULT_CHANNEL.to_string(),
            fallback_seed: None,
            fetch_concurrency: 16,
        }
    }
}

impl StoreConfig {
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| StoreError::Config(e.to_string()))?;
        if config.fetch_concurrency == 0 {
            return Err(StoreError::Config(
                "fetch_concurrency must be at least 1".into(),
            ));
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// Resolve the account used whenever a caller supplies none.
    pub fn resolve_fallback_account(&self) -> StoreResult<Account> {
        match &self.fallback_seed {
            Some(seed) => {
                Account::from_hex_seed(seed).map_err(|e| StoreError::Config(e.to_string()))
            }
            None => Ok(Account::generate()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = StoreConfig::default();
        assert_eq!(c.default_channel, "AREC_TEST");
        assert_eq!(c.fetch_concurrency, 16);
        assert!(c.fallback_seed.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = StoreConfig::from_toml_str("default_channel = \"LIBRARY\"").unwrap();
        assert_eq!(c.default_channel, "LIBRARY");
        assert_eq!(c.fetch_concurrency, 16);
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let err = StoreConfig::from_toml_str("fetch_concurrency = 0").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fallback_seed = \"{}\"", "11".repeat(32)).unwrap();
        writeln!(file, "fetch_concurrency = 4").unwrap();

        let c = StoreConfig::load(file.path()).unwrap();
        assert_eq!(c.fetch_concurrency, 4);
        let a = c.resolve_fallback_account().unwrap();
        let b = c.resolve_fallback_account().unwrap();
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = StoreConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn bad_seed_is_a_config_error() {
        let c = StoreConfig {
            fallback_seed: Some("xyz".into()),
            ..StoreConfig::default()
        };
        assert!(matches!(
            c.resolve_fallback_account(),
            Err(StoreError::Config(_))
        ));
    }
}
