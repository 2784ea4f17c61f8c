use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Sender address of an account on the post network.
///
/// Addresses are `0x`-prefixed, 20-byte, lowercase hex strings. They are
/// derived from an account's public key and identify the owner of a post
/// for filtering (`owner`) and for forget authorization.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Length of an address in bytes, before hex encoding.
    pub const BYTE_LEN: usize = 20;

    /// Build an address from its raw bytes.
    pub fn from_bytes(bytes: [u8; Self::BYTE_LEN]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// Parse and validate an address string.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let body = s
            .strip_prefix("0x")
            .ok_or_else(|| TypeError::InvalidAddress(format!("missing 0x prefix: {s}")))?;
        let bytes = hex::decode(body).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != Self::BYTE_LEN {
            return Err(TypeError::InvalidLength {
                expected: Self::BYTE_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}
