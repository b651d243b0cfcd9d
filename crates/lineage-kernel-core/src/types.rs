//! Strong type definitions for the Lineage Kernel.
//!
//! Identifiers are newtypes so a curator address can never be passed where a
//! knowledge-block id is expected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Prefix carried by every identifier in its text form.
pub const ID_PREFIX: &str = "0x";

/// A 32-byte knowledge-block identifier: SHA-256 of the canonical envelope.
///
/// Text form is `0x` followed by 64 lowercase hex digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KbId(pub [u8; 32]);

impl KbId {
    /// Create a new KbId from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex digits without the `0x` prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse an identifier.
    ///
    /// The `0x` prefix is optional; the digits must be 64 lowercase hex.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let digits = s.strip_prefix(ID_PREFIX).unwrap_or(s);
        if digits.len() != 64
            || !digits
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return Err(CoreError::InvalidIdentifier(s.to_string()));
        }
        let mut arr = [0u8; 32];
        hex::decode_to_slice(digits, &mut arr)
            .map_err(|e| CoreError::InvalidIdentifier(format!("{s}: {e}")))?;
        Ok(Self(arr))
    }

    /// The zero identifier (used as a sentinel).
    pub const ZERO: Self = Self([0u8; 32]);
}

impl fmt::Debug for KbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KbId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for KbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ID_PREFIX}{}", self.to_hex())
    }
}

impl FromStr for KbId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<[u8]> for KbId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for KbId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for KbId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KbId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Normalize an identifier string to its `0x`-prefixed form.
///
/// Only the prefix is touched; the digits are not validated here.
pub fn normalize_id(id: &str) -> String {
    if id.starts_with(ID_PREFIX) {
        id.to_string()
    } else {
        format!("{ID_PREFIX}{id}")
    }
}

/// The party that registered a record. Opaque to the kernel.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Curator(pub String);

impl Curator {
    /// Returned for unknown records.
    pub const ZERO_ADDRESS: &'static str = "0x0000000000000000000000000000000000000000";

    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The sentinel curator.
    pub fn zero() -> Self {
        Self(Self::ZERO_ADDRESS.to_string())
    }

    pub fn is_zero(&self) -> bool {
        self.0 == Self::ZERO_ADDRESS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Curator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Curator({})", self.0)
    }
}

impl fmt::Display for Curator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Curator {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
