//! Hashing primitives: SHA-256 digests and CIDv1 (raw codec).

use cid::Cid;
use multihash_codetable::{Code, MultihashDigest};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Multicodec for raw binary content.
pub const RAW_CODEC: u64 = 0x55;

/// Multihash code for SHA2-256.
pub const SHA2_256_CODE: u64 = 0x12;

/// A 32-byte SHA-256 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Hash(pub [u8; 32]);

impl Sha256Hash {
    /// Compute the SHA-256 hash of data.
    pub fn hash(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Recover the digest carried by a SHA2-256 CID.
    pub fn from_cid(cid: &str) -> Result<Self, CoreError> {
        let cid = Cid::from_str(cid).map_err(|e| CoreError::InvalidCid(format!("{cid}: {e}")))?;
        let mh = cid.hash();
        if mh.code() != SHA2_256_CODE {
            return Err(CoreError::InvalidCid(format!(
                "unsupported multihash code {:#x}",
                mh.code()
            )));
        }
        let digest: [u8; 32] = mh
            .digest()
            .try_into()
            .map_err(|_| CoreError::InvalidCid("digest is not 32 bytes".into()))?;
        Ok(Self(digest))
    }
}

impl fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA256({}...)", &self.to_hex()[..8])
    }
}

impl AsRef<[u8]> for Sha256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Sha256Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// SHA-256 of a string's UTF-8 bytes, as lowercase hex.
pub fn sha256_hex(data: &str) -> String {
    Sha256Hash::hash(data.as_bytes()).to_hex()
}

/// CIDv1 (raw codec, SHA2-256 multihash) of arbitrary bytes, base32 text form.
pub fn cid_v1_from_bytes(bytes: &[u8]) -> String {
    let hash = Code::Sha2_256.digest(bytes);
    Cid::new_v1(RAW_CODEC, hash).to_string()
}

/// Check that `claimed` is the raw-codec CIDv1 of `bytes`.
///
/// Any multibase encoding of the right CID is accepted.
pub fn verify_cid(bytes: &[u8], claimed: &str) -> bool {
    match Cid::from_str(claimed) {
        Ok(parsed) => parsed == Cid::new_v1(RAW_CODEC, Code::Sha2_256.digest(bytes)),
        Err(_) => false,
    }
}
