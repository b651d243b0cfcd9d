//! Content addressing: envelope → canonical string → identifier and CID.
//!
//! `content_hash` and `cid_v1` share one preimage (the canonical UTF-8 bytes of
//! the normalized envelope), so two envelopes agree on one iff they agree on
//! the other.

use serde_json::Value;

use crate::canonical::{canonicalize_json, to_canonical_string};
use crate::crypto::{cid_v1_from_bytes, Sha256Hash};
use crate::envelope::CanonicalEnvelope;
use crate::error::Result;
use crate::types::KbId;

/// Legacy name of the `sources` member.
const LEGACY_SOURCES_KEY: &str = "parents";

/// Identifier, CID, and the canonical preimage they were derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentAddress {
    pub id: KbId,
    pub cid: String,
    pub canonical: String,
}

/// Identifier of a canonical string.
pub fn content_hash_from_canonical(canonical: &str) -> KbId {
    KbId(Sha256Hash::hash(canonical.as_bytes()).0)
}

/// CIDv1 (raw codec) of a canonical string.
pub fn cid_v1_from_canonical(canonical: &str) -> String {
    cid_v1_from_bytes(canonical.as_bytes())
}

/// Sort `sources` when there is more than one.
pub fn sort_sources(envelope: &CanonicalEnvelope) -> CanonicalEnvelope {
    let mut out = envelope.clone();
    if out.sources.len() > 1 {
        out.sources.sort();
    }
    out
}

/// The hash-ready form of an envelope.
pub fn normalize(envelope: &CanonicalEnvelope) -> CanonicalEnvelope {
    sort_sources(envelope)
}

/// Canonical string of the normalized envelope.
pub fn canonical_envelope_string(envelope: &CanonicalEnvelope) -> Result<String> {
    to_canonical_string(&normalize(envelope))
}

/// `0x` + SHA-256 of the canonical envelope.
pub fn content_hash(envelope: &CanonicalEnvelope) -> Result<KbId> {
    Ok(content_hash_from_canonical(&canonical_envelope_string(envelope)?))
}

/// CIDv1 of the canonical envelope.
pub fn cid_v1(envelope: &CanonicalEnvelope) -> Result<String> {
    Ok(cid_v1_from_canonical(&canonical_envelope_string(envelope)?))
}

/// Identifier and CID in one canonicalization pass.
pub fn address(envelope: &CanonicalEnvelope) -> Result<ContentAddress> {
    let canonical = canonical_envelope_string(envelope)?;
    Ok(ContentAddress {
        id: content_hash_from_canonical(&canonical),
        cid: cid_v1_from_canonical(&canonical),
        canonical,
    })
}

/// Normalize an untyped envelope document.
///
/// Drops the legacy `parents` member, takes `sources` from `sources` (or
/// `parents` when `sources` is absent), and sorts it when every entry is a
/// string and there is more than one. Non-object documents are returned as-is.
pub fn normalize_document(document: &Value) -> Value {
    let Value::Object(map) = document else {
        return document.clone();
    };
    let mut out = map.clone();
    let legacy = out.remove(LEGACY_SOURCES_KEY);
    let sources = match out.remove("sources").or(legacy) {
        Some(Value::Array(mut items)) => {
            if items.len() > 1 {
                let mut texts: Vec<String> = Vec::with_capacity(items.len());
                for item in &items {
                    match item {
                        Value::String(s) => texts.push(s.clone()),
                        _ => break,
                    }
                }
                if texts.len() == items.len() {
                    texts.sort();
                    items = texts.into_iter().map(Value::String).collect();
                }
            }
            Value::Array(items)
        }
        Some(other) => other,
        None => Value::Array(Vec::new()),
    };
    out.insert("sources".into(), sources);
    Value::Object(out)
}

/// Identifier of an untyped envelope document.
pub fn content_hash_document(document: &Value) -> Result<KbId> {
    let canonical = canonicalize_json(&normalize_document(document))?;
    Ok(content_hash_from_canonical(&canonical))
}

/// CIDv1 of an untyped envelope document.
pub fn cid_v1_document(document: &Value) -> Result<String> {
    let canonical = canonicalize_json(&normalize_document(document))?;
    Ok(cid_v1_from_canonical(&canonical))
}
