//! The canonical envelope: the unit of identity.
//!
//! An envelope's identifier is a pure function of `{type, domain, sources,
//! payload, derivation}`. Curator, registration time, and signatures are kept
//! out of this struct so that nobody can move an artifact's address.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::payload::{KbType, Payload};
use crate::types::normalize_id;

/// Method of deterministic synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivationType {
    Compose,
    Transform,
    Extract,
    Summarize,
}

/// One source consumed by a derivation, with the fields it drew on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DerivationInput {
    pub kb_id: String,
    pub selectors: Vec<String>,
}

impl DerivationInput {
    pub fn new(kb_id: impl Into<String>, selectors: Vec<String>) -> Self {
        Self {
            kb_id: kb_id.into(),
            selectors,
        }
    }
}

/// Synthesis metadata. Part of the hash preimage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Derivation {
    #[serde(rename = "type")]
    pub kind: DerivationType,
    pub inputs: Vec<DerivationInput>,
    /// Deterministic transformation parameters.
    pub recipe: Map<String, Value>,
}

/// The record whose canonical form is hashed into a [`KbId`](crate::KbId).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanonicalEnvelope {
    #[serde(rename = "type")]
    pub kind: KbType,
    pub domain: String,
    /// Parent identifiers. Must be sorted and duplicate-free to register.
    pub sources: Vec<String>,
    pub payload: Payload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivation: Option<Derivation>,
}

impl CanonicalEnvelope {
    /// A root envelope (no sources, no derivation) whose kind follows its payload.
    pub fn root(domain: impl Into<String>, payload: Payload) -> Self {
        Self {
            kind: payload.kind(),
            domain: domain.into(),
            sources: Vec::new(),
            payload,
            derivation: None,
        }
    }

    /// Whether this envelope was synthesized from other artifacts.
    pub fn is_derived(&self) -> bool {
        self.derivation.is_some()
    }

    /// Sources with the `0x` prefix applied, in declared order.
    pub fn normalized_sources(&self) -> Vec<String> {
        self.sources.iter().map(|s| normalize_id(s)).collect()
    }
}
