//! Envelope construction with normalized, sorted source references.
//!
//! The builder only shapes envelopes. Coverage of derivation inputs by
//! `sources` is checked by the registry at commit time.

use serde_json::{Map, Value};

use crate::envelope::{CanonicalEnvelope, Derivation, DerivationInput, DerivationType};
use crate::payload::Payload;
use crate::types::normalize_id;

/// Fluent builder for [`CanonicalEnvelope`].
///
/// `build()` prefixes every source and derivation input with `0x` and sorts
/// the sources. The envelope kind is always taken from the payload.
#[derive(Debug, Clone)]
pub struct EnvelopeBuilder {
    domain: String,
    sources: Vec<String>,
    payload: Payload,
    derivation: Option<Derivation>,
}

impl EnvelopeBuilder {
    pub fn new(domain: impl Into<String>, payload: Payload) -> Self {
        Self {
            domain: domain.into(),
            sources: Vec::new(),
            payload,
            derivation: None,
        }
    }

    /// Add a parent identifier.
    pub fn source(mut self, id: impl Into<String>) -> Self {
        self.sources.push(id.into());
        self
    }

    /// Add several parent identifiers.
    pub fn sources<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Attach synthesis metadata.
    pub fn derivation(
        mut self,
        kind: DerivationType,
        inputs: Vec<DerivationInput>,
        recipe: Map<String, Value>,
    ) -> Self {
        self.derivation = Some(Derivation {
            kind,
            inputs,
            recipe,
        });
        self
    }

    pub fn build(self) -> CanonicalEnvelope {
        let mut sources: Vec<String> = self.sources.iter().map(|s| normalize_id(s)).collect();
        sources.sort();

        let derivation = self.derivation.map(|d| Derivation {
            kind: d.kind,
            inputs: d
                .inputs
                .into_iter()
                .map(|i| DerivationInput {
                    kb_id: normalize_id(&i.kb_id),
                    selectors: i.selectors,
                })
                .collect(),
            recipe: d.recipe,
        });

        CanonicalEnvelope {
            kind: self.payload.kind(),
            domain: self.domain,
            sources,
            payload: self.payload,
            derivation,
        }
    }
}

/// Inputs for [`build_derived_envelope`].
#[derive(Debug, Clone)]
pub struct DerivedEnvelopeInput {
    pub domain: String,
    pub sources: Vec<String>,
    pub derivation: Derivation,
    pub payload: Payload,
}

/// Assemble a derived envelope from its parents and recipe.
pub fn build_derived_envelope(input: DerivedEnvelopeInput) -> CanonicalEnvelope {
    EnvelopeBuilder::new(input.domain, input.payload)
        .sources(input.sources)
        .derivation(
            input.derivation.kind,
            input.derivation.inputs,
            input.derivation.recipe,
        )
        .build()
}
