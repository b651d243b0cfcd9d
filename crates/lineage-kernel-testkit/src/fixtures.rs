//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use lineage_kernel::{Registry, RegistryConfig, Result};
use lineage_kernel_core::payload::{
    AdaptationPayload, ComplianceChecklistPayload, ComplianceRequirement, Concern,
    EnhancementPayload, EvidenceKind, EvidenceMapping, FeaturePayload, PatternOccurrence,
    PatternPayload, PracticePayload, PromptEngineeringPayload, RubricDimension, RubricPayload,
    RubricThresholds, StateMachinePayload, SynthesisPayload,
};
use lineage_kernel_core::{CanonicalEnvelope, Curator, EnvelopeBuilder, KbId, KbType, Payload};
use lineage_kernel_store::MemoryStore;
use rand::RngCore;
use serde_json::json;

/// A registry over a fresh memory store, plus the curator acting on it.
pub struct TestFixture {
    pub registry: Registry<MemoryStore>,
    pub curator: Curator,
}

impl TestFixture {
    /// Create a fixture with a random curator address.
    pub fn new() -> Self {
        let mut bytes = [0u8; 20];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::with_curator(Curator::new(format!("0x{}", hex::encode(bytes))))
    }

    pub fn with_curator(curator: Curator) -> Self {
        Self::with_config(curator, RegistryConfig::default())
    }

    pub fn with_config(curator: Curator, config: RegistryConfig) -> Self {
        Self {
            registry: Registry::new(MemoryStore::new(), config),
            curator,
        }
    }

    /// Register a root practice envelope distinguished by `label`.
    pub async fn register_root(&self, label: &str) -> Result<KbId> {
        let out = self
            .registry
            .register(&root_envelope(label), &self.curator)
            .await?;
        Ok(out.id)
    }

    /// Register a practice envelope citing `parents`.
    pub async fn register_child(&self, label: &str, parents: &[KbId]) -> Result<KbId> {
        let out = self
            .registry
            .register(&child_envelope(label, parents), &self.curator)
            .await?;
        Ok(out.id)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Distinct deterministic curators, `0x…01`, `0x…02`, and so on.
pub fn multi_curators(count: usize) -> Vec<Curator> {
    (1..=count)
        .map(|i| Curator::new(format!("0x{i:040x}")))
        .collect()
}

/// Practice payload with the given rationale.
pub fn practice(rationale: &str) -> Payload {
    Payload::Practice(PracticePayload {
        rationale: rationale.into(),
        contexts: vec![],
        failure_modes: vec![],
    })
}

/// `{type: practice, domain: demo, sources: []}` with the given rationale.
pub fn root_envelope(rationale: &str) -> CanonicalEnvelope {
    CanonicalEnvelope::root("demo", practice(rationale))
}

/// Practice envelope citing `parents`, sources normalized and sorted.
pub fn child_envelope(rationale: &str, parents: &[KbId]) -> CanonicalEnvelope {
    EnvelopeBuilder::new("demo", practice(rationale))
        .sources(parents.iter().map(KbId::to_string))
        .build()
}

/// A small valid payload of every kind.
pub fn sample_payload(kind: KbType) -> Payload {
    match kind {
        KbType::Practice => practice("prefer small commits"),
        KbType::Feature => Payload::Feature(FeaturePayload {
            interface_contract: json!({"fn": "parse(input: string): Ast"}),
            test_scaffold: json!({"cases": []}),
        }),
        KbType::StateMachine => Payload::StateMachine(StateMachinePayload {
            states: vec![json!("idle"), json!("running")],
            transitions: vec![json!({"from": "idle", "to": "running"})],
            invariants: vec![],
        }),
        KbType::PromptEngineering => Payload::PromptEngineering(PromptEngineeringPayload {
            template: "Summarize: {{text}}".into(),
            model_version: "v1".into(),
            eval_criteria: vec![json!("faithful")],
        }),
        KbType::ComplianceChecklist => Payload::ComplianceChecklist(ComplianceChecklistPayload {
            jurisdiction_tags: vec!["EU".into()],
            requirements: vec![ComplianceRequirement {
                id: "gdpr-17".into(),
                description: "right to erasure".into(),
                is_mandatory: true,
            }],
            evidence_mapping: EvidenceMapping {
                kind: EvidenceKind::AuditTrail,
                validation_logic: "deletion logged".into(),
            },
        }),
        KbType::Rubric => Payload::Rubric(RubricPayload {
            dimensions: vec![
                RubricDimension {
                    criterion: "clarity".into(),
                    weight: 0.5,
                },
                RubricDimension {
                    criterion: "accuracy".into(),
                    weight: 1.0,
                },
            ],
            scoring_logic: "weighted".into(),
            thresholds: RubricThresholds {
                pass: 0.7,
                escalate: 0.3,
            },
        }),
        KbType::Synthesis => Payload::Synthesis(SynthesisPayload {
            question: "q".into(),
            answer: "a".into(),
            citations: Default::default(),
        }),
        KbType::Pattern => Payload::Pattern(PatternPayload {
            pattern: "retry with backoff".into(),
            occurrences: vec![PatternOccurrence {
                kb_hash: format!("0x{}", "ab".repeat(32)),
                context: "http client".into(),
                offset: None,
            }],
            applicability: "network calls".into(),
        }),
        KbType::Adaptation => Payload::Adaptation(AdaptationPayload {
            target_domain: "mobile".into(),
            adapted_content: "batch requests".into(),
            tradeoffs: vec!["latency".into()],
        }),
        KbType::Enhancement => Payload::Enhancement(EnhancementPayload {
            concern: Concern::Observability,
            enhanced_content: "emit spans".into(),
        }),
    }
}
