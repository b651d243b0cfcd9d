//! Typed payloads, one variant per artifact kind.
//!
//! Every payload struct rejects unknown members, so a decoded payload always
//! re-serializes to exactly the fields that were hashed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// The ten fixed artifact kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KbType {
    Practice,
    Feature,
    StateMachine,
    PromptEngineering,
    ComplianceChecklist,
    Rubric,
    Synthesis,
    Pattern,
    Adaptation,
    Enhancement,
}

impl KbType {
    pub const ALL: [KbType; 10] = [
        KbType::Practice,
        KbType::Feature,
        KbType::StateMachine,
        KbType::PromptEngineering,
        KbType::ComplianceChecklist,
        KbType::Rubric,
        KbType::Synthesis,
        KbType::Pattern,
        KbType::Adaptation,
        KbType::Enhancement,
    ];

    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            KbType::Practice => "practice",
            KbType::Feature => "feature",
            KbType::StateMachine => "stateMachine",
            KbType::PromptEngineering => "promptEngineering",
            KbType::ComplianceChecklist => "complianceChecklist",
            KbType::Rubric => "rubric",
            KbType::Synthesis => "synthesis",
            KbType::Pattern => "pattern",
            KbType::Adaptation => "adaptation",
            KbType::Enhancement => "enhancement",
        }
    }
}

impl fmt::Display for KbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KbType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KbType::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CoreError::UnsupportedValue(format!("unknown artifact kind {s:?}")))
    }
}

/// Type-specific payload, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Payload {
    Practice(PracticePayload),
    Feature(FeaturePayload),
    StateMachine(StateMachinePayload),
    PromptEngineering(PromptEngineeringPayload),
    ComplianceChecklist(ComplianceChecklistPayload),
    Rubric(RubricPayload),
    Synthesis(SynthesisPayload),
    Pattern(PatternPayload),
    Adaptation(AdaptationPayload),
    Enhancement(EnhancementPayload),
}

impl Payload {
    /// The artifact kind this payload carries.
    pub fn kind(&self) -> KbType {
        match self {
            Payload::Practice(_) => KbType::Practice,
            Payload::Feature(_) => KbType::Feature,
            Payload::StateMachine(_) => KbType::StateMachine,
            Payload::PromptEngineering(_) => KbType::PromptEngineering,
            Payload::ComplianceChecklist(_) => KbType::ComplianceChecklist,
            Payload::Rubric(_) => KbType::Rubric,
            Payload::Synthesis(_) => KbType::Synthesis,
            Payload::Pattern(_) => KbType::Pattern,
            Payload::Adaptation(_) => KbType::Adaptation,
            Payload::Enhancement(_) => KbType::Enhancement,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PracticePayload {
    pub rationale: String,
    pub contexts: Vec<Value>,
    pub failure_modes: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FeaturePayload {
    pub interface_contract: Value,
    pub test_scaffold: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StateMachinePayload {
    pub states: Vec<Value>,
    pub transitions: Vec<Value>,
    pub invariants: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PromptEngineeringPayload {
    pub template: String,
    pub model_version: String,
    pub eval_criteria: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComplianceChecklistPayload {
    pub jurisdiction_tags: Vec<String>,
    pub requirements: Vec<ComplianceRequirement>,
    pub evidence_mapping: EvidenceMapping,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComplianceRequirement {
    pub id: String,
    pub description: String,
    pub is_mandatory: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EvidenceMapping {
    #[serde(rename = "type")]
    pub kind: EvidenceKind,
    pub validation_logic: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    LogEntry,
    AuditTrail,
    CryptographicProof,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RubricPayload {
    pub dimensions: Vec<RubricDimension>,
    pub scoring_logic: String,
    pub thresholds: RubricThresholds,
}

/// A scored criterion; `weight` is nominally in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RubricDimension {
    pub criterion: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RubricThresholds {
    pub pass: f64,
    pub escalate: f64,
}

/// Answer synthesized from several sources; `citations` is keyed by source id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SynthesisPayload {
    pub question: String,
    pub answer: String,
    pub citations: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PatternPayload {
    pub pattern: String,
    pub occurrences: Vec<PatternOccurrence>,
    pub applicability: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PatternOccurrence {
    pub kb_hash: String,
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AdaptationPayload {
    pub target_domain: String,
    pub adapted_content: String,
    pub tradeoffs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnhancementPayload {
    pub concern: Concern,
    pub enhanced_content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Concern {
    Observability,
    Security,
    Performance,
    Accessibility,
}
