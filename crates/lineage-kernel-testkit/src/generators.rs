//! Proptest generators for property-based testing.

use ciborium::value::Value as CborValue;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde_json::{Map, Value};

use lineage_kernel_core::canonical::json_to_value;
use lineage_kernel_core::payload::{
    AdaptationPayload, Concern, EnhancementPayload, PracticePayload, RubricDimension,
    RubricPayload, RubricThresholds,
};
use lineage_kernel_core::{CanonicalEnvelope, EnvelopeBuilder, KbId, Payload};
use lineage_kernel_royalty::RoyaltyNode;

/// Generate a random KbId.
pub fn kb_id() -> impl Strategy<Value = KbId> {
    any::<[u8; 32]>().prop_map(KbId::from_bytes)
}

/// Generate a domain name.
pub fn domain() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,15}".prop_map(String::from)
}

/// Generate a JSON document: nested objects, arrays, strings, safe integers
/// and finite doubles.
pub fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-(1i64 << 53) + 1..(1i64 << 53)).prop_map(Value::from),
        (-1e6f64..1e6).prop_map(Value::from),
        "\\PC{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("\\PC{0,8}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Lift `value` into the generic model with every object's entries shuffled.
pub fn shuffle_keys(value: &Value, seed: u64) -> CborValue {
    let mut rng = StdRng::seed_from_u64(seed);
    shuffle_with(&json_to_value(value), &mut rng)
}

fn shuffle_with(value: &CborValue, rng: &mut StdRng) -> CborValue {
    match value {
        CborValue::Map(entries) => {
            let mut entries: Vec<(CborValue, CborValue)> = entries
                .iter()
                .map(|(k, v)| (k.clone(), shuffle_with(v, rng)))
                .collect();
            entries.shuffle(rng);
            CborValue::Map(entries)
        }
        CborValue::Array(items) => {
            CborValue::Array(items.iter().map(|v| shuffle_with(v, rng)).collect())
        }
        other => other.clone(),
    }
}

/// Generate a payload from a representative subset of kinds.
pub fn payload() -> impl Strategy<Value = Payload> {
    prop_oneof![
        ("\\PC{0,32}", prop::collection::vec(json_value(), 0..3)).prop_map(
            |(rationale, contexts)| Payload::Practice(PracticePayload {
                rationale,
                contexts,
                failure_modes: vec![],
            })
        ),
        ("[a-z]{1,12}", "\\PC{0,32}", prop::collection::vec("[a-z]{1,8}", 0..4)).prop_map(
            |(target_domain, adapted_content, tradeoffs)| Payload::Adaptation(AdaptationPayload {
                target_domain,
                adapted_content,
                tradeoffs,
            })
        ),
        (concern(), "\\PC{0,32}").prop_map(|(concern, enhanced_content)| {
            Payload::Enhancement(EnhancementPayload {
                concern,
                enhanced_content,
            })
        }),
        (prop::collection::vec(("[a-z]{1,8}", 0.0f64..=1.0), 1..4), 0.0f64..=1.0).prop_map(
            |(dims, pass)| Payload::Rubric(RubricPayload {
                dimensions: dims
                    .into_iter()
                    .map(|(criterion, weight)| RubricDimension { criterion, weight })
                    .collect(),
                scoring_logic: "weighted".into(),
                thresholds: RubricThresholds {
                    pass,
                    escalate: pass / 2.0,
                },
            })
        ),
    ]
}

fn concern() -> impl Strategy<Value = Concern> {
    prop_oneof![
        Just(Concern::Observability),
        Just(Concern::Security),
        Just(Concern::Performance),
        Just(Concern::Accessibility),
    ]
}

/// Generate an envelope with up to four sources, normalized and sorted.
pub fn envelope() -> impl Strategy<Value = CanonicalEnvelope> {
    (
        domain(),
        payload(),
        prop::collection::btree_set(kb_id(), 0..4),
    )
        .prop_map(|(domain, payload, sources)| {
            EnvelopeBuilder::new(domain, payload)
                .sources(sources.iter().map(KbId::to_string))
                .build()
        })
}

/// Generate an acyclic royalty graph of up to `max_nodes` nodes.
///
/// Node `i` may only cite nodes with a larger index, and splits what its
/// creator does not keep in equal whole-percent shares across its parents, so
/// every node satisfies the share bounds.
pub fn royalty_dag(max_nodes: usize) -> impl Strategy<Value = Vec<RoyaltyNode>> {
    (1..=max_nodes.max(1))
        .prop_flat_map(|n| {
            (
                Just(n),
                prop::collection::vec(0u8..=100, n),
                prop::collection::vec(any::<u64>(), n),
            )
        })
        .prop_map(|(n, bases, masks)| {
            (0..n)
                .map(|i| {
                    let base = f64::from(bases[i]);
                    let mut node = RoyaltyNode::new(format!("n{i}"), format!("c{i}"), base);
                    let parents: Vec<usize> = ((i + 1)..n)
                        .filter(|j| masks[i] & (1 << (j % 64)) != 0)
                        .collect();
                    if !parents.is_empty() {
                        let share = (f64::from(100 - bases[i]) / parents.len() as f64).floor();
                        for j in parents {
                            node = node.with_parent(format!("n{j}"), share);
                        }
                    }
                    node
                })
                .collect()
        })
}
