//! Property-based registry behavior over generated lineage graphs.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use lineage_kernel::core::payload::PracticePayload;
use lineage_kernel::store::MemoryStore;
use lineage_kernel::{
    CanonicalEnvelope, Curator, EnvelopeBuilder, KbId, Payload, Registry, RegistryConfig,
};

fn practice(rationale: &str) -> Payload {
    Payload::Practice(PracticePayload {
        rationale: rationale.into(),
        contexts: vec![],
        failure_modes: vec![],
    })
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

/// Node `i` cites each earlier node `j` whose bit is set in `masks[i]`.
fn graph() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(any::<u64>(), 1..24)
}

fn parents_of(i: usize, mask: u64, ids: &[KbId]) -> Vec<KbId> {
    (0..i).filter(|j| mask & (1 << (j % 64)) != 0).map(|j| ids[j]).collect()
}

fn node_envelope(i: usize, parents: &[KbId]) -> CanonicalEnvelope {
    EnvelopeBuilder::new("graph", practice(&format!("node{i}")))
        .sources(parents.iter().map(KbId::to_string))
        .build()
}

proptest! {
    #[test]
    fn test_acyclic_lineage_always_registers(masks in graph()) {
        runtime().block_on(async {
            // A limit of one only bounds queries; registration must ignore it.
            let reg = Registry::new(
                MemoryStore::new(),
                RegistryConfig { max_lineage_depth: 1, ..RegistryConfig::default() },
            );
            let mut ids = Vec::with_capacity(masks.len());
            for (i, mask) in masks.iter().enumerate() {
                let parents = parents_of(i, *mask, &ids);
                let out = reg
                    .register(&node_envelope(i, &parents), &Curator::zero())
                    .await
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert!(out.is_new);
                let mut sorted = parents.clone();
                sorted.sort();
                prop_assert_eq!(reg.record(&out.id).await.unwrap().sources, sorted);
                ids.push(out.id);
            }
            prop_assert_eq!(reg.len().await.unwrap(), masks.len());
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn test_replaying_a_graph_is_idempotent(masks in graph()) {
        runtime().block_on(async {
            let reg = Registry::new(MemoryStore::new(), RegistryConfig::default());
            let mut ids = Vec::with_capacity(masks.len());
            for (i, mask) in masks.iter().enumerate() {
                let env = node_envelope(i, &parents_of(i, *mask, &ids));
                ids.push(reg.register(&env, &Curator::new("0xfirst")).await.unwrap().id);
            }
            for (i, mask) in masks.iter().enumerate() {
                let env = node_envelope(i, &parents_of(i, *mask, &ids));
                let again = reg.register(&env, &Curator::new("0xsecond")).await.unwrap();
                prop_assert!(!again.is_new);
                prop_assert_eq!(again.id, ids[i]);
                prop_assert_eq!(reg.curator(&ids[i]).await.unwrap(), Curator::new("0xfirst"));
            }
            prop_assert_eq!(reg.len().await.unwrap(), masks.len());
            Ok::<(), TestCaseError>(())
        })?;
    }
}
