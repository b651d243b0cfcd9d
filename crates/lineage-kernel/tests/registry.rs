//! End-to-end registry behavior through the public API.

use std::sync::Arc;

use lineage_kernel::core::payload::{PracticePayload, SynthesisPayload};
use lineage_kernel::core::{
    content_hash, AttributionShare, DerivationInput, DerivationType, EnvelopeBuilder,
};
use lineage_kernel::store::MemoryStore;
use lineage_kernel::{
    CanonicalEnvelope, Curator, ErrorCode, KbId, KbType, Payload, Registry, RegistryConfig,
};
use serde_json::{json, Map};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn registry() -> Registry<MemoryStore> {
    init_tracing();
    Registry::new(MemoryStore::new(), RegistryConfig::default())
}

fn practice(rationale: &str) -> Payload {
    Payload::Practice(PracticePayload {
        rationale: rationale.into(),
        contexts: vec![],
        failure_modes: vec![],
    })
}

fn root(rationale: &str) -> CanonicalEnvelope {
    CanonicalEnvelope::root("demo", practice(rationale))
}

fn is_kb_id_text(s: &str) -> bool {
    s.len() == 66
        && s.starts_with("0x")
        && s[2..].bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[tokio::test]
async fn test_register_then_derive() -> anyhow::Result<()> {
    let reg = registry();
    let curator = Curator::new("0xalice");

    let first = reg.register(&root("r"), &curator).await?;
    assert!(first.is_new);
    assert!(is_kb_id_text(&first.id.to_string()));

    let synthesis = Payload::Synthesis(SynthesisPayload {
        question: "q".into(),
        answer: "a".into(),
        citations: [(first.id.to_string(), json!("primary"))].into_iter().collect(),
    });
    let derived = EnvelopeBuilder::new("demo", synthesis)
        .source(first.id.to_string())
        .derivation(
            DerivationType::Compose,
            vec![DerivationInput::new(first.id.to_string(), vec!["/rationale".into()])],
            Map::new(),
        )
        .build();
    let second = reg.register(&derived, &curator).await?;

    assert!(second.is_new);
    assert_ne!(second.id, first.id);
    assert!(reg.derived_records(&first.id).await?.contains(&second.id));
    assert_eq!(
        reg.attribution_dag(&second.id).await?,
        vec![AttributionShare {
            parent_id: first.id,
            share_basis_points: 10_000,
        }]
    );

    let record = reg.record(&second.id).await?;
    assert!(record.exists);
    assert_eq!(record.kind, KbType::Synthesis);
    assert_eq!(record.sources, vec![first.id]);
    Ok(())
}

#[tokio::test]
async fn test_unsorted_sources_rejected() -> anyhow::Result<()> {
    let reg = registry();
    let c = Curator::zero();
    let a = reg.register(&root("a"), &c).await?.id;
    let b = reg.register(&root("b"), &c).await?.id;
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };

    let mut unsorted = EnvelopeBuilder::new("demo", practice("child"))
        .sources([lo.to_string(), hi.to_string()])
        .build();
    unsorted.sources.reverse();
    let err = reg.register(&unsorted, &c).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::SourcesNotSorted));

    let mut sorted = unsorted.clone();
    sorted.sources.sort();
    let out = reg.register(&sorted, &c).await?;
    assert!(out.is_new);
    // Same id as the canonical form of the unsorted input.
    assert_eq!(out.id, content_hash(&unsorted)?);
    Ok(())
}

#[tokio::test]
async fn test_idempotent_across_curators() -> anyhow::Result<()> {
    let reg = registry();
    let x = reg.register(&root("r"), &Curator::new("0xaaa")).await?;
    let y = reg.register(&root("r"), &Curator::new("0xbbb")).await?;
    assert_eq!(x.id, y.id);
    assert!(x.is_new);
    assert!(!y.is_new);
    assert_eq!(reg.len().await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_never_registered_source() {
    let reg = registry();
    let env = EnvelopeBuilder::new("demo", practice("orphan"))
        .source(KbId::from_bytes([0x11; 32]).to_string())
        .build();
    let err = reg.register(&env, &Curator::zero()).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::CycleDetected));
    assert!(reg.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_derivation_input_outside_sources() -> anyhow::Result<()> {
    let reg = registry();
    let a = reg.register(&root("a"), &Curator::zero()).await?.id;
    let env = EnvelopeBuilder::new("demo", practice("d"))
        .source(a.to_string())
        .derivation(
            DerivationType::Extract,
            vec![DerivationInput::new(
                KbId::from_bytes([0xee; 32]).to_string(),
                vec![],
            )],
            Map::new(),
        )
        .build();
    let err = reg.register(&env, &Curator::zero()).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidEnvelope));
    Ok(())
}

#[tokio::test]
async fn test_kind_mismatch_rejected() {
    let reg = registry();
    let mut env = root("r");
    env.kind = KbType::Feature;
    let err = reg.register(&env, &Curator::zero()).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::SchemaInvalid));
}

#[tokio::test]
async fn test_empty_domain_rejected() {
    let reg = registry();
    let env = CanonicalEnvelope::root("", practice("r"));
    let err = reg.register(&env, &Curator::zero()).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidEnvelope));
}

#[tokio::test]
async fn test_document_and_typed_paths_agree() -> anyhow::Result<()> {
    let reg = registry();
    let doc = json!({
        "payload": {"failureModes": [], "contexts": [], "rationale": "r", "type": "practice"},
        "sources": [],
        "domain": "demo",
        "type": "practice"
    });
    let from_doc = reg.register_document(&doc, &Curator::zero()).await?;
    let from_typed = reg.register(&root("r"), &Curator::zero()).await?;
    assert_eq!(from_doc.id, from_typed.id);
    assert!(!from_typed.is_new);
    Ok(())
}

#[tokio::test]
async fn test_document_legacy_parents() -> anyhow::Result<()> {
    let reg = registry();
    let a = reg.register(&root("a"), &Curator::zero()).await?.id;
    let with_parents = json!({
        "type": "practice",
        "domain": "demo",
        "parents": [a.to_string()],
        "payload": {"type": "practice", "rationale": "c", "contexts": [], "failureModes": []}
    });
    let with_sources = json!({
        "type": "practice",
        "domain": "demo",
        "sources": [a.to_string()],
        "payload": {"type": "practice", "rationale": "c", "contexts": [], "failureModes": []}
    });
    let x = reg.register_document(&with_parents, &Curator::zero()).await?;
    let y = reg.register_document(&with_sources, &Curator::zero()).await?;
    assert_eq!(x.id, y.id);
    assert!(x.is_new);
    assert!(!y.is_new);
    Ok(())
}

#[tokio::test]
async fn test_document_schema_rejections() {
    let reg = registry();
    let extra = json!({
        "type": "practice",
        "domain": "demo",
        "sources": [],
        "payload": {"type": "practice", "rationale": "r", "contexts": [], "failureModes": [], "x": 1}
    });
    let err = reg.register_document(&extra, &Curator::zero()).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::SchemaInvalid));

    let missing = json!({"type": "practice", "domain": "demo", "sources": []});
    let err = reg.register_document(&missing, &Curator::zero()).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidEnvelope));
}

#[tokio::test]
async fn test_registries_are_isolated() -> anyhow::Result<()> {
    let one = registry();
    let two = registry();
    let id = one.register(&root("r"), &Curator::zero()).await?.id;
    assert!(one.is_registered(&id).await?);
    assert!(!two.is_registered(&id).await?);
    Ok(())
}

#[tokio::test]
async fn test_shared_store_is_visible_to_every_registry() -> anyhow::Result<()> {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let writer = Registry::with_shared_store(Arc::clone(&store), RegistryConfig::default());
    let reader = Registry::with_shared_store(Arc::clone(&store), RegistryConfig::default());

    let a = writer.register(&root("a"), &Curator::new("0xalice")).await?.id;
    assert!(reader.is_registered(&a).await?);
    assert_eq!(reader.curator(&a).await?, Curator::new("0xalice"));

    // A child built on the reader lands in the same store.
    let child = EnvelopeBuilder::new("demo", practice("c"))
        .source(a.to_string())
        .build();
    let c = reader.register(&child, &Curator::zero()).await?;
    assert!(c.is_new);
    assert!(!writer.register(&child, &Curator::zero()).await?.is_new);
    assert_eq!(writer.derived_records(&a).await?, vec![c.id]);
    assert_eq!(writer.len().await?, 2);
    Ok(())
}

#[tokio::test]
async fn test_lineage_and_settlement() -> anyhow::Result<()> {
    let reg = registry();
    let alice = Curator::new("0xalice");
    let bob = Curator::new("0xbob");
    let carol = Curator::new("0xcarol");

    let song = reg.register(&root("song"), &alice).await?.id;
    let sample = reg
        .register(
            &EnvelopeBuilder::new("demo", practice("sample"))
                .source(song.to_string())
                .build(),
            &bob,
        )
        .await?
        .id;
    let remix = reg
        .register(
            &EnvelopeBuilder::new("demo", practice("remix"))
                .source(sample.to_string())
                .build(),
            &carol,
        )
        .await?
        .id;

    assert_eq!(reg.lineage(&remix).await?, vec![sample, song]);

    let payout = reg.distribution(&remix, 50.0, 1000.0).await?;
    assert_eq!(payout["0xcarol"], 500.0);
    assert_eq!(payout["0xbob"], 250.0);
    assert_eq!(payout["0xalice"], 125.0);
    Ok(())
}

#[tokio::test]
async fn test_reset_clears_everything() -> anyhow::Result<()> {
    let reg = registry();
    let a = reg.register(&root("a"), &Curator::zero()).await?.id;
    reg.reset().await?;
    assert!(reg.is_empty().await?);
    assert!(!reg.record(&a).await?.exists);
    Ok(())
}
