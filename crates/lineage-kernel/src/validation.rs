//! Stateless envelope checks, run before anything touches the store.
//!
//! Order matters: the first failing rule decides the error code.
//! 1. structure, 2. duplicate sources, 3. source order, 4. payload schema,
//! 5. derivation inputs covered by sources.

use std::collections::HashSet;

use lineage_kernel_core::{normalize_id, CanonicalEnvelope, Derivation, KbType, Payload};
use serde_json::{Map, Value};

use crate::error::{RegistryError, Result};
use crate::registry::RegistryConfig;

const ENVELOPE_MEMBERS: [&str; 5] = ["type", "domain", "sources", "payload", "derivation"];
const LEGACY_SOURCES_KEY: &str = "parents";

/// Run checks 1 to 5 on a typed envelope.
pub fn validate_envelope(envelope: &CanonicalEnvelope, config: &RegistryConfig) -> Result<()> {
    check_structure(&envelope.domain, envelope.sources.len(), config)?;
    check_sources_unique(&envelope.sources)?;
    check_sources_sorted(&envelope.sources)?;
    check_payload_kind(envelope.kind, &envelope.payload)?;
    if let Some(derivation) = &envelope.derivation {
        check_derivation_inputs(derivation, &envelope.sources)?;
    }
    Ok(())
}

fn check_structure(domain: &str, source_count: usize, config: &RegistryConfig) -> Result<()> {
    if domain.is_empty() {
        return Err(RegistryError::InvalidEnvelope(
            "envelope must have type, domain, sources".into(),
        ));
    }
    if source_count > config.max_sources {
        return Err(RegistryError::InvalidEnvelope(format!(
            "{source_count} sources exceeds the limit of {}",
            config.max_sources
        )));
    }
    Ok(())
}

fn check_sources_unique(sources: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(sources.len());
    for source in sources {
        if !seen.insert(normalize_id(source)) {
            return Err(RegistryError::InvalidEnvelope(
                "duplicate sources not allowed".into(),
            ));
        }
    }
    Ok(())
}

/// Unsorted input is rejected, never silently sorted.
fn check_sources_sorted(sources: &[String]) -> Result<()> {
    if sources.windows(2).all(|w| w[0] <= w[1]) {
        Ok(())
    } else {
        Err(RegistryError::SourcesNotSorted(
            "sources array must be lexicographically sorted before registration".into(),
        ))
    }
}

fn check_payload_kind(kind: KbType, payload: &Payload) -> Result<()> {
    if payload.kind() != kind {
        return Err(RegistryError::SchemaInvalid(format!(
            "payload.type {:?} does not match envelope type {:?}",
            payload.kind().as_str(),
            kind.as_str()
        )));
    }
    Ok(())
}

fn check_derivation_inputs(derivation: &Derivation, sources: &[String]) -> Result<()> {
    let declared: HashSet<String> = sources.iter().map(|s| normalize_id(s)).collect();
    for input in &derivation.inputs {
        let kb_id = normalize_id(&input.kb_id);
        if !declared.contains(&kb_id) {
            return Err(RegistryError::InvalidEnvelope(format!(
                "derivation input {kb_id} is not in sources; all inputs must reference sources"
            )));
        }
    }
    Ok(())
}

/// Decode an untyped envelope document, applying checks 1 to 5 in order.
///
/// A legacy `parents` member stands in for a missing `sources`. An explicit
/// `"derivation": null` is treated as absent.
pub fn decode_document(document: &Value, config: &RegistryConfig) -> Result<CanonicalEnvelope> {
    let Value::Object(map) = document else {
        return Err(RegistryError::InvalidEnvelope("envelope must be an object".into()));
    };

    // 1. Structure
    let kind = non_empty_str(map, "type");
    let domain = non_empty_str(map, "domain");
    let sources = map
        .get("sources")
        .or_else(|| map.get(LEGACY_SOURCES_KEY))
        .and_then(Value::as_array);
    let (Some(kind), Some(domain), Some(sources)) = (kind, domain, sources) else {
        return Err(RegistryError::InvalidEnvelope(
            "envelope must have type, domain, sources".into(),
        ));
    };
    let payload = match map.get("payload") {
        Some(p) if !p.is_null() => p,
        _ => {
            return Err(RegistryError::InvalidEnvelope(
                "envelope must have payload".into(),
            ))
        }
    };
    if let Some(unknown) = map
        .keys()
        .find(|k| !ENVELOPE_MEMBERS.contains(&k.as_str()) && k.as_str() != LEGACY_SOURCES_KEY)
    {
        return Err(RegistryError::InvalidEnvelope(format!(
            "unexpected envelope member {unknown:?}"
        )));
    }
    let sources: Vec<String> = sources
        .iter()
        .map(|s| s.as_str().map(str::to_string))
        .collect::<Option<_>>()
        .ok_or_else(|| RegistryError::InvalidEnvelope("sources must be strings".into()))?;
    check_structure(domain, sources.len(), config)?;

    // 2, 3
    check_sources_unique(&sources)?;
    check_sources_sorted(&sources)?;

    // 4. Schema
    let kind: KbType = kind
        .parse()
        .map_err(|_| RegistryError::SchemaInvalid(format!("unknown type: {kind}")))?;
    let payload_kind = payload.get("type").and_then(Value::as_str).unwrap_or_default();
    if payload_kind != kind.as_str() {
        return Err(RegistryError::SchemaInvalid(format!(
            "payload.type {payload_kind:?} does not match envelope type {:?}",
            kind.as_str()
        )));
    }
    let payload: Payload = serde_json::from_value(payload.clone()).map_err(|e| {
        RegistryError::SchemaInvalid(format!("{} payload: {e}", kind.as_str()))
    })?;

    // 5. Derivation
    let derivation = match map.get("derivation") {
        None | Some(Value::Null) => None,
        Some(raw) => {
            let derivation: Derivation = serde_json::from_value(raw.clone())
                .map_err(|e| RegistryError::InvalidEnvelope(format!("derivation: {e}")))?;
            check_derivation_inputs(&derivation, &sources)?;
            Some(derivation)
        }
    };

    Ok(CanonicalEnvelope {
        kind,
        domain: domain.to_string(),
        sources,
        payload,
        derivation,
    })
}

fn non_empty_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    fn id(c: char) -> String {
        format!("0x{}", c.to_string().repeat(64))
    }

    fn practice_doc() -> Value {
        json!({
            "type": "practice",
            "domain": "demo",
            "sources": [],
            "payload": {"type": "practice", "rationale": "r", "contexts": [], "failureModes": []}
        })
    }

    fn code(doc: &Value) -> Option<ErrorCode> {
        decode_document(doc, &RegistryConfig::default())
            .err()
            .and_then(|e| e.code())
    }

    #[test]
    fn test_valid_document_decodes() {
        let env = decode_document(&practice_doc(), &RegistryConfig::default()).unwrap();
        assert_eq!(env.kind, KbType::Practice);
        assert!(validate_envelope(&env, &RegistryConfig::default()).is_ok());
    }

    #[test]
    fn test_missing_members() {
        for key in ["type", "domain", "sources", "payload"] {
            let mut doc = practice_doc();
            doc.as_object_mut().unwrap().remove(key);
            assert_eq!(code(&doc), Some(ErrorCode::InvalidEnvelope), "missing {key}");
        }
        assert_eq!(code(&json!("nope")), Some(ErrorCode::InvalidEnvelope));
        let mut doc = practice_doc();
        doc["domain"] = json!("");
        assert_eq!(code(&doc), Some(ErrorCode::InvalidEnvelope));
    }

    #[test]
    fn test_legacy_parents_accepted() {
        let mut doc = practice_doc();
        let obj = doc.as_object_mut().unwrap();
        obj.remove("sources");
        obj.insert("parents".into(), json!([id('a')]));
        let env = decode_document(&doc, &RegistryConfig::default()).unwrap();
        assert_eq!(env.sources, vec![id('a')]);
    }

    #[test]
    fn test_duplicate_checked_before_order() {
        // Duplicate after normalization, and out of order.
        let mut doc = practice_doc();
        doc["sources"] = json!([id('b'), "a".repeat(64), id('a')]);
        assert_eq!(code(&doc), Some(ErrorCode::InvalidEnvelope));
    }

    #[test]
    fn test_unsorted_rejected() {
        let mut doc = practice_doc();
        doc["sources"] = json!([id('b'), id('a')]);
        assert_eq!(code(&doc), Some(ErrorCode::SourcesNotSorted));
    }

    #[test]
    fn test_order_checked_before_schema() {
        let mut doc = practice_doc();
        doc["sources"] = json!([id('b'), id('a')]);
        doc["payload"] = json!({"type": "practice"});
        assert_eq!(code(&doc), Some(ErrorCode::SourcesNotSorted));
    }

    #[test]
    fn test_schema_failures() {
        let mut doc = practice_doc();
        doc["payload"]["type"] = json!("feature");
        assert_eq!(code(&doc), Some(ErrorCode::SchemaInvalid));

        let mut doc = practice_doc();
        doc["payload"].as_object_mut().unwrap().remove("failureModes");
        assert_eq!(code(&doc), Some(ErrorCode::SchemaInvalid));

        let mut doc = practice_doc();
        doc["type"] = json!("essay");
        doc["payload"]["type"] = json!("essay");
        assert_eq!(code(&doc), Some(ErrorCode::SchemaInvalid));
    }

    #[test]
    fn test_schema_checked_before_derivation() {
        let mut doc = practice_doc();
        doc["payload"]["type"] = json!("feature");
        doc["derivation"] = json!({"type": "compose", "inputs": [{"kbId": id('c'), "selectors": []}], "recipe": {}});
        assert_eq!(code(&doc), Some(ErrorCode::SchemaInvalid));
    }

    #[test]
    fn test_derivation_inputs_must_be_sources() {
        let mut doc = practice_doc();
        doc["sources"] = json!([id('a')]);
        doc["derivation"] = json!({"type": "compose", "inputs": [{"kbId": id('c'), "selectors": []}], "recipe": {}});
        assert_eq!(code(&doc), Some(ErrorCode::InvalidEnvelope));

        // Unprefixed input ids normalize before the membership check.
        doc["derivation"]["inputs"][0]["kbId"] = json!("a".repeat(64));
        assert!(decode_document(&doc, &RegistryConfig::default()).is_ok());
    }

    #[test]
    fn test_malformed_derivation() {
        let mut doc = practice_doc();
        doc["derivation"] = json!({"type": "compose", "recipe": {}});
        assert_eq!(code(&doc), Some(ErrorCode::InvalidEnvelope));

        let mut doc = practice_doc();
        doc["derivation"] = Value::Null;
        assert!(decode_document(&doc, &RegistryConfig::default())
            .unwrap()
            .derivation
            .is_none());
    }

    #[test]
    fn test_unknown_member_rejected() {
        let mut doc = practice_doc();
        doc["timestamp"] = json!(1700000000);
        assert_eq!(code(&doc), Some(ErrorCode::InvalidEnvelope));
    }

    #[test]
    fn test_too_many_sources() {
        let config = RegistryConfig {
            max_sources: 1,
            ..RegistryConfig::default()
        };
        let mut doc = practice_doc();
        doc["sources"] = json!([id('a'), id('b')]);
        let err = decode_document(&doc, &config).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidEnvelope));
    }
}
