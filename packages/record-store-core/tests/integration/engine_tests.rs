//! Engine selection from configuration and JSON import.

use std::io::Write;

use pretty_assertions::assert_eq;
use serde_json::json;

use record_store_core::codec::CodecErrorKind;
use record_store_core::engine::IN_MEMORY;
use record_store_core::{json as record_json, DbConfig, EmptyCollapse, EngineRegistry};
use record_store_core::{DbError, FieldKind, OpaqueKind, TypeDescriptor};

fn inventory() -> TypeDescriptor {
    TypeDescriptor::new("Inventory")
        .field("sku", FieldKind::String)
        .field("counts", FieldKind::seq(FieldKind::Int))
        .field("bins", FieldKind::map(FieldKind::String, FieldKind::Int))
}

#[test]
fn test_config_file_selects_engine_and_collapse() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "engine = \"{}\"", IN_MEMORY)?;
    writeln!(file, "empty_collapse = \"empty-only\"")?;
    let config = DbConfig::from_file(file.path())?;
    assert_eq!(config.empty_collapse, EmptyCollapse::EmptyOnly);

    let registry = EngineRegistry::with_config(&config);
    let engine = registry.open(&config)?;
    engine.create_table(inventory(), "sku")?;

    let doc = json!({"sku": "bolt", "counts": [0, 4], "bins": {"a1": 0}});
    let record = record_json::record_from_json(&doc, &inventory())?;
    engine.insert(record.clone())?;

    let stored = engine.get("Inventory", "bolt")?;
    assert_eq!(stored, record);
    assert_eq!(record_json::from_value(&stored), doc);
    Ok(())
}

#[test]
fn test_reference_collapse_through_engine() -> anyhow::Result<()> {
    let registry = EngineRegistry::with_defaults();
    let engine = registry.open(&DbConfig::default())?;
    engine.create_table(inventory(), "sku")?;

    let doc = json!({"sku": "nut", "counts": [0, 4], "bins": {"a1": 0}});
    engine.insert(record_json::record_from_json(&doc, &inventory())?)?;

    let stored = engine.get("Inventory", "nut")?;
    assert_eq!(
        record_json::from_value(&stored),
        json!({"sku": "nut", "counts": null, "bins": null})
    );
    Ok(())
}

#[test]
fn test_unencodable_json_record() {
    let desc = TypeDescriptor::new("Hook").field(
        "callback",
        FieldKind::Opaque(OpaqueKind::Function),
    );
    let registry = EngineRegistry::with_defaults();
    let engine = registry.get(IN_MEMORY).unwrap();
    engine.create_table(desc.clone(), "callback").unwrap();

    let record = record_json::record_from_json(&json!({}), &desc).unwrap();
    let err = engine.insert(record).unwrap_err();
    assert_eq!(err.codec_kind(), Some(CodecErrorKind::UnsupportedType));
    assert!(matches!(
        engine.get("Hook", ""),
        Err(DbError::RecordNotFound { .. })
    ));
    assert_eq!(
        engine.get("Nope", "x"),
        Err(DbError::InvalidTableName("Nope".to_string()))
    );
}
