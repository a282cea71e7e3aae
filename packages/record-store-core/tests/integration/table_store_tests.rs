//! Table store operations through typed records.

use ntest::timeout;
use pretty_assertions::assert_eq;

use record_store_core::{
    CodecErrorKind, Database, DbError, FieldKind, OpaqueKind, Record, StructValue,
    TypeDescriptor, Value,
};

use super::helpers::{company, employee, person, Company, Employee, Person};

#[timeout(1000)]
#[test]
fn test_create_insert_get() {
    let db = Database::new();
    db.create_table::<Person>("id").unwrap();
    db.insert(&person("1", "John")).unwrap();

    assert_eq!(db.get::<Person>("1").unwrap(), person("1", "John"));
}

#[timeout(1000)]
#[test]
fn test_table_errors() {
    let db = Database::new();
    db.create_table::<Person>("id").unwrap();

    assert_eq!(
        db.create_table::<Person>("id"),
        Err(DbError::TableExists("Person".to_string()))
    );
    assert_eq!(
        db.create_table::<Employee>("employee_id"),
        Err(DbError::InvalidPrimaryKey {
            table: "Employee".to_string(),
            field: "employee_id".to_string(),
        })
    );
    assert_eq!(
        db.insert(&employee("Ann", 30, None)),
        Err(DbError::InvalidTableName("Employee".to_string()))
    );

    db.insert(&person("1", "John")).unwrap();
    assert_eq!(
        db.insert(&person("1", "Johnny")),
        Err(DbError::DuplicateRecord {
            table: "Person".to_string(),
            key: "1".to_string(),
        })
    );
    assert_eq!(
        db.get::<Person>("2"),
        Err(DbError::RecordNotFound {
            table: "Person".to_string(),
            key: "2".to_string(),
        })
    );
    assert_eq!(db.get::<Person>("1").unwrap().name, "John");
}

#[timeout(1000)]
#[test]
fn test_nested_company_round_trip() {
    let db = Database::new();
    db.create_table::<Company>("name").unwrap();
    db.insert(&company()).unwrap();

    assert_eq!(db.get::<Company>("Acme Corp").unwrap(), company());
}

#[timeout(1000)]
#[test]
fn test_integer_primary_key() {
    let db = Database::new();
    db.create_table::<Employee>("age").unwrap();
    db.insert(&employee("Ann", 30, None)).unwrap();
    db.insert(&employee("Bob", 31, Some("Ann"))).unwrap();

    assert_eq!(db.table("Employee").unwrap().record_count(), 2);
    assert_eq!(db.get::<Employee>("31").unwrap().manager.as_deref(), Some("Ann"));
}

#[timeout(1000)]
#[test]
fn test_empty_sequence_reads_back_empty() {
    let db = Database::new();
    db.create_table::<Employee>("name").unwrap();
    let mut ann = employee("Ann", 30, None);
    ann.skills.clear();
    db.insert(&ann).unwrap();

    assert_eq!(db.get::<Employee>("Ann").unwrap(), ann);
    let raw = db.get_value("Employee", "Ann").unwrap();
    assert_eq!(
        raw.as_struct().and_then(|s| s.get("skills")),
        Some(&Value::Seq(None))
    );
}

#[timeout(1000)]
#[test]
fn test_dynamic_records_with_unsupported_fields() {
    let db = Database::new();
    let desc = TypeDescriptor::new("Task")
        .field("id", FieldKind::Int)
        .field("done", FieldKind::Opaque(OpaqueKind::Channel));
    db.create_table_from(desc, "id").unwrap();

    let task = Value::Struct(
        StructValue::new("Task")
            .with("id", Value::Int(1))
            .with("done", Value::Opaque(OpaqueKind::Channel)),
    );
    let err = db.insert_value(task).unwrap_err();
    assert_eq!(err.codec_kind(), Some(CodecErrorKind::UnsupportedType));
    assert_eq!(db.table("Task").unwrap().record_count(), 0);
}

#[timeout(1000)]
#[test]
fn test_descriptor_names_table() {
    let db = Database::new();
    db.create_table_from(Person::descriptor(), "name").unwrap();
    db.insert(&person("1", "John")).unwrap();

    let table = db.table("Person").unwrap();
    assert_eq!(table.primary_key(), "name");
    assert_eq!(table.descriptor(), &Person::descriptor());
    assert_eq!(db.get::<Person>("John").unwrap().id, "1");
}
