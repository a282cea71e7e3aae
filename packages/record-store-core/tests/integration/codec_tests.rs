//! Codec properties over generated inputs.

use proptest::prelude::*;

use record_store_core::codec::{self, Codec};
use record_store_core::{FieldKind, StructValue, TypeDescriptor, Value};

fn scalar_record() -> TypeDescriptor {
    TypeDescriptor::new("Scalars")
        .field("s", FieldKind::String)
        .field("i", FieldKind::Int)
        .field("f", FieldKind::Float)
        .field("b", FieldKind::Bool)
}

fn float_bits(value: &Value, field: &str) -> Option<u64> {
    match value.as_struct().and_then(|s| s.get(field)) {
        Some(Value::Float(f)) => Some(f.to_bits()),
        _ => None,
    }
}

proptest! {
    #[test]
    fn scalar_fields_round_trip(
        s in "[^,:]*",
        i in any::<i64>(),
        f in any::<f64>().prop_filter("NaN never compares equal", |f| !f.is_nan()),
        b in any::<bool>(),
    ) {
        let value = Value::Struct(
            StructValue::new("Scalars")
                .with("s", Value::String(s.clone()))
                .with("i", Value::Int(i))
                .with("f", Value::Float(f))
                .with("b", Value::Bool(b)),
        );
        let decoded = codec::decode(&codec::encode(&value).unwrap(), &scalar_record()).unwrap();

        prop_assert_eq!(float_bits(&decoded, "f"), Some(f.to_bits()));
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn top_level_strings_keep_separators(s in ".*") {
        let codec = Codec::new();
        let encoded = codec.encode(&Value::String(s.clone())).unwrap();
        prop_assert_eq!(
            codec.decode_kind(&encoded, &FieldKind::String).unwrap(),
            Value::String(s)
        );
    }

    #[test]
    fn int_sequences_round_trip(items in prop::collection::vec(1i64..i64::MAX, 1..16)) {
        let kind = FieldKind::seq(FieldKind::Int);
        let value = Value::seq(items.into_iter().map(Value::Int).collect());
        let encoded = codec::encode(&value).unwrap();
        prop_assert_eq!(Codec::new().decode_kind(&encoded, &kind).unwrap(), value);
    }

    #[test]
    fn arbitrary_text_never_panics(text in ".*") {
        let _ = codec::decode(&text, &scalar_record());
    }
}

#[test]
fn test_separator_in_string_field_shifts_slots() {
    let desc = TypeDescriptor::new("Pair")
        .field("a", FieldKind::String)
        .field("b", FieldKind::String);
    let value = Value::Struct(
        StructValue::new("Pair")
            .with("a", Value::from("x,y"))
            .with("b", Value::from("z")),
    );
    let decoded = codec::decode(&codec::encode(&value).unwrap(), &desc).unwrap();
    assert_eq!(decoded.as_struct().and_then(|s| s.get("b")), Some(&Value::from("y")));
}
