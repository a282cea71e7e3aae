//! Value encoding.

use base64::prelude::*;

use super::error::CodecError;
use super::path::FieldPath;
use super::scalar::format_float;
use crate::types::{StructValue, Value};

/// Wraps a joined composite payload.
pub(crate) fn wrap(joined: &str) -> String {
    BASE64_STANDARD.encode(joined.as_bytes())
}

/// Encodes a value as an outermost composite.
///
/// Structures, arrays, sequences and maps encode as themselves; a bare scalar
/// becomes a one-slot composite. Pointers and opaque values are rejected
/// before any field is visited.
pub(crate) fn encode_top(value: &Value, path: &FieldPath<'_>) -> Result<String, CodecError> {
    match value {
        Value::String(_) | Value::Int(_) | Value::Float(_) | Value::Bool(_) => {
            Ok(wrap(&encode_slot(value, path)?))
        }
        Value::Struct(_) | Value::Array(_) | Value::Seq(_) | Value::Map(_) => {
            encode_slot(value, path)
        }
        Value::Pointer(_) | Value::Opaque(_) => {
            Err(CodecError::unsupported(path, value.kind_name()))
        }
    }
}

/// Encodes one slot: scalars in canonical text, composites as wrapped blobs.
pub(crate) fn encode_slot(value: &Value, path: &FieldPath<'_>) -> Result<String, CodecError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(format_float(*f)),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Struct(s) => encode_struct(s, path),
        Value::Array(items) => encode_items(items, path),
        Value::Seq(items) => encode_items(items.as_deref().unwrap_or(&[]), path),
        Value::Map(entries) => encode_map(entries.as_deref().unwrap_or(&[]), path),
        Value::Pointer(None) => Ok(String::new()),
        Value::Pointer(Some(pointee)) => encode_slot(pointee, path),
        Value::Opaque(_) => Err(CodecError::unsupported(path, value.kind_name())),
    }
}

fn encode_struct(value: &StructValue, path: &FieldPath<'_>) -> Result<String, CodecError> {
    let mut slots = Vec::with_capacity(value.fields.len());
    for (name, field) in &value.fields {
        slots.push(encode_slot(field, &path.field(name))?);
    }
    Ok(wrap(&slots.join(",")))
}

fn encode_items(items: &[Value], path: &FieldPath<'_>) -> Result<String, CodecError> {
    let mut slots = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        slots.push(encode_slot(item, &path.index(i))?);
    }
    Ok(wrap(&slots.join(",")))
}

fn encode_map(entries: &[(Value, Value)], path: &FieldPath<'_>) -> Result<String, CodecError> {
    let mut slots = Vec::with_capacity(entries.len());
    for (i, (key, value)) in entries.iter().enumerate() {
        let key_text = encode_slot(key, &path.index(i))?;
        let value_text = encode_slot(value, &path.key(&key_text))?;
        slots.push(format!("{}:{}", key_text, value_text));
    }
    Ok(wrap(&slots.join(",")))
}
