//! Conversion between JSON documents and record values.
//!
//! Structures are JSON objects keyed by field name; a missing key takes the
//! zero value of its kind. Arrays and sequences are JSON arrays. Maps with
//! string keys are objects, other maps are arrays of `[key, value]` pairs.
//! Absent pointers, sequences and maps are `null`. Non-finite floats are
//! written as their canonical text (`NaN`, `+Inf`, `-Inf`).

use serde_json::{Map as JsonMap, Number, Value as Json};

use crate::codec::scalar::{format_float, parse_bool, parse_float, parse_int};
use crate::error::{DbError, Result};
use crate::types::{FieldKind, StructValue, TypeDescriptor, Value};

fn json_type(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn unexpected(path: &str, kind: &FieldKind, json: &Json) -> DbError {
    DbError::Json(format!(
        "{}: expected {}, found {}",
        path,
        kind.name(),
        json_type(json)
    ))
}

/// Converts a JSON document into a value of the given kind.
///
/// `path` names the document in error messages.
pub fn to_value(json: &Json, kind: &FieldKind, path: &str) -> Result<Value> {
    match (kind, json) {
        (FieldKind::String, Json::String(s)) => Ok(Value::String(s.clone())),
        (FieldKind::Int, Json::Number(n)) => n
            .as_i64()
            .map(Value::Int)
            .ok_or_else(|| DbError::Json(format!("{}: {} is not a 64-bit integer", path, n))),
        (FieldKind::Float, Json::Number(n)) => n
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| DbError::Json(format!("{}: {} is not a float", path, n))),
        (FieldKind::Float, Json::String(s)) => parse_float(s)
            .map(Value::Float)
            .ok_or_else(|| unexpected(path, kind, json)),
        (FieldKind::Bool, Json::Bool(b)) => Ok(Value::Bool(*b)),

        (FieldKind::Array { element, len }, Json::Array(items)) => {
            if items.len() != *len {
                return Err(DbError::Json(format!(
                    "{}: expected {} array elements, found {}",
                    path,
                    len,
                    items.len()
                )));
            }
            let values = elements(items, element, path)?;
            Ok(Value::Array(values))
        }

        (FieldKind::Seq(_), Json::Null) => Ok(Value::Seq(None)),
        (FieldKind::Seq(element), Json::Array(items)) => {
            Ok(Value::Seq(Some(elements(items, element, path)?)))
        }

        (FieldKind::Map { .. }, Json::Null) => Ok(Value::Map(None)),
        (FieldKind::Map { key, value }, Json::Object(object)) => {
            let mut entries = Vec::with_capacity(object.len());
            for (key_text, item) in object {
                let item_path = format!("{}[{:?}]", path, key_text);
                let k = key_from_text(key_text, key, &item_path)?;
                entries.push((k, to_value(item, value, &item_path)?));
            }
            Ok(Value::Map(Some(entries)))
        }
        (FieldKind::Map { key, value }, Json::Array(pairs)) => {
            let mut entries = Vec::with_capacity(pairs.len());
            for (i, pair) in pairs.iter().enumerate() {
                let item_path = format!("{}[{}]", path, i);
                match pair.as_array().map(Vec::as_slice) {
                    Some([k, v]) => entries.push((
                        to_value(k, key, &item_path)?,
                        to_value(v, value, &item_path)?,
                    )),
                    _ => {
                        return Err(DbError::Json(format!(
                            "{}: map entries must be [key, value] pairs",
                            item_path
                        )))
                    }
                }
            }
            Ok(Value::Map(Some(entries)))
        }

        (FieldKind::Struct(desc), Json::Object(object)) => record_from_object(object, desc, path),

        (FieldKind::Pointer(_), Json::Null) => Ok(Value::Pointer(None)),
        (FieldKind::Pointer(pointee), other) => Ok(Value::some(to_value(other, pointee, path)?)),

        (FieldKind::Opaque(opaque), Json::Null) => Ok(Value::Opaque(*opaque)),

        (kind, other) => Err(unexpected(path, kind, other)),
    }
}

/// Converts a JSON object into a record of the given type.
pub fn record_from_json(json: &Json, desc: &TypeDescriptor) -> Result<Value> {
    match json {
        Json::Object(object) => record_from_object(object, desc, &desc.name),
        other => Err(DbError::Json(format!(
            "{}: expected object, found {}",
            desc.name,
            json_type(other)
        ))),
    }
}

fn record_from_object(
    object: &JsonMap<String, Json>,
    desc: &TypeDescriptor,
    path: &str,
) -> Result<Value> {
    if let Some(unknown) = object.keys().find(|k| !desc.has_field(k)) {
        return Err(DbError::Json(format!(
            "{}: unknown field '{}' for {}",
            path, unknown, desc.name
        )));
    }

    let mut record = StructValue::new(desc.name.clone());
    for field in &desc.fields {
        let value = match object.get(&field.name) {
            Some(json) => to_value(json, &field.kind, &format!("{}.{}", path, field.name))?,
            None => Value::zero(&field.kind),
        };
        record.fields.push((field.name.clone(), value));
    }
    Ok(Value::Struct(record))
}

fn elements(items: &[Json], element: &FieldKind, path: &str) -> Result<Vec<Value>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| to_value(item, element, &format!("{}[{}]", path, i)))
        .collect()
}

/// Parses an object key for a map whose key kind is a scalar.
fn key_from_text(text: &str, kind: &FieldKind, path: &str) -> Result<Value> {
    let parsed = match kind {
        FieldKind::String => Some(Value::String(text.to_string())),
        FieldKind::Int => parse_int(text).map(Value::Int),
        FieldKind::Float => parse_float(text).map(Value::Float),
        FieldKind::Bool => parse_bool(text).map(Value::Bool),
        _ => None,
    };
    parsed.ok_or_else(|| {
        DbError::Json(format!(
            "{}: object key {:?} is not a valid {} key",
            path,
            text,
            kind.name()
        ))
    })
}

/// Converts a value into a JSON document.
pub fn from_value(value: &Value) -> Json {
    match value {
        Value::String(s) => Json::String(s.clone()),
        Value::Int(i) => Json::Number((*i).into()),
        Value::Float(f) => Number::from_f64(*f)
            .map(Json::Number)
            .unwrap_or_else(|| Json::String(format_float(*f))),
        Value::Bool(b) => Json::Bool(*b),
        Value::Array(items) | Value::Seq(Some(items)) => {
            Json::Array(items.iter().map(from_value).collect())
        }
        Value::Map(Some(entries)) => {
            if entries.iter().all(|(k, _)| matches!(k, Value::String(_))) {
                let mut object = JsonMap::new();
                for (k, v) in entries {
                    if let Value::String(key) = k {
                        object.insert(key.clone(), from_value(v));
                    }
                }
                Json::Object(object)
            } else {
                Json::Array(
                    entries
                        .iter()
                        .map(|(k, v)| Json::Array(vec![from_value(k), from_value(v)]))
                        .collect(),
                )
            }
        }
        Value::Struct(record) => Json::Object(
            record
                .fields
                .iter()
                .map(|(name, v)| (name.clone(), from_value(v)))
                .collect(),
        ),
        Value::Pointer(Some(inner)) => from_value(inner),
        Value::Seq(None) | Value::Map(None) | Value::Pointer(None) | Value::Opaque(_) => Json::Null,
    }
}
