//! Descriptor-directed decoding.
//!
//! The encoded text carries no type information; every slot is interpreted
//! according to the target `FieldKind`.

use base64::prelude::*;

use super::error::{CodecError, CodecErrorKind};
use super::path::FieldPath;
use super::scalar::{parse_bool, parse_float, parse_int};
use super::EmptyCollapse;
use crate::types::{FieldKind, StructValue, TypeDescriptor, Value};

/// Failure inside a composite payload, before it is attributed to the
/// composite itself.
enum Nested {
    /// A slot failed; the composite wraps the slot's error
    Slot(CodecError),
    /// The payload has the wrong shape for the composite
    Shape(String),
}

impl From<CodecError> for Nested {
    fn from(err: CodecError) -> Self {
        Nested::Slot(err)
    }
}

/// Error kind reported for a failed composite or pointer of this kind.
fn nested_kind(kind: &FieldKind) -> CodecErrorKind {
    match kind {
        FieldKind::Array { .. } => CodecErrorKind::BadArray,
        FieldKind::Seq(_) => CodecErrorKind::BadSlice,
        FieldKind::Map { .. } => CodecErrorKind::BadMap,
        FieldKind::Struct(_) => CodecErrorKind::BadStruct,
        FieldKind::Pointer(_) => CodecErrorKind::BadPointer,
        // Scalars and opaque kinds never nest.
        _ => CodecErrorKind::UnsupportedType,
    }
}

/// Attributes a payload failure to an outermost value without wrapping.
fn top_level(kind: CodecErrorKind, path: &FieldPath<'_>, nested: Nested) -> CodecError {
    match nested {
        Nested::Slot(err) => err,
        Nested::Shape(detail) => CodecError::new(kind, path, detail),
    }
}

/// Reverses the base64 wrap of a composite.
pub(crate) fn unwrap(text: &str, path: &FieldPath<'_>) -> Result<String, CodecError> {
    let bytes = BASE64_STANDARD
        .decode(text.as_bytes())
        .map_err(|e| CodecError::new(CodecErrorKind::BadEncoding, path, e.to_string()))?;
    String::from_utf8(bytes)
        .map_err(|e| CodecError::new(CodecErrorKind::BadEncoding, path, e.to_string()))
}

pub(crate) struct Decoder {
    collapse: EmptyCollapse,
}

impl Decoder {
    pub(crate) fn new(collapse: EmptyCollapse) -> Self {
        Self { collapse }
    }

    /// Decodes an outermost record.
    ///
    /// Failures of top-level fields are reported as-is rather than wrapped in
    /// `BadStruct`.
    pub(crate) fn decode_record(
        &self,
        text: &str,
        desc: &TypeDescriptor,
    ) -> Result<Value, CodecError> {
        let path = FieldPath::root(&desc.name);
        let payload = unwrap(text, &path)?;
        self.struct_from_payload(desc, &payload, &path)
            .map_err(|nested| top_level(CodecErrorKind::BadStruct, &path, nested))
    }

    /// Decodes an outermost value of any kind.
    pub(crate) fn decode_top(
        &self,
        text: &str,
        kind: &FieldKind,
        path: &FieldPath<'_>,
    ) -> Result<Value, CodecError> {
        match kind {
            FieldKind::String | FieldKind::Int | FieldKind::Float | FieldKind::Bool => {
                let payload = unwrap(text, path)?;
                self.decode_slot(kind, &payload, path)
            }
            FieldKind::Struct(_)
            | FieldKind::Array { .. }
            | FieldKind::Seq(_)
            | FieldKind::Map { .. } => {
                let payload = unwrap(text, path)?;
                self.from_payload(kind, &payload, path)
                    .map_err(|nested| top_level(nested_kind(kind), path, nested))
            }
            FieldKind::Pointer(_) | FieldKind::Opaque(_) => {
                Err(CodecError::unsupported(path, kind.name()))
            }
        }
    }

    /// Decodes one slot of a composite.
    pub(crate) fn decode_slot(
        &self,
        kind: &FieldKind,
        text: &str,
        path: &FieldPath<'_>,
    ) -> Result<Value, CodecError> {
        match kind {
            FieldKind::String => Ok(Value::String(text.to_string())),
            FieldKind::Int => parse_int(text).map(Value::Int).ok_or_else(|| {
                CodecError::new(
                    CodecErrorKind::BadInt,
                    path,
                    format!("invalid integer {:?}", text),
                )
            }),
            FieldKind::Float => parse_float(text).map(Value::Float).ok_or_else(|| {
                CodecError::new(
                    CodecErrorKind::BadFloat,
                    path,
                    format!("invalid float {:?}", text),
                )
            }),
            FieldKind::Bool => parse_bool(text).map(Value::Bool).ok_or_else(|| {
                CodecError::new(
                    CodecErrorKind::BadBool,
                    path,
                    format!("invalid boolean {:?}", text),
                )
            }),
            FieldKind::Struct(_)
            | FieldKind::Array { .. }
            | FieldKind::Seq(_)
            | FieldKind::Map { .. } => {
                let bad = nested_kind(kind);
                let payload = unwrap(text, path).map_err(|e| CodecError::wrap(bad, path, e))?;
                self.from_payload(kind, &payload, path).map_err(|nested| match nested {
                    Nested::Slot(err) => CodecError::wrap(bad, path, err),
                    Nested::Shape(detail) => CodecError::new(bad, path, detail),
                })
            }
            FieldKind::Pointer(pointee) => {
                if text.is_empty() {
                    return Ok(Value::Pointer(None));
                }
                self.decode_slot(pointee, text, path)
                    .map(Value::some)
                    .map_err(|e| CodecError::wrap(CodecErrorKind::BadPointer, path, e))
            }
            FieldKind::Opaque(_) => Err(CodecError::unsupported(path, kind.name())),
        }
    }

    fn from_payload(
        &self,
        kind: &FieldKind,
        payload: &str,
        path: &FieldPath<'_>,
    ) -> Result<Value, Nested> {
        match kind {
            FieldKind::Struct(desc) => self.struct_from_payload(desc, payload, path),
            FieldKind::Array { element, len } => {
                self.array_from_payload(element, *len, payload, path)
            }
            FieldKind::Seq(element) => self.seq_from_payload(element, payload, path),
            FieldKind::Map { key, value } => self.map_from_payload(key, value, payload, path),
            other => Err(Nested::Shape(format!("{} is not a composite kind", other.name()))),
        }
    }

    fn struct_from_payload(
        &self,
        desc: &TypeDescriptor,
        payload: &str,
        path: &FieldPath<'_>,
    ) -> Result<Value, Nested> {
        let slots: Vec<&str> = payload.split(',').collect();
        if slots.len() < desc.fields.len() {
            return Err(Nested::Shape(format!(
                "expected {} fields, found {} slots",
                desc.fields.len(),
                slots.len()
            )));
        }

        let mut value = StructValue {
            type_name: desc.name.clone(),
            fields: Vec::with_capacity(desc.fields.len()),
        };
        for (field, slot) in desc.fields.iter().zip(slots) {
            let decoded = self.decode_slot(&field.kind, slot, &path.field(&field.name))?;
            value.fields.push((field.name.clone(), decoded));
        }
        Ok(Value::Struct(value))
    }

    fn array_from_payload(
        &self,
        element: &FieldKind,
        len: usize,
        payload: &str,
        path: &FieldPath<'_>,
    ) -> Result<Value, Nested> {
        let slots: Vec<&str> = payload.split(',').collect();
        if slots.len() < len {
            return Err(Nested::Shape(format!(
                "expected {} elements, found {} slots",
                len,
                slots.len()
            )));
        }

        let mut items = Vec::with_capacity(len);
        for (i, slot) in slots.into_iter().take(len).enumerate() {
            items.push(self.decode_slot(element, slot, &path.index(i))?);
        }
        Ok(Value::Array(items))
    }

    fn seq_from_payload(
        &self,
        element: &FieldKind,
        payload: &str,
        path: &FieldPath<'_>,
    ) -> Result<Value, Nested> {
        let mut items = Vec::new();
        if !payload.is_empty() {
            for (i, slot) in payload.split(',').enumerate() {
                items.push(self.decode_slot(element, slot, &path.index(i))?);
            }
        }

        if self.collapses(items.len(), items.first()) {
            return Ok(Value::Seq(None));
        }
        Ok(Value::Seq(Some(items)))
    }

    fn map_from_payload(
        &self,
        key_kind: &FieldKind,
        value_kind: &FieldKind,
        payload: &str,
        path: &FieldPath<'_>,
    ) -> Result<Value, Nested> {
        let mut entries: Vec<(Value, Value)> = Vec::new();
        for (i, slot) in payload.split(',').enumerate() {
            if slot.is_empty() {
                continue;
            }
            let mut parts = slot.split(':');
            let (key_text, value_text) = match (parts.next(), parts.next()) {
                (Some(k), Some(v)) => (k, v),
                _ => {
                    return Err(Nested::Shape(format!(
                        "entry {} has no ':' separator",
                        i
                    )))
                }
            };

            let key = self.decode_slot(key_kind, key_text, &path.index(i))?;
            let value = self.decode_slot(value_kind, value_text, &path.key(key_text))?;
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
        }

        if self.collapses(entries.len(), entries.first().map(|(_, v)| v)) {
            return Ok(Value::Map(None));
        }
        Ok(Value::Map(Some(entries)))
    }

    fn collapses(&self, len: usize, first: Option<&Value>) -> bool {
        match self.collapse {
            EmptyCollapse::Reference => len == 0 || first.is_some_and(Value::is_zero),
            EmptyCollapse::EmptyOnly => len == 0,
        }
    }
}
