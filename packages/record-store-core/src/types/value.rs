//! Dynamic record values.

use thiserror::Error;

use super::descriptor::{FieldKind, OpaqueKind, TypeDescriptor};

/// Errors converting a dynamic [`Value`] into a native Rust type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    /// Value has a different kind than the target type
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Structure value lacks a declared field
    #[error("missing field '{0}'")]
    MissingField(String),

    /// Structure value carries a field its type does not declare
    #[error("unexpected field '{0}'")]
    UnexpectedField(String),

    /// Structure value names a different type
    #[error("expected structure {expected}, found {found}")]
    StructName { expected: String, found: String },

    /// Array value has the wrong number of elements
    #[error("expected {expected} array elements, found {found}")]
    ArrayLength { expected: usize, found: usize },

    /// Integer does not fit the target width
    #[error("integer {value} out of range for {target}")]
    OutOfRange { value: i64, target: &'static str },

    /// Absent value where the target type requires one
    #[error("unexpected absent value for {0}")]
    Absent(&'static str),
}

/// Field values of a structure, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    /// Type name of the structure
    pub type_name: String,
    /// Field name and value pairs
    pub fields: Vec<(String, Value)>,
}

impl StructValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field, builder style.
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    /// Returns the value of a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Checks that this structure is of type `desc`: the declared fields in
    /// order, each conforming to its kind, and nothing more.
    pub fn conforms_to(&self, desc: &TypeDescriptor) -> Result<(), ValueError> {
        if self.type_name != desc.name {
            return Err(ValueError::StructName {
                expected: desc.name.clone(),
                found: self.type_name.clone(),
            });
        }
        for (i, field) in desc.fields.iter().enumerate() {
            match self.fields.get(i) {
                Some((name, value)) if *name == field.name => value.conforms_to(&field.kind)?,
                _ => return Err(ValueError::MissingField(field.name.clone())),
            }
        }
        match self.fields.get(desc.fields.len()) {
            Some((name, _)) => Err(ValueError::UnexpectedField(name.clone())),
            None => Ok(()),
        }
    }

    /// Removes and returns a field by name.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        let index = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(index).1)
    }
}

/// A dynamically typed record value.
///
/// `Seq`, `Map` and `Pointer` distinguish an absent value (`None`) from a
/// present one; an absent sequence and an empty sequence encode identically.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Array(Vec<Value>),
    Seq(Option<Vec<Value>>),
    /// Entries in insertion order
    Map(Option<Vec<(Value, Value)>>),
    Struct(StructValue),
    Pointer(Option<Box<Value>>),
    Opaque(OpaqueKind),
}

impl Value {
    /// Name of the value's kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Array(_) => "array",
            Value::Seq(_) => "seq",
            Value::Map(_) => "map",
            Value::Struct(_) => "struct",
            Value::Pointer(_) => "pointer",
            Value::Opaque(OpaqueKind::Channel) => "channel",
            Value::Opaque(OpaqueKind::Function) => "function",
            Value::Opaque(OpaqueKind::Handle) => "handle",
            Value::Opaque(OpaqueKind::Interface) => "interface",
        }
    }

    /// Identifier used to select a table: the structure's type name, or the
    /// kind name for anything else.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Struct(s) => &s.type_name,
            other => other.kind_name(),
        }
    }

    /// Returns true if this is the zero value of its kind.
    ///
    /// Floats are zero only for positive zero. Present but empty sequences and
    /// maps are not zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::String(s) => s.is_empty(),
            Value::Int(i) => *i == 0,
            Value::Float(f) => f.to_bits() == 0,
            Value::Bool(b) => !b,
            Value::Array(items) => items.iter().all(Value::is_zero),
            Value::Seq(items) => items.is_none(),
            Value::Map(entries) => entries.is_none(),
            Value::Struct(s) => s.fields.iter().all(|(_, v)| v.is_zero()),
            Value::Pointer(p) => p.is_none(),
            Value::Opaque(_) => true,
        }
    }

    /// Zero value for a field kind.
    pub fn zero(kind: &FieldKind) -> Value {
        match kind {
            FieldKind::String => Value::String(String::new()),
            FieldKind::Int => Value::Int(0),
            FieldKind::Float => Value::Float(0.0),
            FieldKind::Bool => Value::Bool(false),
            FieldKind::Array { element, len } => {
                Value::Array((0..*len).map(|_| Value::zero(element)).collect())
            }
            FieldKind::Seq(_) => Value::Seq(None),
            FieldKind::Map { .. } => Value::Map(None),
            FieldKind::Struct(desc) => Value::Struct(StructValue {
                type_name: desc.name.clone(),
                fields: desc
                    .fields
                    .iter()
                    .map(|f| (f.name.clone(), Value::zero(&f.kind)))
                    .collect(),
            }),
            FieldKind::Pointer(_) => Value::Pointer(None),
            FieldKind::Opaque(kind) => Value::Opaque(*kind),
        }
    }

    /// Builds a present pointer.
    pub fn some(value: Value) -> Value {
        Value::Pointer(Some(Box::new(value)))
    }

    /// Builds a present sequence.
    pub fn seq(items: Vec<Value>) -> Value {
        Value::Seq(Some(items))
    }

    /// Builds a present map.
    pub fn map(entries: Vec<(Value, Value)>) -> Value {
        Value::Map(Some(entries))
    }

    /// Checks that this value has the shape of `kind`, recursing into
    /// elements, entries, fields and pointees.
    ///
    /// Absent sequences, maps and pointers conform to their kind.
    pub fn conforms_to(&self, kind: &FieldKind) -> Result<(), ValueError> {
        match (kind, self) {
            (FieldKind::String, Value::String(_))
            | (FieldKind::Int, Value::Int(_))
            | (FieldKind::Float, Value::Float(_))
            | (FieldKind::Bool, Value::Bool(_))
            | (FieldKind::Seq(_), Value::Seq(None))
            | (FieldKind::Map { .. }, Value::Map(None))
            | (FieldKind::Pointer(_), Value::Pointer(None)) => Ok(()),
            (FieldKind::Opaque(expected), Value::Opaque(found)) if expected == found => Ok(()),
            (FieldKind::Array { element, len }, Value::Array(items)) => {
                if items.len() != *len {
                    return Err(ValueError::ArrayLength {
                        expected: *len,
                        found: items.len(),
                    });
                }
                items.iter().try_for_each(|item| item.conforms_to(element))
            }
            (FieldKind::Seq(element), Value::Seq(Some(items))) => {
                items.iter().try_for_each(|item| item.conforms_to(element))
            }
            (FieldKind::Map { key, value }, Value::Map(Some(entries))) => {
                entries.iter().try_for_each(|(k, v)| {
                    k.conforms_to(key)?;
                    v.conforms_to(value)
                })
            }
            (FieldKind::Struct(desc), Value::Struct(s)) => s.conforms_to(desc),
            (FieldKind::Pointer(pointee), Value::Pointer(Some(inner))) => {
                inner.conforms_to(pointee)
            }
            (kind, other) => Err(ValueError::Mismatch {
                expected: kind_label(kind),
                found: other.kind_name(),
            }),
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }
}

fn kind_label(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Struct(_) => "struct",
        FieldKind::Opaque(k) => Value::Opaque(*k).kind_name(),
        FieldKind::String => "string",
        FieldKind::Int => "int",
        FieldKind::Float => "float",
        FieldKind::Bool => "bool",
        FieldKind::Array { .. } => "array",
        FieldKind::Seq(_) => "seq",
        FieldKind::Map { .. } => "map",
        FieldKind::Pointer(_) => "pointer",
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<StructValue> for Value {
    fn from(s: StructValue) -> Self {
        Value::Struct(s)
    }
}
