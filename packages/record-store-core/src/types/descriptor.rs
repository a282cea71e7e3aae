//! Type descriptors for record schemas.
//!
//! A descriptor is built once per record type and handed to the codec and the
//! table store; the codec never inspects encoded data for type information.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kinds a record may declare but the codec cannot encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpaqueKind {
    /// Communication channel endpoint
    Channel,
    /// Function or closure
    Function,
    /// Raw handle or pointer without a pointee type
    Handle,
    /// Dynamically typed value without a fixed shape
    Interface,
}

impl fmt::Display for OpaqueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpaqueKind::Channel => "channel",
            OpaqueKind::Function => "function",
            OpaqueKind::Handle => "handle",
            OpaqueKind::Interface => "interface",
        };
        f.write_str(name)
    }
}

/// Shape of a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Float,
    Bool,
    /// Fixed-length array
    Array { element: Box<FieldKind>, len: usize },
    /// Growable sequence
    Seq(Box<FieldKind>),
    /// Associative map
    Map {
        key: Box<FieldKind>,
        value: Box<FieldKind>,
    },
    /// Nested structure
    Struct(TypeDescriptor),
    /// Optional value (absent or present pointee)
    Pointer(Box<FieldKind>),
    /// Declared but unsupported by the codec
    Opaque(OpaqueKind),
}

impl FieldKind {
    /// Convenience constructor for `Array`.
    pub fn array(element: FieldKind, len: usize) -> Self {
        FieldKind::Array {
            element: Box::new(element),
            len,
        }
    }

    /// Convenience constructor for `Seq`.
    pub fn seq(element: FieldKind) -> Self {
        FieldKind::Seq(Box::new(element))
    }

    /// Convenience constructor for `Map`.
    pub fn map(key: FieldKind, value: FieldKind) -> Self {
        FieldKind::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Convenience constructor for `Pointer`.
    pub fn pointer(pointee: FieldKind) -> Self {
        FieldKind::Pointer(Box::new(pointee))
    }

    /// Returns true for string, int, float and bool.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            FieldKind::String | FieldKind::Int | FieldKind::Float | FieldKind::Bool
        )
    }

    /// Short name of the kind, used in error messages and as the table
    /// identifier of non-structure values.
    pub fn name(&self) -> &str {
        match self {
            FieldKind::String => "string",
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::Bool => "bool",
            FieldKind::Array { .. } => "array",
            FieldKind::Seq(_) => "seq",
            FieldKind::Map { .. } => "map",
            FieldKind::Struct(desc) => &desc.name,
            FieldKind::Pointer(_) => "pointer",
            FieldKind::Opaque(OpaqueKind::Channel) => "channel",
            FieldKind::Opaque(OpaqueKind::Function) => "function",
            FieldKind::Opaque(OpaqueKind::Handle) => "handle",
            FieldKind::Opaque(OpaqueKind::Interface) => "interface",
        }
    }
}

/// Named field within a structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,
    /// Field kind
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Runtime description of a record type.
///
/// Field order is significant: the codec lays fields out positionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Type name; doubles as the table identifier
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    /// Creates a descriptor with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field, builder style.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDescriptor::new(name, kind));
        self
    }

    /// Looks up a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the position of a field by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns true if the descriptor declares the named field.
    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }
}
