//! Type-directed text codec for record values.
//!
//! Encoding grammar:
//! - a composite (structure, array, sequence, map) encodes each member,
//!   joins the member texts with `,` (map entries as `key:value`) and wraps
//!   the joined text in standard base64;
//! - a scalar member is its canonical text, unwrapped;
//! - an absent pointer is the empty string, a present one encodes its pointee.
//!
//! Decoding unwraps, splits and interprets each slot according to the target
//! descriptor only.

mod decode;
mod encode;
mod error;
mod path;
pub mod scalar;

use serde::{Deserialize, Serialize};

pub use error::{CodecError, CodecErrorKind};
pub use path::FieldPath;

use crate::types::{FieldKind, TypeDescriptor, Value};
use decode::Decoder;

/// Decode-time treatment of sequences and maps that look empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyCollapse {
    /// A sequence or map with no elements, or whose first element (map: first
    /// entry's value) is the zero value, decodes as absent.
    #[default]
    Reference,
    /// Only containers with no elements decode as absent.
    EmptyOnly,
}

/// Codec with decode options. Encoding is option independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Codec {
    empty_collapse: EmptyCollapse,
}

impl Codec {
    /// Creates a codec with the reference collapse rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec with the given collapse rule.
    pub fn with_empty_collapse(empty_collapse: EmptyCollapse) -> Self {
        Self { empty_collapse }
    }

    pub fn empty_collapse(&self) -> EmptyCollapse {
        self.empty_collapse
    }

    /// Encodes a full value into a blob.
    pub fn encode(&self, value: &Value) -> Result<String, CodecError> {
        encode::encode_top(value, &FieldPath::root(value.type_name()))
    }

    /// Encodes a value as it would appear as a member of a composite:
    /// canonical text for scalars, a blob for composites, the empty string for
    /// an absent pointer.
    pub fn encode_slot(&self, value: &Value) -> Result<String, CodecError> {
        encode::encode_slot(value, &FieldPath::root(value.type_name()))
    }

    /// Decodes a record blob against its descriptor.
    pub fn decode(&self, text: &str, desc: &TypeDescriptor) -> Result<Value, CodecError> {
        Decoder::new(self.empty_collapse).decode_record(text, desc)
    }

    /// Decodes a blob produced by [`Codec::encode`] for a value of any
    /// supported top-level kind.
    pub fn decode_kind(&self, text: &str, kind: &FieldKind) -> Result<Value, CodecError> {
        Decoder::new(self.empty_collapse).decode_top(text, kind, &FieldPath::root(kind.name()))
    }
}

/// Encodes a value with the default codec.
pub fn encode(value: &Value) -> Result<String, CodecError> {
    Codec::new().encode(value)
}

/// Decodes a record with the default codec.
pub fn decode(text: &str, desc: &TypeDescriptor) -> Result<Value, CodecError> {
    Codec::new().decode(text, desc)
}
