//! Codec error taxonomy.

use std::fmt;

use thiserror::Error;

use super::path::FieldPath;

/// Category of a codec failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecErrorKind {
    /// Base64 unwrap failed or payload was not UTF-8
    BadEncoding,
    BadInt,
    BadFloat,
    BadBool,
    /// Nested sequence failed to decode
    BadSlice,
    /// Nested map failed to decode
    BadMap,
    /// Nested structure failed to decode
    BadStruct,
    /// Nested array failed to decode or had too few slots
    BadArray,
    /// Nested pointer failed to decode
    BadPointer,
    /// Kind cannot be encoded or decoded
    UnsupportedType,
}

impl fmt::Display for CodecErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            CodecErrorKind::BadEncoding => "cannot base64 decode",
            CodecErrorKind::BadInt => "cannot decode int type",
            CodecErrorKind::BadFloat => "cannot decode float type",
            CodecErrorKind::BadBool => "cannot decode bool type",
            CodecErrorKind::BadSlice => "cannot decode slice type",
            CodecErrorKind::BadMap => "cannot decode map type",
            CodecErrorKind::BadStruct => "cannot decode struct type",
            CodecErrorKind::BadArray => "cannot decode array type",
            CodecErrorKind::BadPointer => "cannot decode pointer type",
            CodecErrorKind::UnsupportedType => "unsupported type",
        };
        f.write_str(msg)
    }
}

/// Failure encoding or decoding a value, attributed to a field path.
///
/// Failures inside nested composites are chained: the outer error names the
/// composite that could not be decoded and its `source()` is the failure
/// inside it.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at '{path}': {detail}")]
pub struct CodecError {
    kind: CodecErrorKind,
    path: String,
    detail: String,
    #[source]
    source: Option<Box<CodecError>>,
}

impl CodecError {
    pub(crate) fn new(
        kind: CodecErrorKind,
        path: &FieldPath<'_>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            path: path.render(),
            detail: detail.into(),
            source: None,
        }
    }

    pub(crate) fn wrap(kind: CodecErrorKind, path: &FieldPath<'_>, cause: CodecError) -> Self {
        Self {
            kind,
            path: path.render(),
            detail: format!("nested {}", cause.kind),
            source: Some(Box::new(cause)),
        }
    }

    pub(crate) fn unsupported(path: &FieldPath<'_>, kind_name: &str) -> Self {
        Self::new(
            CodecErrorKind::UnsupportedType,
            path,
            format!("{} values are not supported", kind_name),
        )
    }

    /// Outermost failure kind.
    pub fn kind(&self) -> CodecErrorKind {
        self.kind
    }

    /// Field path where this failure occurred.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Human-readable detail.
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// The nested failure, if any.
    pub fn cause(&self) -> Option<&CodecError> {
        self.source.as_deref()
    }

    /// Iterates this error and its nested causes, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &CodecError> {
        std::iter::successors(Some(self), |e| e.cause())
    }

    /// Returns true if this error or any nested cause has `kind`.
    pub fn is(&self, kind: CodecErrorKind) -> bool {
        self.chain().any(|e| e.kind == kind)
    }

    /// Kind of the innermost failure.
    pub fn root_kind(&self) -> CodecErrorKind {
        self.chain().last().map(|e| e.kind).unwrap_or(self.kind)
    }
}
