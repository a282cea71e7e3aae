//! Field paths for error attribution.
//!
//! Paths are built on the stack while recursing and only rendered into a
//! string when an error is reported.

use std::fmt::Write as _;

#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Root(&'a str),
    Field(&'a str),
    Index(usize),
    Key(&'a str),
}

/// Location of a slot within a value, e.g. `Company.Staff[0][1].Name`.
#[derive(Debug, Clone, Copy)]
pub struct FieldPath<'a> {
    parent: Option<&'a FieldPath<'a>>,
    segment: Segment<'a>,
}

impl<'a> FieldPath<'a> {
    pub fn root(name: &'a str) -> Self {
        Self {
            parent: None,
            segment: Segment::Root(name),
        }
    }

    pub fn field<'b>(&'b self, name: &'b str) -> FieldPath<'b> {
        FieldPath {
            parent: Some(self),
            segment: Segment::Field(name),
        }
    }

    pub fn index<'b>(&'b self, index: usize) -> FieldPath<'b> {
        FieldPath {
            parent: Some(self),
            segment: Segment::Index(index),
        }
    }

    pub fn key<'b>(&'b self, key: &'b str) -> FieldPath<'b> {
        FieldPath {
            parent: Some(self),
            segment: Segment::Key(key),
        }
    }

    pub fn render(&self) -> String {
        let mut segments = Vec::new();
        let mut current = Some(self);
        while let Some(path) = current {
            segments.push(path.segment);
            current = path.parent;
        }

        let mut out = String::new();
        for segment in segments.into_iter().rev() {
            // Writing into a String cannot fail.
            let _ = match segment {
                Segment::Root(name) => write!(out, "{}", name),
                Segment::Field(name) => write!(out, ".{}", name),
                Segment::Index(i) => write!(out, "[{}]", i),
                Segment::Key(k) => write!(out, "[{:?}]", k),
            };
        }
        out
    }
}
