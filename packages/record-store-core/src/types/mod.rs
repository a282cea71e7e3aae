//! Type descriptors and dynamic values.

mod descriptor;
mod value;

pub use descriptor::{FieldDescriptor, FieldKind, OpaqueKind, TypeDescriptor};
pub use value::{StructValue, Value, ValueError};
