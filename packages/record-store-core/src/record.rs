//! Native Rust types as record values.
//!
//! [`FieldValue`] maps a Rust type to a [`FieldKind`] and converts it to and
//! from a dynamic [`Value`]. [`Record`] marks structures that can back a
//! table; the [`record!`](crate::record!) macro declares such a structure.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::types::{FieldKind, TypeDescriptor, Value, ValueError};

/// A Rust type with a codec kind.
pub trait FieldValue: Sized {
    /// Kind descriptor for this type.
    fn kind() -> FieldKind;

    /// Converts to a dynamic value.
    fn to_value(&self) -> Value;

    /// Converts from a dynamic value.
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

/// A structure that can be stored in a table.
pub trait Record: FieldValue {
    /// Structure descriptor; its name selects the table.
    fn descriptor() -> TypeDescriptor;
}

fn mismatch<T>(expected: &'static str, found: &Value) -> Result<T, ValueError> {
    Err(ValueError::Mismatch {
        expected,
        found: found.kind_name(),
    })
}

impl FieldValue for String {
    fn kind() -> FieldKind {
        FieldKind::String
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::String(s) => Ok(s),
            other => mismatch("string", &other),
        }
    }
}

macro_rules! int_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn kind() -> FieldKind {
                    FieldKind::Int
                }

                fn to_value(&self) -> Value {
                    Value::Int(i64::from(*self))
                }

                fn from_value(value: Value) -> Result<Self, ValueError> {
                    match value {
                        Value::Int(i) => <$ty>::try_from(i).map_err(|_| ValueError::OutOfRange {
                            value: i,
                            target: stringify!($ty),
                        }),
                        other => mismatch("int", &other),
                    }
                }
            }
        )*
    };
}

int_field_value!(i64, i32, i16, i8, u32, u16, u8);

impl FieldValue for f64 {
    fn kind() -> FieldKind {
        FieldKind::Float
    }

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(f) => Ok(f),
            other => mismatch("float", &other),
        }
    }
}

impl FieldValue for f32 {
    fn kind() -> FieldKind {
        FieldKind::Float
    }

    /// Widens through the shortest decimal text, so `0.1f32` becomes `0.1`
    /// rather than `0.10000000149011612`.
    fn to_value(&self) -> Value {
        let widened = self.to_string().parse::<f64>().unwrap_or(f64::from(*self));
        Value::Float(widened)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(f) => Ok(f as f32),
            other => mismatch("float", &other),
        }
    }
}

impl FieldValue for bool {
    fn kind() -> FieldKind {
        FieldKind::Bool
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => mismatch("bool", &other),
        }
    }
}

/// Sequences. An absent sequence converts to an empty `Vec`.
impl<T: FieldValue> FieldValue for Vec<T> {
    fn kind() -> FieldKind {
        FieldKind::seq(T::kind())
    }

    fn to_value(&self) -> Value {
        Value::seq(self.iter().map(FieldValue::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Seq(None) => Ok(Vec::new()),
            Value::Seq(Some(items)) => items.into_iter().map(T::from_value).collect(),
            other => mismatch("seq", &other),
        }
    }
}

impl<T: FieldValue, const N: usize> FieldValue for [T; N] {
    fn kind() -> FieldKind {
        FieldKind::array(T::kind(), N)
    }

    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(FieldValue::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        let items = match value {
            Value::Array(items) => items,
            other => return mismatch("array", &other),
        };
        let found = items.len();
        let converted = items
            .into_iter()
            .map(T::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        converted
            .try_into()
            .map_err(|_| ValueError::ArrayLength { expected: N, found })
    }
}

fn map_entries<K: FieldValue, V: FieldValue>(
    value: Value,
) -> Result<Vec<(K, V)>, ValueError> {
    match value {
        Value::Map(None) => Ok(Vec::new()),
        Value::Map(Some(entries)) => entries
            .into_iter()
            .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
            .collect(),
        other => mismatch("map", &other),
    }
}

impl<K, V> FieldValue for HashMap<K, V>
where
    K: FieldValue + Eq + Hash,
    V: FieldValue,
{
    fn kind() -> FieldKind {
        FieldKind::map(K::kind(), V::kind())
    }

    fn to_value(&self) -> Value {
        Value::map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(map_entries(value)?.into_iter().collect())
    }
}

impl<K, V> FieldValue for BTreeMap<K, V>
where
    K: FieldValue + Ord,
    V: FieldValue,
{
    fn kind() -> FieldKind {
        FieldKind::map(K::kind(), V::kind())
    }

    fn to_value(&self) -> Value {
        Value::map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(map_entries(value)?.into_iter().collect())
    }
}

/// Optional values are pointers; `None` is the absent pointer.
impl<T: FieldValue> FieldValue for Option<T> {
    fn kind() -> FieldKind {
        FieldKind::pointer(T::kind())
    }

    fn to_value(&self) -> Value {
        match self {
            Some(inner) => Value::some(inner.to_value()),
            None => Value::Pointer(None),
        }
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Pointer(None) => Ok(None),
            Value::Pointer(Some(inner)) => T::from_value(*inner).map(Some),
            other => mismatch("pointer", &other),
        }
    }
}

/// Declares a structure and implements [`Record`] and [`FieldValue`] for it.
///
/// Field order in the declaration is the encoded slot order.
///
/// ```
/// use record_store_core::{record, Record};
///
/// record! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct Person {
///         pub id: String,
///         pub age: i64,
///     }
/// }
///
/// assert_eq!(Person::descriptor().name, "Person");
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::FieldValue for $name {
            fn kind() -> $crate::FieldKind {
                $crate::FieldKind::Struct(<$name as $crate::Record>::descriptor())
            }

            fn to_value(&self) -> $crate::Value {
                $crate::Value::Struct(
                    $crate::StructValue::new(stringify!($name))
                        $(.with(stringify!($field), $crate::FieldValue::to_value(&self.$field)))*
                )
            }

            #[allow(unused_mut, unused_variables)]
            fn from_value(
                value: $crate::Value,
            ) -> ::std::result::Result<Self, $crate::ValueError> {
                let mut fields = match value {
                    $crate::Value::Struct(s) => s,
                    other => {
                        return Err($crate::ValueError::Mismatch {
                            expected: "struct",
                            found: other.kind_name(),
                        })
                    }
                };
                Ok(Self {
                    $(
                        $field: <$ty as $crate::FieldValue>::from_value(
                            fields.take(stringify!($field)).ok_or_else(|| {
                                $crate::ValueError::MissingField(stringify!($field).to_string())
                            })?,
                        )?,
                    )*
                })
            }
        }

        impl $crate::Record for $name {
            fn descriptor() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::new(stringify!($name))
                    $(.field(stringify!($field), <$ty as $crate::FieldValue>::kind()))*
            }
        }
    };
}
