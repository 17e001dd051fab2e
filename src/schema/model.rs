//! Typed models
//!
//! A [`Model`] is a Rust type with a compile-time schema descriptor. Models
//! are normally declared with [`record_model!`](crate::record_model) and
//! their enum fields with [`symbolic_enum!`](crate::symbolic_enum).
//!
//! ```ignore
//! tagstore::symbolic_enum! {
//!     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//!     pub enum Role { Admin, User }
//! }
//!
//! tagstore::record_model! {
//!     #[derive(Debug, Clone, PartialEq)]
//!     pub struct Person as "person" {
//!         key id: i64 => "ID",
//!         name: String => "Name",
//!         role: Role => "Role",
//!     }
//! }
//! ```

use super::types::{FieldType, Schema};
use super::value::{Record, Value};

/// Rust types that can be stored in a field.
pub trait FieldValue: Sized {
    /// The field type this Rust type maps to
    fn field_type() -> FieldType;

    /// Converts to a field value
    fn to_value(&self) -> Value;

    /// Converts back; `None` if the value has the wrong kind
    fn from_value(value: &Value) -> Option<Self>;
}

impl FieldValue for i64 {
    fn field_type() -> FieldType {
        FieldType::Int
    }

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FieldValue for i32 {
    fn field_type() -> FieldType {
        FieldType::Int
    }

    fn to_value(&self) -> Value {
        Value::Int(*self as i64)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => i32::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl FieldValue for f64 {
    fn field_type() -> FieldType {
        FieldType::Float
    }

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl FieldValue for bool {
    fn field_type() -> FieldType {
        FieldType::Bool
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FieldValue for String {
    fn field_type() -> FieldType {
        FieldType::Text
    }

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Closed enums stored by symbol name.
pub trait Symbolic: Sized {
    /// Symbol names in ordinal order
    const SYMBOLS: &'static [&'static str];

    /// This variant's symbol name
    fn symbol(&self) -> &'static str;

    /// Variant for a symbol name
    fn from_symbol(symbol: &str) -> Option<Self>;

    /// Enum field type listing every symbol
    fn enum_field_type() -> FieldType {
        FieldType::Enum {
            symbols: Self::SYMBOLS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A record type with a compile-time schema and a typed key.
pub trait Model: Sized {
    /// Rust type of the key field
    type Key: FieldValue;

    /// Name of the key field
    const KEY_FIELD: &'static str;

    /// Schema descriptor in declaration order
    fn schema() -> Schema;

    /// This instance's key
    fn key(&self) -> &Self::Key;

    /// Converts to an untyped record
    fn to_record(&self) -> Record;

    /// Converts from an untyped record
    fn from_record(record: &Record) -> Result<Self, String>;
}

/// Reads one typed field out of a record. Used by `record_model!`.
pub fn field_from_record<T: FieldValue>(record: &Record, name: &str) -> Result<T, String> {
    let value = record
        .get(name)
        .ok_or_else(|| format!("missing field '{}'", name))?;
    T::from_value(value).ok_or_else(|| {
        format!(
            "field '{}' expects {}, got {}",
            name,
            T::field_type().type_name(),
            value.describe()
        )
    })
}

/// Declares a closed enum usable as a record field.
///
/// Generates the enum plus its [`Symbolic`] and [`FieldValue`] impls.
/// Variant names are the on-disk symbols; declaration order gives ordinals.
#[macro_export]
macro_rules! symbolic_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident { $($variant:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $($variant),+
        }

        impl $crate::schema::Symbolic for $name {
            const SYMBOLS: &'static [&'static str] = &[$(stringify!($variant)),+];

            fn symbol(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant),)+
                }
            }

            fn from_symbol(symbol: &str) -> Option<Self> {
                $(
                    if symbol == stringify!($variant) {
                        return Some($name::$variant);
                    }
                )+
                None
            }
        }

        impl $crate::schema::FieldValue for $name {
            fn field_type() -> $crate::schema::FieldType {
                <$name as $crate::schema::Symbolic>::enum_field_type()
            }

            fn to_value(&self) -> $crate::schema::Value {
                $crate::schema::Value::symbol(
                    <$name as $crate::schema::Symbolic>::symbol(self),
                )
            }

            fn from_value(value: &$crate::schema::Value) -> Option<Self> {
                match value {
                    $crate::schema::Value::Symbol(s) => {
                        <$name as $crate::schema::Symbolic>::from_symbol(s)
                    }
                    _ => None,
                }
            }
        }
    };
}

/// Declares a record struct and its [`Model`] impl.
///
/// The `key` field comes first; every field maps to an on-disk name.
#[macro_export]
macro_rules! record_model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident as $schema_name:literal {
            key $key:ident : $key_ty:ty => $key_tag:literal,
            $($field:ident : $ty:ty => $tag:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            pub $key: $key_ty,
            $(pub $field: $ty,)*
        }

        impl $crate::schema::Model for $name {
            type Key = $key_ty;

            const KEY_FIELD: &'static str = $key_tag;

            fn schema() -> $crate::schema::Schema {
                $crate::schema::Schema::new(
                    $schema_name,
                    vec![
                        $crate::schema::FieldDef::new(
                            $key_tag,
                            <$key_ty as $crate::schema::FieldValue>::field_type(),
                        ),
                        $(
                            $crate::schema::FieldDef::new(
                                $tag,
                                <$ty as $crate::schema::FieldValue>::field_type(),
                            ),
                        )*
                    ],
                )
            }

            fn key(&self) -> &Self::Key {
                &self.$key
            }

            fn to_record(&self) -> $crate::schema::Record {
                let mut record = $crate::schema::Record::new();
                record.set($key_tag, $crate::schema::FieldValue::to_value(&self.$key));
                $(record.set($tag, $crate::schema::FieldValue::to_value(&self.$field));)*
                record
            }

            fn from_record(record: &$crate::schema::Record) -> Result<Self, String> {
                Ok(Self {
                    $key: $crate::schema::model::field_from_record(record, $key_tag)?,
                    $($field: $crate::schema::model::field_from_record(record, $tag)?,)*
                })
            }
        }
    };
}
