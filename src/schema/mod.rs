//! Schema subsystem for tagstore
//!
//! A schema is the explicit descriptor of a record type: an ordered list of
//! named, typed fields. The store binds one field as the key when it is
//! configured.
//!
//! # Design Principles
//!
//! - Field order is declaration order and is the on-disk order
//! - Closed set of field types (int, float, bool, text, enum)
//! - No runtime type introspection: typed models declare their schema
//!   through [`Model`], usually generated by [`record_model!`](crate::record_model)

pub mod model;
mod types;
mod value;

pub use model::{FieldValue, Model, Symbolic};
pub use types::{FieldDef, FieldType, KeyedSchema, Schema};
pub use value::{Record, Value};
