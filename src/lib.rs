//! tagstore - A minimal embedded record store
//!
//! Records of one schema live in one UTF-8 text file, one record per line,
//! each field wrapped in `<db.NAME>...</db.NAME>` tags.
//!
//! ```ignore
//! use tagstore::schema::{FieldDef, Record, Schema, Value};
//! use tagstore::store::{RecordStore, StoreConfig};
//!
//! let schema = Schema::new("person", vec![FieldDef::int("ID"), FieldDef::text("Name")]);
//! let store = RecordStore::open(StoreConfig::new("people.db", "ID"), schema)?;
//! store.append(&Record::new().with("ID", 1i64).with("Name", "A"))?;
//! let found = store.get_by_key(&Value::Int(1))?;
//! ```

pub mod cli;
pub mod codec;
pub mod observability;
pub mod schema;
pub mod store;

pub use schema::{FieldDef, FieldType, Model, Record, Schema, Symbolic, Value};
pub use store::{RecordStore, StoreConfig, StoreError, StoreErrorCode, StoreResult, TypedStore};
