//! Record store for tagstore
//!
//! One store file holds the records of one schema, one encoded record per
//! line, in append order.
//!
//! # Operations
//!
//! - `append` / `append_all` add lines at the end of the file
//! - `get_all` / `get_by_key` scan the file from the start
//! - `update` / `remove` rewrite the file through a sibling temporary
//!   file that is renamed over the original
//!
//! # Guarantees
//!
//! - A failed update or remove leaves the file as it was
//! - Lines not touched by a rewrite are copied byte-for-byte
//! - With `sync_writes` enabled, appends and rewrites are fsynced
//!   before they report success
//!
//! Concurrent use from several processes or handles is not coordinated.

mod config;
mod engine;
mod errors;
mod rewrite;
mod typed;

pub use config::StoreConfig;
pub use engine::RecordStore;
pub use errors::{Severity, StoreError, StoreErrorCode, StoreResult};
pub use typed::TypedStore;
