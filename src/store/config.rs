//! Store configuration

use std::path::{Path, PathBuf};

use super::errors::{StoreError, StoreResult};

/// Where the store file lives and which field is the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    path: PathBuf,
    key_field: String,
    sync_writes: bool,
}

impl StoreConfig {
    /// Create a configuration. Writes are fsynced by default.
    pub fn new(path: impl Into<PathBuf>, key_field: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key_field: key_field.into(),
            sync_writes: true,
        }
    }

    /// Enables or disables fsync after appends and before rewrite swaps
    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    /// Path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the key field
    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// Whether writes are fsynced
    pub fn sync_writes(&self) -> bool {
        self.sync_writes
    }

    /// Rejects an empty path or key field name
    pub fn validate(&self) -> StoreResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(StoreError::configuration("Store file path must be set"));
        }
        if self.key_field.is_empty() {
            return Err(StoreError::configuration("Key field name must be set"));
        }
        Ok(())
    }
}
