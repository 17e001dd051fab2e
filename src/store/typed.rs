//! Typed façade over [`RecordStore`]

use std::marker::PhantomData;
use std::path::PathBuf;

use super::config::StoreConfig;
use super::engine::RecordStore;
use super::errors::{StoreError, StoreResult};
use crate::schema::{FieldValue, Model, Record};

/// A store of `M` values.
///
/// Converts to and from untyped records at the boundary; everything else
/// is delegated to the wrapped [`RecordStore`].
#[derive(Debug)]
pub struct TypedStore<M: Model> {
    inner: RecordStore,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> TypedStore<M> {
    /// Opens a store of `M` at `path`, keyed by the model's key field.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::with_config(StoreConfig::new(path, M::KEY_FIELD))
    }

    /// Opens a store of `M` with explicit configuration.
    pub fn with_config(config: StoreConfig) -> StoreResult<Self> {
        Ok(Self {
            inner: RecordStore::open(config, M::schema())?,
            _model: PhantomData,
        })
    }

    /// The untyped store
    pub fn inner(&self) -> &RecordStore {
        &self.inner
    }

    /// Appends one item as a new line
    pub fn append(&self, item: &M) -> StoreResult<()> {
        self.inner.append(&item.to_record())
    }

    /// Appends items in order; see [`RecordStore::append_all`]
    pub fn append_all(&self, items: &[M]) -> StoreResult<usize> {
        let records: Vec<Record> = items.iter().map(Model::to_record).collect();
        self.inner.append_all(&records)
    }

    /// Reads every item in file order
    pub fn get_all(&self) -> StoreResult<Vec<M>> {
        self.inner
            .get_all()?
            .iter()
            .map(|record| self.from_record(record))
            .collect()
    }

    /// Returns the first item stored under `key`, or `None`
    pub fn get(&self, key: &M::Key) -> StoreResult<Option<M>> {
        match self.inner.get_by_key(&key.to_value())? {
            Some(record) => self.from_record(&record).map(Some),
            None => Ok(None),
        }
    }

    /// Replaces every item sharing `item`'s key; returns the count
    pub fn update(&self, item: &M) -> StoreResult<usize> {
        self.inner.update(&item.to_record())
    }

    /// Removes every item stored under `key`; returns the count
    pub fn remove(&self, key: &M::Key) -> StoreResult<usize> {
        self.inner.remove(&key.to_value())
    }

    /// Removes every item sharing `item`'s key; returns the count
    pub fn remove_item(&self, item: &M) -> StoreResult<usize> {
        self.remove(item.key())
    }

    fn from_record(&self, record: &Record) -> StoreResult<M> {
        M::from_record(record)
            .map_err(|reason| StoreError::type_mismatch(&self.inner.schema().schema().name, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreErrorCode;
    use std::fs;
    use tempfile::TempDir;

    crate::symbolic_enum! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        enum Priority { Low, High }
    }

    crate::record_model! {
        #[derive(Debug, Clone, PartialEq)]
        struct Task as "task" {
            key id: i32 => "Id",
            title: String => "Title",
            priority: Priority => "Priority",
        }
    }

    fn task(id: i32, title: &str, priority: Priority) -> Task {
        Task {
            id,
            title: title.into(),
            priority,
        }
    }

    fn open(dir: &TempDir) -> TypedStore<Task> {
        let config = StoreConfig::new(dir.path().join("tasks.db"), Task::KEY_FIELD)
            .with_sync_writes(false);
        TypedStore::with_config(config).unwrap()
    }

    #[test]
    fn test_typed_lifecycle() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);

        assert_eq!(
            store
                .append_all(&[task(1, "write", Priority::High), task(2, "read", Priority::Low)])
                .unwrap(),
            2
        );
        assert_eq!(store.get(&2).unwrap(), Some(task(2, "read", Priority::Low)));

        assert_eq!(store.update(&task(2, "reread", Priority::High)).unwrap(), 1);
        assert_eq!(store.remove_item(&task(1, "ignored", Priority::Low)).unwrap(), 1);
        assert_eq!(store.remove(&1).unwrap(), 0);

        assert_eq!(store.get_all().unwrap(), vec![task(2, "reread", Priority::High)]);
    }

    #[test]
    fn test_open_uses_model_key() {
        let dir = TempDir::new().unwrap();
        let store = TypedStore::<Task>::open(dir.path().join("tasks.db")).unwrap();
        assert_eq!(store.inner().config().key_field(), "Id");
        assert!(store.inner().config().sync_writes());
    }

    #[test]
    fn test_out_of_range_value_is_type_mismatch() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);
        fs::write(
            store.inner().path(),
            "<db.Id>9999999999</db.Id><db.br/><db.Title>x</db.Title><db.br/><db.Priority>Low</db.Priority>\n",
        )
        .unwrap();

        let err = store.get_all().unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::TagTypeMismatch);
        assert!(err.message().contains("Id"));
    }
}
