//! In-process [`RecordStore`] implementation.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::{RecordStore, RoomRecord, StoreError};

#[derive(Debug, Default)]
struct Inner {
    /// Records stored as serialized JSON, exactly as a real KV store
    /// would hold them — reads go back through the codec.
    records: BTreeMap<String, String>,
    fail_next_write: bool,
}

/// An in-memory record store.
///
/// Cheap to clone — clones share the same backing map, so tests can keep
/// a handle for inspection while the lifecycle service owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a record exists for the given room name.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.lock().unwrap().records.contains_key(name)
    }

    /// Makes the next `upsert` or `delete` call fail.
    pub fn fail_next_write(&self) {
        self.inner.lock().unwrap().fail_next_write = true;
    }
}

impl RecordStore for MemoryStore {
    async fn upsert(&self, record: &RoomRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string(record)?;
        let mut inner = self.inner.lock().unwrap();
        if std::mem::take(&mut inner.fail_next_write) {
            return Err(StoreError::Write("injected failure".into()));
        }
        inner.records.insert(record.name.clone(), json);
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if std::mem::take(&mut inner.fail_next_write) {
            return Err(StoreError::Write("injected failure".into()));
        }
        inner.records.remove(name);
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<RoomRecord>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut records = Vec::with_capacity(inner.records.len());
        for (name, json) in &inner.records {
            match serde_json::from_str(json) {
                Ok(record) => records.push(record),
                // A corrupt entry must not block recovery of the rest.
                Err(e) => warn!(room = %name, error = %e, "skipping undecodable room record"),
            }
        }
        Ok(records)
    }
}
