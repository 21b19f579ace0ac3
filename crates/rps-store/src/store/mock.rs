//! In-memory record store for tests and the development store service.

use super::traits::{RecordStore, StoreError};
use crate::record::{ClientId, Record, RecordId, RecordMeta, SearchQuery};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// Read grant: `writer` lets `reader` see its records of `record_type`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Grant {
    writer: ClientId,
    record_type: String,
    reader: ClientId,
}

#[derive(Default)]
struct Backing {
    /// Append-only, in write order
    records: Vec<Record>,
    grants: HashSet<Grant>,
    /// Pending injected failures
    failing_searches: u32,
    failing_writes: u32,
    failing_shares: u32,
}

impl Backing {
    fn visible_to(&self, reader: &ClientId, record: &Record) -> bool {
        let writer = &record.meta.writer_id;
        writer == reader
            || self.grants.contains(&Grant {
                writer: writer.clone(),
                record_type: record.meta.record_type.clone(),
                reader: reader.clone(),
            })
    }
}

/// In-memory record store
///
/// Each handle acts as one client identity; handles obtained through
/// [`MemoryRecordStore::connect`] share the same backing records and grants.
#[derive(Clone)]
pub struct MemoryRecordStore {
    client_id: ClientId,
    backing: Arc<Mutex<Backing>>,
}

impl MemoryRecordStore {
    /// Create an empty store with a handle acting as `client_id`
    pub fn new(client_id: impl Into<ClientId>) -> Self {
        Self {
            client_id: client_id.into(),
            backing: Arc::new(Mutex::new(Backing::default())),
        }
    }

    /// Another handle on the same store, acting as a different identity
    pub fn connect(&self, client_id: impl Into<ClientId>) -> Self {
        Self {
            client_id: client_id.into(),
            backing: Arc::clone(&self.backing),
        }
    }

    /// Make the next search on this store fail with a backend error
    pub fn fail_next_search(&self) {
        self.backing.lock().unwrap().failing_searches += 1;
    }

    /// Make the next write on this store fail with a backend error
    pub fn fail_next_write(&self) {
        self.backing.lock().unwrap().failing_writes += 1;
    }

    /// Make the next share on this store fail with a backend error
    pub fn fail_next_share(&self) {
        self.backing.lock().unwrap().failing_shares += 1;
    }

    /// Total number of records ever written, regardless of visibility (for testing)
    pub fn record_count(&self) -> usize {
        self.backing.lock().unwrap().records.len()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Backing>, StoreError> {
        self.backing
            .lock()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Record>, StoreError> {
        let mut backing = self.lock()?;
        if backing.failing_searches > 0 {
            backing.failing_searches -= 1;
            return Err(StoreError::Backend("injected search failure".to_string()));
        }

        Ok(backing
            .records
            .iter()
            .filter(|r| query.matches(r) && backing.visible_to(&self.client_id, r))
            .cloned()
            .collect())
    }

    async fn write(
        &self,
        record_type: &str,
        data: BTreeMap<String, String>,
        plain: BTreeMap<String, String>,
    ) -> Result<Record, StoreError> {
        if record_type.is_empty() {
            return Err(StoreError::InvalidRequest("empty record type".to_string()));
        }

        let mut backing = self.lock()?;
        if backing.failing_writes > 0 {
            backing.failing_writes -= 1;
            return Err(StoreError::Backend("injected write failure".to_string()));
        }

        let record = Record {
            meta: RecordMeta {
                record_id: RecordId::new(),
                writer_id: self.client_id.clone(),
                record_type: record_type.to_string(),
                plain,
                created: Utc::now(),
            },
            data,
        };
        backing.records.push(record.clone());

        Ok(record)
    }

    async fn share(&self, record_type: &str, grantee: &ClientId) -> Result<(), StoreError> {
        if grantee.is_empty() {
            return Err(StoreError::InvalidRequest("empty grantee".to_string()));
        }

        let mut backing = self.lock()?;
        if backing.failing_shares > 0 {
            backing.failing_shares -= 1;
            return Err(StoreError::Backend("injected share failure".to_string()));
        }

        // Sharing with yourself is a no-op; repeated grants collapse in the set
        if grantee != &self.client_id {
            backing.grants.insert(Grant {
                writer: self.client_id.clone(),
                record_type: record_type.to_string(),
                reader: grantee.clone(),
            });
        }

        Ok(())
    }
}
