//! Application state management.

use rps_store::{ClientId, MemoryRecordStore};

/// Shared application state: one store, accessed as whichever client is calling
#[derive(Clone)]
pub struct AppState {
    store: MemoryRecordStore,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_store(MemoryRecordStore::new("rps-store-service"))
    }

    /// Serve an existing store (tests inspect it directly)
    pub fn with_store(store: MemoryRecordStore) -> Self {
        Self { store }
    }

    /// Store handle acting as `client_id`
    pub fn as_client(&self, client_id: ClientId) -> MemoryRecordStore {
        self.store.connect(client_id)
    }

    pub fn record_count(&self) -> usize {
        self.store.record_count()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
