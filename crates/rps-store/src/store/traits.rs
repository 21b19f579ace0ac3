//! Record store trait definition.

use crate::record::{ClientId, Record, SearchQuery};
use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors from record store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Trait for the shared, append-only record store
///
/// The store offers no transactions and no conditional writes: every call is
/// a single independent operation. Implementations can be:
/// - MemoryRecordStore for tests and the development store service
/// - HttpRecordStore for agents talking to a running store service
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Identity this handle reads and writes as
    fn client_id(&self) -> &ClientId;

    /// All records matching the query that are visible to this client:
    /// its own records plus those whose writer shared the record type with it.
    /// Order is unspecified.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Record>, StoreError>;

    /// Append a record
    async fn write(
        &self,
        record_type: &str,
        data: BTreeMap<String, String>,
        plain: BTreeMap<String, String>,
    ) -> Result<Record, StoreError>;

    /// Grant `grantee` read access to every record of `record_type` written by this client
    async fn share(&self, record_type: &str, grantee: &ClientId) -> Result<(), StoreError>;
}
