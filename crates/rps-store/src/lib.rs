//! RPS Store Library
//!
//! Shared primitives for talking to the append-only record store:
//! - Record, RecordMeta, RecordId and ClientId
//! - RecordStore trait, MemoryRecordStore and HttpRecordStore

pub mod record;
pub mod store;

pub use record::{ClientId, Record, RecordId, RecordMeta, SearchQuery};
pub use store::{HttpRecordStore, MemoryRecordStore, RecordStore, StoreError, CLIENT_ID_HEADER};
