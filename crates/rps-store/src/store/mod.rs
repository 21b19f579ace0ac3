//! Record store client abstraction.

mod http;
mod mock;
mod traits;

pub use http::{HttpRecordStore, CLIENT_ID_HEADER};
pub use mock::MemoryRecordStore;
pub use traits::{RecordStore, StoreError};
