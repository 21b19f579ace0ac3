//! Record types shared by every store implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque identity of a party talking to the store.
///
/// Conventionally a UUID, but only equality is ever relied upon.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for ClientId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ClientId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique record identifier assigned by the store on write
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Create a new random record ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Store-managed metadata of a record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    pub record_id: RecordId,
    /// Identity that wrote the record
    pub writer_id: ClientId,
    pub record_type: String,
    /// Unencrypted metadata, the only part of a record the store can match on
    pub plain: BTreeMap<String, String>,
    pub created: DateTime<Utc>,
}

/// A record as returned by the store: metadata plus decrypted payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub meta: RecordMeta,
    pub data: BTreeMap<String, String>,
}

impl Record {
    pub fn id(&self) -> RecordId {
        self.meta.record_id
    }

    /// Payload field lookup
    pub fn field(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Plain metadata lookup
    pub fn plain(&self, key: &str) -> Option<&str> {
        self.meta.plain.get(key).map(String::as_str)
    }
}

/// Match records of one type whose plain metadata `key` equals `value`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub record_type: String,
    pub key: String,
    pub value: String,
}

impl SearchQuery {
    pub fn new(
        record_type: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            record_type: record_type.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Does this query select the given record?
    pub fn matches(&self, record: &Record) -> bool {
        record.meta.record_type == self.record_type
            && record.plain(&self.key) == Some(self.value.as_str())
    }
}
