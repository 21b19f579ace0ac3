//! HTTP client for a running record store service.
//!
//! This module provides an implementation of `RecordStore` that talks to
//! `rps-store-service` over JSON. The caller identity travels in the
//! `X-Client-Id` header on every request.

use super::traits::{RecordStore, StoreError};
use crate::record::{ClientId, Record, SearchQuery};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{
    de::{DeserializeOwned, IgnoredAny},
    Deserialize, Serialize,
};
use std::collections::BTreeMap;

/// Header carrying the caller identity
pub const CLIENT_ID_HEADER: &str = "X-Client-Id";

#[derive(Serialize)]
struct WriteRequest<'a> {
    record_type: &'a str,
    data: BTreeMap<String, String>,
    plain: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct ShareRequest<'a> {
    record_type: &'a str,
    grantee: &'a ClientId,
}

#[derive(Deserialize)]
struct SearchResponse {
    records: Vec<Record>,
}

/// HTTP client for the record store service
pub struct HttpRecordStore {
    /// HTTP client
    client: Client,
    /// Service base URL, without trailing slash
    base_url: String,
    client_id: ClientId,
}

impl HttpRecordStore {
    /// Create a new client acting as `client_id`
    pub fn new(base_url: impl Into<String>, client_id: impl Into<ClientId>) -> Self {
        Self::with_client(Client::new(), base_url, client_id)
    }

    /// Create a client reusing an existing reqwest client (timeouts, proxies, ...)
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        client_id: impl Into<ClientId>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            client_id: client_id.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body and decode the JSON answer
    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, StoreError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, client_id = %self.client_id, "store request");

        let response = self
            .client
            .post(&url)
            .header(CLIENT_ID_HEADER, self.client_id.as_str())
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::debug!(%url, %status, %message, "store request rejected");
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    StoreError::Unauthorized(message)
                }
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    StoreError::InvalidRequest(message)
                }
                _ => StoreError::Backend(format!("{}: {}", status, message)),
            });
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::NetworkError(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Record>, StoreError> {
        let response: SearchResponse = self.post("/records/search", query).await?;
        Ok(response.records)
    }

    async fn write(
        &self,
        record_type: &str,
        data: BTreeMap<String, String>,
        plain: BTreeMap<String, String>,
    ) -> Result<Record, StoreError> {
        let request = WriteRequest {
            record_type,
            data,
            plain,
        };
        self.post("/records", &request).await
    }

    async fn share(&self, record_type: &str, grantee: &ClientId) -> Result<(), StoreError> {
        let request = ShareRequest {
            record_type,
            grantee,
        };
        let _: IgnoredAny = self.post("/shares", &request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store = HttpRecordStore::new("http://localhost:3000/", "alice");
        assert_eq!(store.base_url(), "http://localhost:3000");
        assert_eq!(store.client_id(), &ClientId::from("alice"));
    }

    #[test]
    fn test_share_request_serialization() {
        let grantee = ClientId::from("judge");
        let json = serde_json::to_value(ShareRequest {
            record_type: "rps-move",
            grantee: &grantee,
        })
        .unwrap();
        assert_eq!(json["record_type"], "rps-move");
        assert_eq!(json["grantee"], "judge");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        // Port 9 (discard) is not expected to run an HTTP server
        let store = HttpRecordStore::new("http://127.0.0.1:9", "alice");
        let result = store
            .search(&SearchQuery::new("rps-move", "round-number", "1"))
            .await;
        assert!(matches!(result, Err(StoreError::NetworkError(_))));
    }
}
