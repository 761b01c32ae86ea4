//! Record-storage HTTP client
//!
//! Thin client for the remote record-storage backend. One instance is
//! built per process and shared by every store that needs it.

use std::fmt;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Connection settings for the record-storage backend
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub project_id: String,
    pub public_key: String,
}

/// A record id as the backend reports it (number or string)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Rebuild a wire id from its string form
    pub fn parse(id: &str) -> Self {
        match id.parse::<i64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(id.to_string()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Sort direction for a fetch
#[derive(Debug, Clone, Copy, Serialize)]
pub enum SortType {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

/// One ordering clause of a fetch
#[derive(Debug, Clone, Serialize)]
pub struct OrderBy {
    #[serde(rename = "fieldName")]
    pub field_name: &'static str,
    #[serde(rename = "SortType")]
    pub sort_type: SortType,
}

/// Paging window of a fetch
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PagingInfo {
    pub limit: u32,
    pub offset: u32,
}

/// Parameters for a collection fetch
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchParams {
    pub fields: Vec<&'static str>,
    #[serde(rename = "orderBy", skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
    #[serde(rename = "pagingInfo", skip_serializing_if = "Option::is_none")]
    pub paging_info: Option<PagingInfo>,
}

/// Response envelope carrying a single data payload
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

/// Response envelope carrying per-record results
#[derive(Debug, Deserialize)]
struct BulkEnvelope<T> {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    results: Option<Vec<RecordResult<T>>>,
}

#[derive(Debug, Deserialize)]
struct RecordResult<T> {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

/// Body for a fetch-by-id request
#[derive(Debug, Serialize)]
struct ByIdParams {
    fields: Vec<&'static str>,
}

/// Client for the record-storage backend
pub struct RecordClient {
    client: Client,
    config: RemoteConfig,
}

impl RecordClient {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            client: Client::builder()
                .build()
                .unwrap_or_else(|_| Client::new()),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/api/records/{}",
            self.config.base_url.trim_end_matches('/'),
            path
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("x-project-id", &self.config.project_id)
            .header("x-public-key", &self.config.public_key)
    }

    /// Fetch records from a collection
    pub async fn fetch_records<T: DeserializeOwned>(
        &self,
        collection: &str,
        params: &FetchParams,
    ) -> Result<Vec<T>> {
        debug!("Fetching records from collection '{}'", collection);
        let res = self
            .request(self.client.post(self.url(&format!("{}/fetch", collection))))
            .json(params)
            .send()
            .await?;
        let envelope: Envelope<Vec<T>> = Self::read_envelope(res).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Fetch a single record by id
    ///
    /// A missing record (HTTP 404 or a success envelope without data) is
    /// `NotFound`.
    pub async fn get_record_by_id<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        fields: &[&'static str],
    ) -> Result<T> {
        debug!("Fetching record {} from collection '{}'", id, collection);
        let res = self
            .request(
                self.client
                    .post(self.url(&format!("{}/{}/fetch", collection, id))),
            )
            .json(&ByIdParams {
                fields: fields.to_vec(),
            })
            .send()
            .await?;

        if res.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!(
                "Record {} not found in '{}'",
                id, collection
            )));
        }

        let envelope: Envelope<T> = Self::read_envelope(res).await?;
        envelope.data.ok_or_else(|| {
            Error::NotFound(format!("Record {} not found in '{}'", id, collection))
        })
    }

    /// Create a single record; a per-record failure means the backend
    /// rejected the write
    pub async fn create_record<R: Serialize, T: DeserializeOwned>(
        &self,
        collection: &str,
        record: &R,
    ) -> Result<T> {
        debug!("Creating record in collection '{}'", collection);
        let res = self
            .request(self.client.post(self.url(collection)))
            .json(&serde_json::json!({ "records": [record] }))
            .send()
            .await?;
        let envelope: BulkEnvelope<T> = Self::read_bulk_envelope(res).await?;
        let result = Self::first_result(envelope, Error::Validation)?;
        result
            .data
            .ok_or_else(|| Error::Transport("Backend result had no data".to_string()))
    }

    /// Update a single record; a per-record failure means the id was
    /// unknown to the backend
    pub async fn update_record<R: Serialize, T: DeserializeOwned>(
        &self,
        collection: &str,
        record: &R,
    ) -> Result<T> {
        debug!("Updating record in collection '{}'", collection);
        let res = self
            .request(self.client.patch(self.url(collection)))
            .json(&serde_json::json!({ "records": [record] }))
            .send()
            .await?;
        let envelope: BulkEnvelope<T> = Self::read_bulk_envelope(res).await?;
        let result = Self::first_result(envelope, Error::NotFound)?;
        result
            .data
            .ok_or_else(|| Error::Transport("Backend result had no data".to_string()))
    }

    /// Delete a single record; a per-record failure means the id was
    /// unknown to the backend
    pub async fn delete_record(&self, collection: &str, id: RecordId) -> Result<()> {
        debug!("Deleting record {} from collection '{}'", id, collection);
        let res = self
            .request(self.client.delete(self.url(collection)))
            .json(&serde_json::json!({ "RecordIds": [id] }))
            .send()
            .await?;
        let envelope: BulkEnvelope<serde_json::Value> = Self::read_bulk_envelope(res).await?;
        Self::first_result(envelope, Error::NotFound).map(|_| ())
    }

    async fn read_envelope<T: DeserializeOwned>(res: reqwest::Response) -> Result<Envelope<T>> {
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(Error::Transport(format!(
                "Backend returned {}: {}",
                status, body
            )));
        }
        let envelope: Envelope<T> = res.json().await?;
        if !envelope.success {
            return Err(Error::Transport(
                envelope
                    .message
                    .unwrap_or_else(|| "Backend reported failure".to_string()),
            ));
        }
        Ok(envelope)
    }

    async fn read_bulk_envelope<T: DeserializeOwned>(
        res: reqwest::Response,
    ) -> Result<BulkEnvelope<T>> {
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(Error::Transport(format!(
                "Backend returned {}: {}",
                status, body
            )));
        }
        let envelope: BulkEnvelope<T> = res.json().await?;
        if !envelope.success {
            return Err(Error::Transport(
                envelope
                    .message
                    .unwrap_or_else(|| "Backend reported failure".to_string()),
            ));
        }
        Ok(envelope)
    }

    fn first_result<T>(
        envelope: BulkEnvelope<T>,
        on_failure: impl FnOnce(String) -> Error,
    ) -> Result<RecordResult<T>> {
        let result = envelope
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| Error::Transport("Backend returned no results".to_string()))?;

        if !result.success {
            return Err(on_failure(
                result
                    .message
                    .unwrap_or_else(|| "Record operation failed".to_string()),
            ));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> RecordClient {
        RecordClient::new(RemoteConfig {
            base_url: server.uri(),
            project_id: "project-1".to_string(),
            public_key: "key-1".to_string(),
        })
    }

    #[test]
    fn test_record_id_parse_and_display() {
        assert_eq!(RecordId::parse("42"), RecordId::Number(42));
        assert_eq!(RecordId::parse("abc-1"), RecordId::Text("abc-1".to_string()));
        assert_eq!(RecordId::Number(42).to_string(), "42");
        assert_eq!(RecordId::Text("abc-1".to_string()).to_string(), "abc-1");
    }

    #[tokio::test]
    async fn test_fetch_records_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/records/task/fetch"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [{"Id": 1}, {"Id": 2}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let records: Vec<serde_json::Value> = client
            .fetch_records("task", &FetchParams::default())
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_sends_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/records/task/fetch"))
            .and(wiremock::matchers::header("x-project-id", "project-1"))
            .and(wiremock::matchers::header("x-public-key", "key-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true, "data": []})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let records: Vec<serde_json::Value> = client
            .fetch_records("task", &FetchParams::default())
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_envelope_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/records/task/fetch"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "collection offline"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result: Result<Vec<serde_json::Value>> =
            client.fetch_records("task", &FetchParams::default()).await;
        match result.unwrap_err() {
            Error::Transport(message) => assert_eq!(message, "collection offline"),
            e => panic!("Expected Transport error, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_http_error_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/records/task/fetch"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result: Result<Vec<serde_json::Value>> =
            client.fetch_records("task", &FetchParams::default()).await;
        assert!(matches!(result, Err(Error::Transport(_))));
    }

    #[tokio::test]
    async fn test_get_by_id_404_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/records/task/9/fetch"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result: Result<serde_json::Value> =
            client.get_record_by_id("task", "9", &["title"]).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_record_failure_is_validation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/records/task"))
            .and(body_partial_json(json!({"records": [{"title": "Bad"}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "results": [{"success": false, "message": "title too long"}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result: Result<serde_json::Value> = client
            .create_record("task", &json!({"title": "Bad"}))
            .await;
        match result.unwrap_err() {
            Error::Validation(message) => assert_eq!(message, "title too long"),
            e => panic!("Expected Validation error, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_update_record_failure_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/records/task"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "results": [{"success": false, "message": "no such record"}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result: Result<serde_json::Value> = client
            .update_record("task", &json!({"Id": 9, "completed": true}))
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_record_success() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/records/task"))
            .and(body_partial_json(json!({"RecordIds": [7]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "results": [{"success": true}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        client
            .delete_record("task", RecordId::Number(7))
            .await
            .unwrap();
    }
}
