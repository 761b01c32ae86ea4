//! Remote preferences store
//!
//! Maps the preferences contract onto the record-storage backend's
//! `user_preference` collection. The display name travels in the
//! backend-managed `Name` field.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::model::{Preferences, DEFAULT_THEME};
use super::repository::PreferencesStore;
use crate::remote::{FetchParams, PagingInfo, RecordClient, RecordId};
use crate::Result;

const COLLECTION: &str = "user_preference";

const READ_FIELDS: [&str; 8] = [
    "Name",
    "Tags",
    "Owner",
    "CreatedOn",
    "CreatedBy",
    "ModifiedOn",
    "ModifiedBy",
    "theme",
];

/// A preferences record as the backend returns it
#[derive(Debug, Deserialize)]
struct PreferenceRecord {
    #[serde(rename = "Id")]
    id: RecordId,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(default = "default_theme")]
    theme: String,
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

impl From<PreferenceRecord> for Preferences {
    fn from(record: PreferenceRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name,
            theme: record.theme,
        }
    }
}

/// Updateable fields sent on create
#[derive(Debug, Serialize)]
struct NewPreferenceRecord<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    theme: &'a str,
}

/// Updateable fields sent on update; only the present ones are serialized
#[derive(Debug, Serialize)]
struct PreferenceRecordPatch<'a> {
    #[serde(rename = "Id")]
    id: RecordId,
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    theme: Option<&'a str>,
}

/// Preferences store backed by the remote record-storage backend
pub struct RemotePreferencesStore {
    client: Arc<RecordClient>,
}

impl RemotePreferencesStore {
    pub fn new(client: Arc<RecordClient>) -> Self {
        Self { client }
    }

    async fn patch(
        &self,
        id: &str,
        name: Option<&str>,
        theme: Option<&str>,
    ) -> Result<Preferences> {
        let record = PreferenceRecordPatch {
            id: RecordId::parse(id),
            name,
            theme,
        };
        let updated: PreferenceRecord = self.client.update_record(COLLECTION, &record).await?;
        Ok(updated.into())
    }
}

#[async_trait]
impl PreferencesStore for RemotePreferencesStore {
    async fn get(&self) -> Result<Preferences> {
        let params = FetchParams {
            fields: READ_FIELDS.to_vec(),
            order_by: Vec::new(),
            paging_info: Some(PagingInfo {
                limit: 1,
                offset: 0,
            }),
        };

        let mut records: Vec<PreferenceRecord> =
            self.client.fetch_records(COLLECTION, &params).await?;

        if let Some(record) = records.drain(..).next() {
            return Ok(record.into());
        }

        // No record yet: create the default one
        let created: PreferenceRecord = self
            .client
            .create_record(
                COLLECTION,
                &NewPreferenceRecord {
                    name: "",
                    theme: DEFAULT_THEME,
                },
            )
            .await?;
        Ok(created.into())
    }

    async fn update_name(&self, name: &str) -> Result<Preferences> {
        let current = self.get().await?;
        self.patch(&current.id, Some(name.trim()), None).await
    }

    async fn update_theme(&self, theme: &str) -> Result<Preferences> {
        let current = self.get().await?;
        self.patch(&current.id, None, Some(theme)).await
    }

    async fn reset(&self) -> Result<Preferences> {
        let current = self.get().await?;
        self.patch(&current.id, Some(""), Some(DEFAULT_THEME)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RemoteConfig;
    use crate::Error;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_store(server: &MockServer) -> RemotePreferencesStore {
        RemotePreferencesStore::new(Arc::new(RecordClient::new(RemoteConfig {
            base_url: server.uri(),
            project_id: "project-1".to_string(),
            public_key: "key-1".to_string(),
        })))
    }

    async fn mount_fetch(server: &MockServer, data: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/api/records/user_preference/fetch"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true, "data": data})),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_get_returns_existing_record() {
        let server = MockServer::start().await;
        mount_fetch(&server, json!([{"Id": 5, "Name": "Alice", "theme": "dark"}])).await;

        let store = test_store(&server);
        let prefs = store.get().await.unwrap();
        assert_eq!(prefs.id, "5");
        assert_eq!(prefs.name, "Alice");
        assert_eq!(prefs.theme, "dark");
    }

    #[tokio::test]
    async fn test_get_defaults_missing_fields() {
        let server = MockServer::start().await;
        mount_fetch(&server, json!([{"Id": 5}])).await;

        let store = test_store(&server);
        let prefs = store.get().await.unwrap();
        assert_eq!(prefs.name, "");
        assert_eq!(prefs.theme, "light");
    }

    #[tokio::test]
    async fn test_get_creates_default_record_when_none_exists() {
        let server = MockServer::start().await;
        mount_fetch(&server, json!([])).await;
        Mock::given(method("POST"))
            .and(path("/api/records/user_preference"))
            .and(body_partial_json(json!({
                "records": [{"Name": "", "theme": "light"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "results": [{
                    "success": true,
                    "data": {"Id": 1, "Name": "", "theme": "light"}
                }]
            })))
            .mount(&server)
            .await;

        let store = test_store(&server);
        let prefs = store.get().await.unwrap();
        assert_eq!(prefs.id, "1");
        assert_eq!(prefs.name, "");
        assert_eq!(prefs.theme, "light");
    }

    #[tokio::test]
    async fn test_update_name_trims_and_patches_existing_record() {
        let server = MockServer::start().await;
        mount_fetch(&server, json!([{"Id": 5, "Name": "", "theme": "light"}])).await;
        Mock::given(method("PATCH"))
            .and(path("/api/records/user_preference"))
            .and(body_partial_json(json!({
                "records": [{"Id": 5, "Name": "Alice"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "results": [{
                    "success": true,
                    "data": {"Id": 5, "Name": "Alice", "theme": "light"}
                }]
            })))
            .mount(&server)
            .await;

        let store = test_store(&server);
        let prefs = store.update_name("  Alice  ").await.unwrap();
        assert_eq!(prefs.name, "Alice");
    }

    #[tokio::test]
    async fn test_reset_patches_both_fields() {
        let server = MockServer::start().await;
        mount_fetch(&server, json!([{"Id": 5, "Name": "Alice", "theme": "dark"}])).await;
        Mock::given(method("PATCH"))
            .and(path("/api/records/user_preference"))
            .and(body_partial_json(json!({
                "records": [{"Id": 5, "Name": "", "theme": "light"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "results": [{
                    "success": true,
                    "data": {"Id": 5, "Name": "", "theme": "light"}
                }]
            })))
            .mount(&server)
            .await;

        let store = test_store(&server);
        let prefs = store.reset().await.unwrap();
        assert_eq!(prefs.name, "");
        assert_eq!(prefs.theme, "light");
    }

    #[tokio::test]
    async fn test_fetch_failure_surfaces_to_caller() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/records/user_preference/fetch"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "collection offline"
            })))
            .mount(&server)
            .await;

        let store = test_store(&server);
        let result = store.get().await;
        assert!(matches!(result, Err(Error::Transport(_))));
    }
}
