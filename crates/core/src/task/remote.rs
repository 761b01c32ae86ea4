//! Remote task store
//!
//! Maps the task contract onto the record-storage backend's `task`
//! collection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::model::{sort_for_display, NewTask, Task, TaskPatch};
use super::repository::TaskStore;
use crate::remote::{FetchParams, OrderBy, RecordClient, RecordId, SortType};
use crate::Result;

const COLLECTION: &str = "task";

/// Fields requested on reads; everything past `created_at` is
/// backend-managed metadata
const READ_FIELDS: [&str; 11] = [
    "Name",
    "Tags",
    "Owner",
    "CreatedOn",
    "CreatedBy",
    "ModifiedOn",
    "ModifiedBy",
    "title",
    "description",
    "completed",
    "created_at",
];

/// A task record as the backend returns it
#[derive(Debug, Deserialize)]
struct TaskRecord {
    #[serde(rename = "Id")]
    id: RecordId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    completed: bool,
    created_at: DateTime<Utc>,
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title,
            description: record.description,
            completed: record.completed,
            created_at: record.created_at,
        }
    }
}

/// Updateable fields sent on create
#[derive(Debug, Serialize)]
struct NewTaskRecord<'a> {
    title: &'a str,
    description: &'a str,
    completed: bool,
    created_at: DateTime<Utc>,
}

/// Updateable fields sent on update; only the present ones are serialized
#[derive(Debug, Serialize)]
struct TaskRecordPatch {
    #[serde(rename = "Id")]
    id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed: Option<bool>,
}

/// Task store backed by the remote record-storage backend
pub struct RemoteTaskStore {
    client: Arc<RecordClient>,
}

impl RemoteTaskStore {
    pub fn new(client: Arc<RecordClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TaskStore for RemoteTaskStore {
    async fn list(&self) -> Result<Vec<Task>> {
        let params = FetchParams {
            fields: READ_FIELDS.to_vec(),
            order_by: vec![
                OrderBy {
                    field_name: "completed",
                    sort_type: SortType::Asc,
                },
                OrderBy {
                    field_name: "created_at",
                    sort_type: SortType::Desc,
                },
            ],
            paging_info: None,
        };

        let records: Vec<TaskRecord> = self.client.fetch_records(COLLECTION, &params).await?;
        let mut tasks: Vec<Task> = records.into_iter().map(Task::from).collect();
        // The ordering is this store's contract, not the backend's
        sort_for_display(&mut tasks);
        Ok(tasks)
    }

    async fn get(&self, id: &str) -> Result<Task> {
        let record: TaskRecord = self
            .client
            .get_record_by_id(COLLECTION, id, &READ_FIELDS)
            .await?;
        Ok(record.into())
    }

    async fn create(&self, new_task: NewTask) -> Result<Task> {
        let record = NewTaskRecord {
            title: &new_task.title,
            description: new_task.description.as_deref().unwrap_or(""),
            completed: false,
            created_at: Utc::now(),
        };

        let created: TaskRecord = self.client.create_record(COLLECTION, &record).await?;
        Ok(created.into())
    }

    async fn update(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        let record = TaskRecordPatch {
            id: RecordId::parse(id),
            title: patch.title,
            description: patch.description,
            completed: patch.completed,
        };

        let updated: TaskRecord = self.client.update_record(COLLECTION, &record).await?;
        Ok(updated.into())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .delete_record(COLLECTION, RecordId::parse(id))
            .await
    }
}
