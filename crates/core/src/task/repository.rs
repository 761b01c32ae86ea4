//! Task store trait
//!
//! Defines the interface for task storage operations. Both the remote
//! record-storage backend and the local keyed-entry backend implement it;
//! call sites never branch on backend identity.

use async_trait::async_trait;

use super::model::{NewTask, Task, TaskPatch};
use crate::Result;

/// Store interface for task CRUD operations
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// List all tasks, incomplete before completed, newest first within
    /// each group
    async fn list(&self) -> Result<Vec<Task>>;

    /// Get a task by id; fails with `NotFound` when absent
    async fn get(&self, id: &str) -> Result<Task>;

    /// Create a new task and return the stored record
    async fn create(&self, new_task: NewTask) -> Result<Task>;

    /// Apply a partial update; fails with `NotFound` when the id is unknown
    async fn update(&self, id: &str, patch: TaskPatch) -> Result<Task>;

    /// Permanently remove a task; fails with `NotFound` when the id is
    /// unknown
    async fn delete(&self, id: &str) -> Result<()>;
}
