//! Local task store
//!
//! Keeps the whole task collection under one storage entry. Every write
//! reads the collection, mutates it in memory, and rewrites the entry.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::model::{sort_for_display, NewTask, Task, TaskPatch};
use super::repository::TaskStore;
use crate::local::{simulate_latency, Storage, TASKS_KEY};
use crate::{Error, Result};

/// Task store backed by local keyed-entry storage
pub struct LocalTaskStore {
    storage: Arc<Storage>,
    latency: Option<Duration>,
}

impl LocalTaskStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self {
            storage,
            latency: None,
        }
    }

    /// Add a fixed artificial delay before each operation
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    async fn load(&self) -> Result<Vec<Task>> {
        match self.storage.get(TASKS_KEY).await {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, tasks: &[Task]) -> Result<()> {
        let raw = serde_json::to_string(tasks)?;
        self.storage.put(TASKS_KEY, raw).await;
        Ok(())
    }
}

#[async_trait]
impl TaskStore for LocalTaskStore {
    async fn list(&self) -> Result<Vec<Task>> {
        simulate_latency(self.latency).await;
        let mut tasks = self.load().await?;
        sort_for_display(&mut tasks);
        Ok(tasks)
    }

    async fn get(&self, id: &str) -> Result<Task> {
        simulate_latency(self.latency).await;
        let tasks = self.load().await?;
        tasks
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("Task {} not found", id)))
    }

    async fn create(&self, new_task: NewTask) -> Result<Task> {
        simulate_latency(self.latency).await;
        let task = Task::new(new_task.title)
            .with_description(new_task.description.unwrap_or_default());

        let mut tasks = self.load().await?;
        tasks.push(task.clone());
        self.save(&tasks).await?;
        Ok(task)
    }

    async fn update(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        simulate_latency(self.latency).await;
        let mut tasks = self.load().await?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("Task {} not found", id)))?;
        task.apply(patch);
        let updated = task.clone();

        self.save(&tasks).await?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        simulate_latency(self.latency).await;
        let mut tasks = self.load().await?;
        let index = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("Task {} not found", id)))?;
        tasks.remove(index);

        self.save(&tasks).await?;
        Ok(())
    }
}
