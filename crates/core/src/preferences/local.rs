//! Local preferences store
//!
//! The singleton record lives under one storage entry; an absent entry
//! means the defaults have never been persisted yet.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::model::Preferences;
use super::repository::PreferencesStore;
use crate::local::{simulate_latency, Storage, PREFERENCES_KEY};
use crate::Result;

/// Preferences store backed by local keyed-entry storage
pub struct LocalPreferencesStore {
    storage: Arc<Storage>,
    latency: Option<Duration>,
}

impl LocalPreferencesStore {
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

    async fn load(&self) -> Result<Option<Preferences>> {
        match self.storage.get(PREFERENCES_KEY).await {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, preferences: &Preferences) -> Result<()> {
        let raw = serde_json::to_string(preferences)?;
        self.storage.put(PREFERENCES_KEY, raw).await;
        Ok(())
    }

    /// Load the record, creating and persisting the default when absent
    async fn load_or_create(&self) -> Result<Preferences> {
        if let Some(preferences) = self.load().await? {
            return Ok(preferences);
        }
        let preferences = Preferences::new_default();
        self.save(&preferences).await?;
        Ok(preferences)
    }
}

#[async_trait]
impl PreferencesStore for LocalPreferencesStore {
    async fn get(&self) -> Result<Preferences> {
        simulate_latency(self.latency).await;
        self.load_or_create().await
    }

    async fn update_name(&self, name: &str) -> Result<Preferences> {
        simulate_latency(self.latency).await;
        let mut preferences = self.load_or_create().await?;
        preferences.name = name.trim().to_string();
        self.save(&preferences).await?;
        Ok(preferences)
    }

    async fn update_theme(&self, theme: &str) -> Result<Preferences> {
        simulate_latency(self.latency).await;
        let mut preferences = self.load_or_create().await?;
        preferences.theme = theme.to_string();
        self.save(&preferences).await?;
        Ok(preferences)
    }

    async fn reset(&self) -> Result<Preferences> {
        simulate_latency(self.latency).await;
        let mut preferences = self.load_or_create().await?;
        preferences.reset();
        self.save(&preferences).await?;
        Ok(preferences)
    }
}
