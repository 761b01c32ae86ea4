//! Preferences store trait

use async_trait::async_trait;

use super::model::Preferences;
use crate::Result;

/// Store interface for the per-user preferences singleton
#[async_trait]
pub trait PreferencesStore: Send + Sync {
    /// Read the preferences record, lazily creating the default
    /// `{name: "", theme: "light"}` record when none exists
    async fn get(&self) -> Result<Preferences>;

    /// Store the trimmed display name and return the updated record
    async fn update_name(&self, name: &str) -> Result<Preferences>;

    /// Store the theme verbatim (the caller owns theme validation)
    async fn update_theme(&self, theme: &str) -> Result<Preferences>;

    /// Restore `{name: "", theme: "light"}` and persist
    async fn reset(&self) -> Result<Preferences>;
}
