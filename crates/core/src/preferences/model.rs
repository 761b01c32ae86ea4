//! User preferences model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default theme applied until the user picks one
pub const DEFAULT_THEME: &str = "light";

/// The per-user preferences record (singleton per account/session)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub id: String,
    /// Display name, empty until set
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

impl Preferences {
    /// The record created lazily on first read
    pub fn new_default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            theme: default_theme(),
        }
    }

    /// Restore defaults, keeping the record id
    pub fn reset(&mut self) {
        self.name.clear();
        self.theme = default_theme();
    }
}
