//! Backend selection and store construction
//!
//! The backing medium is chosen once at startup; call sites receive the
//! store traits and never branch on backend identity.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::local::Storage;
use crate::preferences::{LocalPreferencesStore, PreferencesStore, RemotePreferencesStore};
use crate::remote::{RecordClient, RemoteConfig};
use crate::task::{LocalTaskStore, RemoteTaskStore, TaskStore};
use crate::{Error, Result};

const DEFAULT_DATA_PATH: &str = "taskflow.json";

/// Settings for the local keyed-entry backend
#[derive(Debug, Clone)]
pub struct LocalConfig {
    /// Path of the storage file
    pub path: PathBuf,
    /// Optional fixed delay per operation (demo/testing)
    pub latency: Option<Duration>,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATA_PATH),
            latency: None,
        }
    }
}

/// Which backing medium the stores use
#[derive(Debug, Clone)]
pub enum BackendConfig {
    Remote(RemoteConfig),
    Local(LocalConfig),
}

impl BackendConfig {
    /// Read the backend selection from `TASKFLOW_*` environment variables
    ///
    /// `TASKFLOW_BACKEND` picks `remote` or `local` (the default). The
    /// remote backend requires `TASKFLOW_API_URL`, `TASKFLOW_PROJECT_ID`
    /// and `TASKFLOW_PUBLIC_KEY`; the local backend honors
    /// `TASKFLOW_DATA_PATH` and `TASKFLOW_LOCAL_LATENCY_MS`.
    pub fn from_env() -> Result<Self> {
        match std::env::var("TASKFLOW_BACKEND").as_deref() {
            Ok("remote") => Ok(Self::Remote(RemoteConfig {
                base_url: require_env("TASKFLOW_API_URL")?,
                project_id: require_env("TASKFLOW_PROJECT_ID")?,
                public_key: require_env("TASKFLOW_PUBLIC_KEY")?,
            })),
            _ => {
                let path = std::env::var("TASKFLOW_DATA_PATH")
                    .ok()
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty())
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
                let latency = std::env::var("TASKFLOW_LOCAL_LATENCY_MS")
                    .ok()
                    .and_then(|value| value.trim().parse::<u64>().ok())
                    .filter(|ms| *ms > 0)
                    .map(Duration::from_millis);
                Ok(Self::Local(LocalConfig { path, latency }))
            }
        }
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            Error::Validation(format!("{} must be set for the remote backend", name))
        })
}

/// The two stores of the data layer, built against one backing medium
#[derive(Clone)]
pub struct Stores {
    pub tasks: Arc<dyn TaskStore>,
    pub preferences: Arc<dyn PreferencesStore>,
}

impl Stores {
    /// Build both stores against the configured backend
    ///
    /// The remote backend shares a single [`RecordClient`] between the
    /// stores; the local backend shares one [`Storage`].
    pub async fn build(config: BackendConfig) -> Result<Self> {
        match config {
            BackendConfig::Remote(remote) => {
                let client = Arc::new(RecordClient::new(remote));
                Ok(Self {
                    tasks: Arc::new(RemoteTaskStore::new(client.clone())),
                    preferences: Arc::new(RemotePreferencesStore::new(client)),
                })
            }
            BackendConfig::Local(local) => {
                let storage = Arc::new(Storage::open(&local.path).await?);
                let mut tasks = LocalTaskStore::new(storage.clone());
                let mut preferences = LocalPreferencesStore::new(storage);
                if let Some(latency) = local.latency {
                    tasks = tasks.with_latency(latency);
                    preferences = preferences.with_latency(latency);
                }
                Ok(Self {
                    tasks: Arc::new(tasks),
                    preferences: Arc::new(preferences),
                })
            }
        }
    }
}
