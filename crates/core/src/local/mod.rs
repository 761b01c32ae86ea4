//! Local on-device backend
//!
//! Keyed-entry storage shared by the local task and preferences stores,
//! plus the artificial-latency helper used by demo/testing configurations.

mod storage;

use std::time::Duration;

pub use storage::Storage;

/// Storage key for the serialized task collection
pub const TASKS_KEY: &str = "taskflow:tasks";

/// Storage key for the serialized preferences record
pub const PREFERENCES_KEY: &str = "taskflow:preferences";

/// Suspend for the configured artificial latency, if any
///
/// Stands in for the remote round-trip when the local backend is used in
/// demos and tests.
pub async fn simulate_latency(latency: Option<Duration>) {
    if let Some(duration) = latency {
        tokio::time::sleep(duration).await;
    }
}
