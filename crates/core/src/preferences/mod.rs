//! Preferences module
//!
//! Per-user preferences record (display name, theme), store trait, and the
//! two backend implementations.

mod local;
mod model;
mod remote;
mod repository;

pub use local::LocalPreferencesStore;
pub use model::*;
pub use remote::RemotePreferencesStore;
pub use repository::PreferencesStore;
