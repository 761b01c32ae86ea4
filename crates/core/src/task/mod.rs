//! Task module
//!
//! Task model, store trait, and the two backend implementations.

mod local;
mod model;
mod remote;
mod repository;

pub use local::LocalTaskStore;
pub use model::*;
pub use remote::RemoteTaskStore;
pub use repository::TaskStore;
