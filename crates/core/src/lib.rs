//! Core data layer for TaskFlow
//!
//! This crate contains the data-access logic of the to-do application:
//! - Task store (list/get/create/update/delete)
//! - User preferences store (display name, theme)
//! - Remote record-storage and local keyed-entry backends
//!   behind the same store traits

pub mod config;
pub mod error;
pub mod local;
pub mod preferences;
pub mod remote;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
