//! Remote record-storage backend
//!
//! The shared HTTP client and wire types consumed by the remote task and
//! preferences stores.

mod client;

pub use client::{
    FetchParams, OrderBy, PagingInfo, RecordClient, RecordId, RemoteConfig, SortType,
};
