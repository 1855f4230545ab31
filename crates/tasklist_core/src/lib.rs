//! Core domain logic for the task list app.
//! This crate owns the canonical task list and its persistence contract.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod repo;
pub mod search;
pub mod service;

pub use config::{StoreConfig, DEFAULT_STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use repo::kv_repo::{
    InMemoryKeyValueStore, KeyValueStore, KvError, KvResult, SqliteKeyValueStore,
};
pub use repo::snapshot::{decode_tasks, encode_tasks, SnapshotError};
pub use search::projection::{project, EmptyState};
pub use service::confirmation::{Confirmation, DeleteRequest};
pub use service::id_gen::TaskIdGenerator;
pub use service::task_list_store::{ReorderError, TaskListStore};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
