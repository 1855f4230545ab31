//! Storage contracts and task list snapshot persistence.
//!
//! # Responsibility
//! - Define the key-value contract the core persists through.
//! - Keep SQL and JSON details out of the store service.
//!
//! # Invariants
//! - Storage failures are reported as `KvError`, never as panics.

pub mod kv_repo;
pub mod snapshot;
