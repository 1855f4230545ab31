//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the canonical task record shared by store, storage and UI.
//!
//! # Invariants
//! - Every task is identified by an id unique within its list.
//! - Tasks are never created from an empty title.

pub mod task;
