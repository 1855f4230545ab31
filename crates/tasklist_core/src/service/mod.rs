//! Task list use-case services.
//!
//! # Responsibility
//! - Own the canonical task list and the only legal mutations of it.
//! - Keep UI/FFI layers decoupled from storage and serialization details.

pub mod confirmation;
pub mod id_gen;
pub mod task_list_store;
