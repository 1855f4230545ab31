//! Fire-and-forget persistence of task list snapshots.
//!
//! # Responsibility
//! - Move snapshot writes off the caller thread.
//! - Keep storage failures local: logged, never returned to callers.
//!
//! # Invariants
//! - Snapshots are applied in issue order; the last applied write wins.
//! - Issuing a write never blocks on storage.

pub mod writer;
