//! Search over the canonical task list.
//!
//! # Responsibility
//! - Derive the filtered, read-only view the list screen renders.
//! - Classify empty views for placeholder messaging.

pub mod projection;
