//! Task domain model.
//!
//! # Responsibility
//! - Define the single record rendered by the list screen.
//! - Normalize user-entered titles before a task is created.
//!
//! # Invariants
//! - `title` is trimmed and non-empty for every task created in-process.
//! - `is_done` starts as `false`.
//! - The serialized shape is `{"id", "title", "isDone"}`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Task identifier. Creation-time milliseconds, collision-checked by the
/// store's id generator.
pub type TaskId = i64;

/// Validation error for task construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty after trimming.
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// One to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Serialized as `isDone` to stay compatible with existing snapshots.
    #[serde(rename = "isDone")]
    pub is_done: bool,
}

impl Task {
    /// Creates an open task from raw user input.
    ///
    /// # Errors
    /// - Returns `TaskValidationError::EmptyTitle` when `raw_title` is blank.
    pub fn new(id: TaskId, raw_title: &str) -> Result<Self, TaskValidationError> {
        let title = normalize_title(raw_title).ok_or(TaskValidationError::EmptyTitle)?;
        Ok(Self {
            id,
            title,
            is_done: false,
        })
    }

    /// Flips completion state.
    pub fn toggle(&mut self) {
        self.is_done = !self.is_done;
    }
}

/// Trims user input; returns `None` for empty or whitespace-only text.
pub fn normalize_title(raw_title: &str) -> Option<String> {
    let trimmed = raw_title.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
