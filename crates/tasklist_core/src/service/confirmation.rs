//! Confirmation-gated deletion.
//!
//! Deleting is two steps: the store hands out a [`DeleteRequest`] for the UI
//! to show, and the user's [`Confirmation`] is fed back through
//! [`crate::TaskListStore::resolve_delete`].

use crate::model::task::{Task, TaskId};

const DELETE_PROMPT_TITLE: &str = "Delete Todo";

/// The user's answer to a confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Cancelled,
}

impl Confirmation {
    pub fn from_confirmed(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Cancelled
        }
    }
}

/// Pending delete awaiting user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    task_id: TaskId,
    task_title: String,
}

impl DeleteRequest {
    pub(crate) fn for_task(task: &Task) -> Self {
        Self {
            task_id: task.id,
            task_title: task.title.clone(),
        }
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn prompt_title(&self) -> &'static str {
        DELETE_PROMPT_TITLE
    }

    pub fn prompt_message(&self) -> String {
        format!("Are you sure you want to delete \"{}\"?", self.task_title)
    }
}
