//! Task list store.
//!
//! # Responsibility
//! - Own the canonical ordered task list and the search query.
//! - Provide the only legal mutations: add, toggle, delete, reorder.
//! - Issue a snapshot write after every mutation without waiting for it.
//!
//! # Invariants
//! - A store only exists after hydration, so no mutation can land before the
//!   persisted list was loaded.
//! - Task ids are unique within the list.
//! - New tasks are prepended.
//! - Toggle and delete keep the relative order of untouched tasks.
//! - Reorder only permutes existing tasks; it never adds, drops or edits one.
//! - The query filters reads only; it never changes the canonical order.

use crate::config::StoreConfig;
use crate::model::task::{normalize_title, Task, TaskId};
use crate::persist::writer::SnapshotWriter;
use crate::repo::kv_repo::KeyValueStore;
use crate::repo::snapshot::hydrate_tasks;
use crate::search::projection::{empty_state, project, EmptyState};
use crate::service::confirmation::{Confirmation, DeleteRequest};
use crate::service::id_gen::TaskIdGenerator;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Rejected reorder input. The canonical list is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    /// New order has a different number of tasks than the current one.
    LengthMismatch { expected: usize, actual: usize },
    /// New order names a task that is not in the current list.
    UnknownTask(TaskId),
    /// New order names the same task more than once.
    DuplicateTask(TaskId),
}

impl Display for ReorderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LengthMismatch { expected, actual } => write!(
                f,
                "reorder expected {expected} task(s) but received {actual}"
            ),
            Self::UnknownTask(id) => write!(f, "reorder references unknown task: {id}"),
            Self::DuplicateTask(id) => write!(f, "reorder references task twice: {id}"),
        }
    }
}

impl Error for ReorderError {}

/// Owner of the canonical task list.
pub struct TaskListStore {
    tasks: Vec<Task>,
    query: String,
    ids: TaskIdGenerator,
    writer: SnapshotWriter,
}

impl TaskListStore {
    /// Loads the persisted list and returns a store ready for mutations.
    ///
    /// Missing or malformed snapshots yield an empty list; nothing is
    /// surfaced to the caller.
    pub fn hydrate(storage: Arc<dyn KeyValueStore>, config: &StoreConfig) -> Self {
        Self::hydrate_with_ids(storage, config, TaskIdGenerator::new())
    }

    /// Same as [`Self::hydrate`] with a caller-provided id source.
    pub fn hydrate_with_ids(
        storage: Arc<dyn KeyValueStore>,
        config: &StoreConfig,
        mut ids: TaskIdGenerator,
    ) -> Self {
        let tasks = hydrate_tasks(&*storage, &config.storage_key);
        ids.observe(tasks.iter().map(|task| task.id));
        let writer = SnapshotWriter::spawn(storage, config.storage_key.clone());

        Self {
            tasks,
            query: String::new(),
            ids,
            writer,
        }
    }

    /// Canonical list, independent of the query.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replaces the search query. Not persisted.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Tasks matching the current query, in canonical order.
    pub fn visible_tasks(&self) -> Vec<Task> {
        project(&self.tasks, &self.query)
    }

    /// Placeholder state when nothing is visible.
    pub fn empty_state(&self) -> Option<EmptyState> {
        empty_state(&self.visible_tasks(), &self.query)
    }

    /// Prepends a new open task.
    ///
    /// Returns `None` without writing anything when `raw_title` is blank.
    pub fn add(&mut self, raw_title: &str) -> Option<&Task> {
        let title = normalize_title(raw_title)?;
        let tasks = &self.tasks;
        let id = self
            .ids
            .next_id(|candidate| tasks.iter().any(|task| task.id == candidate));
        let task = Task {
            id,
            title,
            is_done: false,
        };
        self.tasks.insert(0, task);
        self.persist("add");
        self.tasks.first()
    }

    /// Flips completion of the task with `id`; unknown ids change nothing.
    pub fn toggle(&mut self, id: TaskId) -> &[Task] {
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
            task.toggle();
        } else {
            debug!("event=task_toggle module=store status=skipped reason=not_found task_id={id}");
        }
        self.persist("toggle");
        &self.tasks
    }

    /// Removes the task with `id`; unknown ids change nothing.
    ///
    /// Unconditional: callers gate this behind [`Self::request_delete`].
    pub fn delete(&mut self, id: TaskId) -> &[Task] {
        if let Some(index) = self.tasks.iter().position(|task| task.id == id) {
            self.tasks.remove(index);
        } else {
            debug!("event=task_delete module=store status=skipped reason=not_found task_id={id}");
        }
        self.persist("delete");
        &self.tasks
    }

    /// Starts a confirmation-gated delete. `None` for unknown ids.
    pub fn request_delete(&self, id: TaskId) -> Option<DeleteRequest> {
        self.find(id).map(DeleteRequest::for_task)
    }

    /// Applies the user's answer to a delete request.
    pub fn resolve_delete(&mut self, request: DeleteRequest, answer: Confirmation) -> &[Task] {
        match answer {
            Confirmation::Confirmed => self.delete(request.task_id()),
            Confirmation::Cancelled => &self.tasks,
        }
    }

    /// Replaces the canonical order with `new_order`.
    ///
    /// Tasks are matched by id; only the order of `new_order` is used, field
    /// values come from the current list.
    ///
    /// # Errors
    /// - Returns `ReorderError` when `new_order` is not a permutation of the
    ///   current list. Nothing changes and nothing is written.
    pub fn reorder(&mut self, new_order: &[Task]) -> Result<&[Task], ReorderError> {
        let ids = new_order.iter().map(|task| task.id).collect::<Vec<_>>();
        self.reorder_ids(&ids)
    }

    /// [`Self::reorder`] keyed by ids only.
    pub fn reorder_ids(&mut self, new_order: &[TaskId]) -> Result<&[Task], ReorderError> {
        let reordered = permute(&self.tasks, new_order).inspect_err(log_rejected_reorder)?;
        self.tasks = reordered;
        self.persist("reorder");
        Ok(&self.tasks)
    }

    /// Reorders the tasks currently visible under the query.
    ///
    /// `new_visible_order` must be a permutation of [`Self::visible_tasks`].
    /// Visible tasks are written back into the canonical slots they already
    /// occupy, so hidden tasks keep their positions.
    pub fn reorder_visible(&mut self, new_visible_order: &[Task]) -> Result<&[Task], ReorderError> {
        let ids = new_visible_order
            .iter()
            .map(|task| task.id)
            .collect::<Vec<_>>();
        self.reorder_visible_ids(&ids)
    }

    /// [`Self::reorder_visible`] keyed by ids only.
    pub fn reorder_visible_ids(
        &mut self,
        new_visible_order: &[TaskId],
    ) -> Result<&[Task], ReorderError> {
        let visible = self.visible_tasks();
        let reordered =
            permute(&visible, new_visible_order).inspect_err(log_rejected_reorder)?;

        let visible_ids = visible.iter().map(|task| task.id).collect::<HashSet<_>>();
        let mut replacements = reordered.into_iter();
        for slot in self
            .tasks
            .iter_mut()
            .filter(|task| visible_ids.contains(&task.id))
        {
            if let Some(next) = replacements.next() {
                *slot = next;
            }
        }

        self.persist("reorder_visible");
        Ok(&self.tasks)
    }

    /// Blocks until every snapshot issued so far reached storage.
    ///
    /// Mutations never wait on storage; this exists for shutdown paths.
    pub fn flush(&self) {
        self.writer.flush();
    }

    fn persist(&self, operation: &str) {
        debug!(
            "event=task_mutation module=store status=ok op={} task_count={}",
            operation,
            self.tasks.len()
        );
        self.writer.submit(&self.tasks);
    }
}

fn permute(current: &[Task], new_order: &[TaskId]) -> Result<Vec<Task>, ReorderError> {
    if new_order.len() != current.len() {
        return Err(ReorderError::LengthMismatch {
            expected: current.len(),
            actual: new_order.len(),
        });
    }

    let mut remaining = current
        .iter()
        .map(|task| (task.id, task))
        .collect::<HashMap<_, _>>();

    new_order
        .iter()
        .map(|id| match remaining.remove(id) {
            Some(task) => Ok(task.clone()),
            None if current.iter().any(|task| task.id == *id) => {
                Err(ReorderError::DuplicateTask(*id))
            }
            None => Err(ReorderError::UnknownTask(*id)),
        })
        .collect()
}

fn log_rejected_reorder(err: &ReorderError) {
    warn!("event=task_reorder module=store status=rejected error={err}");
}

#[cfg(test)]
mod tests {
    use super::{permute, ReorderError};
    use crate::model::task::Task;

    fn list() -> Vec<Task> {
        (1..=3)
            .map(|id| Task::new(id, &format!("task {id}")).unwrap())
            .collect()
    }

    #[test]
    fn permute_moves_canonical_values() {
        let reordered = permute(&list(), &[3, 1, 2]).unwrap();
        let ids = reordered.iter().map(|task| task.id).collect::<Vec<_>>();
        assert_eq!(ids, [3, 1, 2]);
        assert_eq!(reordered[0].title, "task 3");
    }

    #[test]
    fn permute_rejects_non_permutations() {
        assert_eq!(
            permute(&list(), &[1, 2]).unwrap_err(),
            ReorderError::LengthMismatch {
                expected: 3,
                actual: 2
            }
        );
        assert_eq!(
            permute(&list(), &[1, 2, 9]).unwrap_err(),
            ReorderError::UnknownTask(9)
        );
        assert_eq!(
            permute(&list(), &[1, 2, 2]).unwrap_err(),
            ReorderError::DuplicateTask(2)
        );
    }

    #[test]
    fn permute_of_empty_list_accepts_empty_order() {
        assert!(permute(&[], &[]).unwrap().is_empty());
    }
}
