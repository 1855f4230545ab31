//! Task list snapshot codec and hydration.
//!
//! # Responsibility
//! - Convert the canonical task list to and from its persisted JSON blob.
//! - Load the startup list from a key-value store without ever failing.
//!
//! # Invariants
//! - The blob is a JSON array of `{"id", "title", "isDone"}` in list order.
//! - Hydration falls back to an empty list on a missing, unreadable or
//!   malformed blob.
//! - Hydrated lists never contain duplicate ids or blank titles.

use crate::model::task::Task;
use crate::repo::kv_repo::KeyValueStore;
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Codec error for task list snapshots.
#[derive(Debug)]
pub enum SnapshotError {
    Encode(serde_json::Error),
    Decode(serde_json::Error),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode task snapshot: {err}"),
            Self::Decode(err) => write!(f, "failed to decode task snapshot: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) | Self::Decode(err) => Some(err),
        }
    }
}

/// Serializes tasks in list order.
pub fn encode_tasks(tasks: &[Task]) -> SnapshotResult<String> {
    serde_json::to_string(tasks).map_err(SnapshotError::Encode)
}

/// Parses a persisted blob back into tasks, preserving order.
pub fn decode_tasks(blob: &str) -> SnapshotResult<Vec<Task>> {
    serde_json::from_str(blob).map_err(SnapshotError::Decode)
}

/// Reads the list stored under `key`.
///
/// Never fails: every failure degrades to an empty list and is logged.
pub fn hydrate_tasks(store: &dyn KeyValueStore, key: &str) -> Vec<Task> {
    let blob = match store.read(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            info!("event=hydrate module=snapshot status=empty reason=absent");
            return Vec::new();
        }
        Err(err) => {
            error!(
                "event=hydrate module=snapshot status=error error_code=read_failed error={}",
                err
            );
            return Vec::new();
        }
    };

    match decode_tasks(&blob) {
        Ok(tasks) => {
            let tasks = repair_tasks(tasks);
            info!(
                "event=hydrate module=snapshot status=ok task_count={}",
                tasks.len()
            );
            tasks
        }
        Err(err) => {
            warn!(
                "event=hydrate module=snapshot status=error error_code=decode_failed blob_bytes={} error={}",
                blob.len(),
                err
            );
            Vec::new()
        }
    }
}

fn repair_tasks(tasks: Vec<Task>) -> Vec<Task> {
    let total = tasks.len();
    let mut seen = HashSet::with_capacity(total);
    let mut blank_titles = 0usize;
    let mut duplicates = 0usize;

    let repaired = tasks
        .into_iter()
        .filter(|task| {
            if task.title.trim().is_empty() {
                blank_titles += 1;
                return false;
            }
            if !seen.insert(task.id) {
                duplicates += 1;
                return false;
            }
            true
        })
        .collect::<Vec<_>>();

    if repaired.len() != total {
        warn!(
            "event=hydrate module=snapshot status=repaired dropped_duplicates={} dropped_blank_titles={}",
            duplicates, blank_titles
        );
    }
    repaired
}
