//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the task list intents to Dart via FRB.
//! - Hold the single process-wide `TaskListStore` the UI talks to.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every intent except init fails softly until `init_task_list` ran.
//! - The store is hydrated before any intent can mutate it.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tasklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Confirmation, SqliteKeyValueStore, StoreConfig, Task, TaskListStore,
};

static TASK_LIST: OnceLock<Mutex<TaskListStore>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Opens the task database and hydrates the list.
///
/// # FFI contract
/// - Sync call; performs file-system and DB setup work.
/// - Idempotent: later calls keep the first store, whatever `db_path` is.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_task_list(db_path: String) -> String {
    if TASK_LIST.get().is_some() {
        return String::new();
    }

    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "init_task_list failed: db_path cannot be empty".to_string();
    }

    let storage = match SqliteKeyValueStore::open(trimmed) {
        Ok(storage) => storage,
        Err(err) => return format!("init_task_list failed: {err}"),
    };

    // A concurrent init may win the race; its store is kept and ours dropped.
    TASK_LIST.get_or_init(|| {
        Mutex::new(TaskListStore::hydrate(
            Arc::new(storage),
            &StoreConfig::default(),
        ))
    });
    String::new()
}

/// Task row for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub title: String,
    pub is_done: bool,
}

/// Visible list envelope returned by every intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    /// Whether the intent was applied.
    pub ok: bool,
    /// Tasks visible under the current query, in canonical order.
    pub items: Vec<TaskItem>,
    /// Placeholder text when `items` is empty.
    pub empty_message: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl TaskListResponse {
    fn from_store(store: &TaskListStore, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            items: store.visible_tasks().into_iter().map(to_task_item).collect(),
            empty_message: store
                .empty_state()
                .map(|state| state.message().to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            empty_message: None,
            message: message.into(),
        }
    }
}

/// Confirmation prompt for a pending delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePrompt {
    pub task_id: i64,
    pub title: String,
    pub message: String,
}

/// Returns the list as currently visible.
#[flutter_rust_bridge::frb(sync)]
pub fn list_visible_tasks() -> TaskListResponse {
    with_store("list_visible_tasks", |store| {
        TaskListResponse::from_store(store, "ok")
    })
}

/// Adds a task from the input field. Blank input is accepted as a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn add_task(text: String) -> TaskListResponse {
    with_store("add_task", |store| {
        let message = match store.add(&text) {
            Some(_) => "Task added.",
            None => "Nothing to add.",
        };
        TaskListResponse::from_store(store, message)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn toggle_task(id: i64) -> TaskListResponse {
    with_store("toggle_task", |store| {
        store.toggle(id);
        TaskListResponse::from_store(store, "Task toggled.")
    })
}

/// First step of deletion: returns the prompt to show, `None` for unknown ids.
#[flutter_rust_bridge::frb(sync)]
pub fn request_delete_task(id: i64) -> Option<DeletePrompt> {
    let guard = lock_store().ok()?;
    guard.request_delete(id).map(|request| DeletePrompt {
        task_id: request.task_id(),
        title: request.prompt_title().to_string(),
        message: request.prompt_message(),
    })
}

/// Second step of deletion with the user's answer.
#[flutter_rust_bridge::frb(sync)]
pub fn confirm_delete_task(id: i64, confirmed: bool) -> TaskListResponse {
    with_store("confirm_delete_task", |store| {
        let Some(request) = store.request_delete(id) else {
            return TaskListResponse::from_store(store, "Task already gone.");
        };
        let answer = Confirmation::from_confirmed(confirmed);
        store.resolve_delete(request, answer);
        let message = match answer {
            Confirmation::Confirmed => "Task deleted.",
            Confirmation::Cancelled => "Delete cancelled.",
        };
        TaskListResponse::from_store(store, message)
    })
}

/// Applies a full new order of task ids.
#[flutter_rust_bridge::frb(sync)]
pub fn reorder_tasks(ids: Vec<i64>) -> TaskListResponse {
    with_store("reorder_tasks", |store| match store.reorder_ids(&ids) {
        Ok(_) => TaskListResponse::from_store(store, "Tasks reordered."),
        Err(err) => TaskListResponse {
            ok: false,
            ..TaskListResponse::from_store(store, format!("reorder_tasks failed: {err}"))
        },
    })
}

/// Applies the order reported by a drag over the visible (filtered) list.
#[flutter_rust_bridge::frb(sync)]
pub fn reorder_visible_tasks(ids: Vec<i64>) -> TaskListResponse {
    with_store("reorder_visible_tasks", |store| {
        match store.reorder_visible_ids(&ids) {
            Ok(_) => TaskListResponse::from_store(store, "Tasks reordered."),
            Err(err) => TaskListResponse {
                ok: false,
                ..TaskListResponse::from_store(
                    store,
                    format!("reorder_visible_tasks failed: {err}"),
                )
            },
        }
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn set_search_query(text: String) -> TaskListResponse {
    with_store("set_search_query", |store| {
        store.set_query(text);
        TaskListResponse::from_store(store, "ok")
    })
}

fn lock_store() -> Result<MutexGuard<'static, TaskListStore>, String> {
    let cell = TASK_LIST
        .get()
        .ok_or_else(|| "task list not initialized; call init_task_list first".to_string())?;
    cell.lock()
        .map_err(|_| "task list lock poisoned".to_string())
}

fn with_store(
    operation: &str,
    f: impl FnOnce(&mut TaskListStore) -> TaskListResponse,
) -> TaskListResponse {
    match lock_store() {
        Ok(mut guard) => f(&mut guard),
        Err(err) => {
            log::warn!("event=ffi_call module=ffi status=error op={operation} error={err}");
            TaskListResponse::failure(format!("{operation} failed: {err}"))
        }
    }
}

fn to_task_item(task: Task) -> TaskItem {
    TaskItem {
        id: task.id,
        title: task.title,
        is_done: task.is_done,
    }
}
