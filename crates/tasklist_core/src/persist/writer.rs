//! Background snapshot writer.
//!
//! Mutations hand the encoded list to [`SnapshotWriter::submit`] and return
//! immediately. A dedicated thread applies snapshots to the key-value store.
//! In-memory state and persisted state are only eventually consistent: a
//! snapshot may still be queued while the next mutation runs, and a failed
//! write leaves the stored value stale until the next successful one.

use crate::model::task::Task;
use crate::repo::kv_repo::KeyValueStore;
use crate::repo::snapshot::encode_tasks;
use log::{debug, error};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

const WRITER_THREAD_NAME: &str = "tasklist-snapshot-writer";

enum WriterCommand {
    Write(String),
    Flush(Sender<()>),
}

/// Handle to the background writer thread.
///
/// Dropping the handle closes the queue; the thread finishes queued writes
/// and exits on its own.
pub struct SnapshotWriter {
    sender: Option<Sender<WriterCommand>>,
}

impl SnapshotWriter {
    /// Starts the writer thread for one storage key.
    ///
    /// When the thread cannot be spawned the writer degrades to dropping
    /// snapshots (logged), matching the write-failure policy.
    pub fn spawn(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let (sender, receiver) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name(WRITER_THREAD_NAME.to_string())
            .spawn(move || run_writer(&*store, &key, receiver));

        match spawned {
            Ok(_) => Self {
                sender: Some(sender),
            },
            Err(err) => {
                error!(
                    "event=writer_start module=persist status=error error_code=spawn_failed error={}",
                    err
                );
                Self { sender: None }
            }
        }
    }

    /// Queues a snapshot of `tasks` without waiting for it to be stored.
    pub fn submit(&self, tasks: &[Task]) {
        let blob = match encode_tasks(tasks) {
            Ok(blob) => blob,
            Err(err) => {
                error!(
                    "event=snapshot_write module=persist status=error error_code=encode_failed error={}",
                    err
                );
                return;
            }
        };

        let delivered = self
            .sender
            .as_ref()
            .is_some_and(|sender| sender.send(WriterCommand::Write(blob)).is_ok());
        if !delivered {
            error!(
                "event=snapshot_write module=persist status=error error_code=writer_unavailable task_count={}",
                tasks.len()
            );
        }
    }

    /// Blocks until every snapshot submitted before this call was applied.
    pub fn flush(&self) {
        let Some(sender) = self.sender.as_ref() else {
            return;
        };
        let (ack_tx, ack_rx) = mpsc::channel();
        if sender.send(WriterCommand::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }
}

fn run_writer(store: &dyn KeyValueStore, key: &str, receiver: Receiver<WriterCommand>) {
    while let Ok(first) = receiver.recv() {
        let mut latest = None;
        let mut superseded = 0usize;
        let mut waiters = Vec::new();

        for command in std::iter::once(first).chain(receiver.try_iter()) {
            match command {
                WriterCommand::Write(blob) => {
                    if latest.replace(blob).is_some() {
                        superseded += 1;
                    }
                }
                WriterCommand::Flush(ack) => waiters.push(ack),
            }
        }

        if let Some(blob) = latest {
            write_snapshot(store, key, &blob, superseded);
        }
        for ack in waiters {
            let _ = ack.send(());
        }
    }
}

fn write_snapshot(store: &dyn KeyValueStore, key: &str, blob: &str, superseded: usize) {
    let started_at = Instant::now();
    match store.write(key, blob) {
        Ok(()) => debug!(
            "event=snapshot_write module=persist status=ok blob_bytes={} superseded={} duration_ms={}",
            blob.len(),
            superseded,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=snapshot_write module=persist status=error error_code=write_failed duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
}
