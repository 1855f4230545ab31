//! CLI smoke entry point.
//!
//! # Responsibility
//! - Drive `tasklist_core` against an SQLite file without the Flutter shell.
//! - Mirror the app intents: add, toggle, delete (with confirmation),
//!   reorder, list.

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tasklist_core::{
    Confirmation, SqliteKeyValueStore, StoreConfig, Task, TaskId, TaskListStore,
};

#[derive(Parser, Debug)]
#[command(name = "tasklist_cli", about = "Task list smoke runner over an SQLite file")]
struct Cli {
    /// SQLite file holding the task snapshot.
    db_path: PathBuf,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Commands {
    /// Prints tasks matching an optional search query.
    List { query: Vec<String> },
    /// Prepends a new open task.
    Add { title: Vec<String> },
    /// Flips completion of a task.
    Toggle { id: TaskId },
    /// Deletes a task after a y/N confirmation.
    Delete { id: TaskId },
    /// Replaces the list order; every current id must appear exactly once.
    Reorder { ids: Vec<TaskId> },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let storage = SqliteKeyValueStore::open(&cli.db_path).map_err(|err| err.to_string())?;
    let mut store = TaskListStore::hydrate(Arc::new(storage), &StoreConfig::default());

    match cli.command {
        None => print_tasks(&store),
        Some(Commands::List { query }) => {
            store.set_query(query.join(" "));
            print_tasks(&store);
        }
        Some(Commands::Add { title }) => match store.add(&title.join(" ")) {
            Some(task) => println!("added {}", task.id),
            None => println!("nothing to add"),
        },
        Some(Commands::Toggle { id }) => {
            store.toggle(id);
            print_tasks(&store);
        }
        Some(Commands::Delete { id }) => {
            let Some(request) = store.request_delete(id) else {
                println!("no such task");
                return Ok(());
            };
            let answer = ask(&format!(
                "{}: {} [y/N] ",
                request.prompt_title(),
                request.prompt_message()
            ))?;
            store.resolve_delete(request, answer);
            print_tasks(&store);
        }
        Some(Commands::Reorder { ids }) => {
            store.reorder_ids(&ids).map_err(|err| err.to_string())?;
            print_tasks(&store);
        }
    }

    // Writes are fire-and-forget; wait for them before the process exits.
    store.flush();
    Ok(())
}

fn ask(prompt: &str) -> Result<Confirmation, String> {
    print!("{prompt}");
    io::stdout().flush().map_err(|err| err.to_string())?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|err| err.to_string())?;
    let confirmed = matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes");
    Ok(Confirmation::from_confirmed(confirmed))
}

fn print_tasks(store: &TaskListStore) {
    if let Some(state) = store.empty_state() {
        println!("{}", state.message());
        return;
    }
    for task in store.visible_tasks() {
        println!("{}", format_task(&task));
    }
}

fn format_task(task: &Task) -> String {
    let mark = if task.is_done { "x" } else { " " };
    format!("[{mark}] {} {}", task.id, task.title)
}
