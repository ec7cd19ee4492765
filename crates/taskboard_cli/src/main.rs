//! Command-line front end for the task board.
//!
//! # Responsibility
//! - Map subcommands onto board operations.
//! - Render the four columns as plain text after every change.

mod render;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use taskboard_core::{
    init_from_config, open_store, BoardConfig, BoardError, Column, ConfirmDelete, DeleteOutcome,
    FailureKind, Priority, Task, TaskBoard, TaskDraft, TaskId, TaskListQuery, TaskPatch,
    TaskStore,
};

#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about = "Kanban task board over a REST or SQLite task store")]
struct Cli {
    /// TOML configuration file; defaults apply when it does not exist.
    #[arg(long, global = true, env = "TASKBOARD_CONFIG", default_value = "taskboard.toml")]
    config: PathBuf,

    /// Absolute directory for log files (overrides `[logging].dir`).
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Only show and operate on tasks assigned to this user.
    #[arg(long, global = true)]
    user: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the board (default).
    Board,
    /// Print tasks in store order, one per line (scope with --user).
    List,
    /// Create a task.
    Add {
        title: String,
        /// todo | in-progress | review | done
        #[arg(long, default_value = "todo")]
        column: Column,
        #[arg(long)]
        body: Option<String>,
        /// low | medium | high
        #[arg(long)]
        priority: Option<Priority>,
        /// Due date as YYYY-MM-DD.
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Assignee user id.
        #[arg(long)]
        assignee: Option<u64>,
    },
    /// Edit a task's fields; its column is kept unless --column is given.
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "clear_body")]
        body: Option<String>,
        #[arg(long)]
        clear_body: bool,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,
        #[arg(long)]
        clear_due: bool,
        #[arg(long)]
        assignee: Option<u64>,
        #[arg(long)]
        column: Option<Column>,
    },
    /// Move a task to another column.
    Move { id: u64, column: Column },
    /// Delete a task after confirmation.
    Delete {
        id: u64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

/// Asks on stdin before a delete is submitted.
struct PromptConfirm;

impl ConfirmDelete for PromptConfirm {
    fn confirm_delete(&self, task: &Task) -> bool {
        print!("Delete task {} \"{}\"? [y/N] ", task.id, task.title);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match BoardConfig::load(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(dir) = cli.log_dir.clone() {
        config.logging.dir = Some(dir);
    }
    if let Err(err) = init_from_config(&config.logging) {
        eprintln!("warning: logging disabled: {err}");
    }

    let store = match open_store(&config.store) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("error: cannot open task store: {err}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        "event=cli_start module=cli status=ok backend={:?} version={}",
        config.store.backend,
        taskboard_core::core_version()
    );

    let query = cli.user.map_or_else(TaskListQuery::all, TaskListQuery::for_user);
    let mut board = TaskBoard::with_query(store, query);
    match run(&mut board, cli.command.unwrap_or(Command::Board)) {
        Ok(show_board) => {
            if show_board {
                print!("{}", render::render_board(&board.snapshot()));
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", describe_failure(&err));
            ExitCode::FAILURE
        }
    }
}

/// Runs one subcommand; returns whether the board should be printed after it.
fn run<S: TaskStore>(board: &mut TaskBoard<S>, command: Command) -> Result<bool, BoardError> {
    board.list_tasks()?;

    match command {
        Command::Board => {}
        Command::List => {
            let tasks: Vec<&Task> = board.tasks().iter().collect();
            print!("{}", render::render_list(&tasks));
            return Ok(false);
        }
        Command::Add {
            title,
            column,
            body,
            priority,
            due,
            assignee,
        } => {
            let draft = TaskDraft {
                title,
                body,
                priority,
                due_date: due,
                user_id: assignee,
            };
            let created = board.create_task(draft, column)?;
            println!("created task {} in {}", created.id, created.column.title());
        }
        Command::Edit {
            id,
            title,
            body,
            clear_body,
            priority,
            due,
            clear_due,
            assignee,
            column,
        } => {
            let patch = TaskPatch {
                title,
                body: if clear_body { Some(None) } else { body.map(Some) },
                priority,
                due_date: if clear_due { Some(None) } else { due.map(Some) },
                user_id: assignee,
                column,
            };
            if patch.is_empty() {
                println!("nothing to change for task {id}");
                return Ok(true);
            }
            let updated = board.update_task(TaskId(id), &patch)?;
            println!("updated task {}", updated.id);
        }
        Command::Move { id, column } => {
            let task = board
                .task(TaskId(id))
                .cloned()
                .ok_or(BoardError::UnknownTask(TaskId(id)))?;
            board.begin_drag(&task);
            if let Some(moved) = board.drop_on_column(column)? {
                println!("moved task {} to {}", moved.id, moved.column.title());
            }
        }
        Command::Delete { id, yes } => {
            let outcome = if yes {
                board.delete_task(TaskId(id), &|_: &Task| true)?
            } else {
                board.delete_task(TaskId(id), &PromptConfirm)?
            };
            match outcome {
                DeleteOutcome::Deleted(task) => println!("deleted task {}", task.id),
                DeleteOutcome::Declined => println!("kept task {id}"),
            }
        }
    }
    Ok(true)
}

fn describe_failure(err: &BoardError) -> String {
    match err.kind() {
        FailureKind::NetworkFailure => format!("task store unavailable ({err})"),
        FailureKind::RemoteRejection => format!("task store refused the change ({err})"),
        FailureKind::ValidationFailure => err.to_string(),
    }
}
