use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use tarefa_core::ids::TaskId;
use tarefa_core::model::{Completion, NewTask, Task};
use tarefa_store::{Database, StoreError, TaskRepo};

/// Local task tracker backed by an embedded SQLite database.
#[derive(Parser)]
#[command(name = "tarefa", version, about)]
struct Cli {
    /// Database file (defaults to $TAREFA_DB or ~/.tarefa/tarefas.db).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a task.
    Add {
        title: String,
        #[arg(long, short = 's')]
        subject: String,
        #[arg(long, short = 'd')]
        description: String,
        #[arg(long, default_value = "")]
        instructor: String,
        /// Free-form due date text.
        #[arg(long = "due", default_value = "")]
        due_date: String,
    },
    /// List every task.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one task by id or by exact title.
    Show {
        #[arg(conflicts_with = "title")]
        id: Option<TaskId>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Search tasks by title substring.
    Search {
        pattern: String,
        #[arg(long)]
        json: bool,
    },
    /// Edit fields of a task.
    Edit {
        id: TaskId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, short = 's')]
        subject: Option<String>,
        #[arg(long, short = 'd')]
        description: Option<String>,
        #[arg(long)]
        instructor: Option<String>,
        #[arg(long = "due")]
        due_date: Option<String>,
    },
    /// Mark a task completed.
    Done { id: TaskId },
    /// Mark a task pending again.
    Reopen { id: TaskId },
    /// Delete a task by id or by exact title. No-op if nothing matches.
    Rm {
        #[arg(conflicts_with = "title")]
        id: Option<TaskId>,
        #[arg(long)]
        title: Option<String>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no task found for {0}")]
    NotFound(String),

    #[error("{0}")]
    Usage(&'static str),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let db_path = cli.db.clone().unwrap_or_else(default_db_path);

    let db = match Database::open(&db_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("tarefa: cannot open {}: {e}", db_path.display());
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(path = %db_path.display(), "database ready");

    // One store instance per process, shared by every command path.
    let repo = TaskRepo::new(db);

    match run(cli.command, &repo) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("tarefa: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, repo: &TaskRepo) -> Result<(), CliError> {
    match command {
        Command::Add {
            title,
            subject,
            description,
            instructor,
            due_date,
        } => {
            let id = repo.create(&NewTask {
                title,
                description,
                subject,
                instructor,
                due_date,
                completed: Completion::Pending,
            })?;
            println!("created task #{id}");
        }
        Command::List { json } => {
            let tasks = repo.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                for task in &tasks {
                    print_line(task);
                }
                println!("{} task(s)", tasks.len());
            }
        }
        Command::Show { id, title, json } => {
            let task = find_one(repo, id, title.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                print_details(&task);
            }
        }
        Command::Search { pattern, json } => {
            let tasks = repo.search(&pattern)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("no tasks matching \"{pattern}\"");
            } else {
                for task in &tasks {
                    print_line(task);
                }
            }
        }
        Command::Edit {
            id,
            title,
            subject,
            description,
            instructor,
            due_date,
        } => {
            let mut task = repo
                .get(id)?
                .ok_or_else(|| CliError::NotFound(format!("id {id}")))?;
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(subject) = subject {
                task.subject = subject;
            }
            if let Some(description) = description {
                task.description = description;
            }
            if let Some(instructor) = instructor {
                task.instructor = instructor;
            }
            if let Some(due_date) = due_date {
                task.due_date = due_date;
            }
            if !repo.update(&task)? {
                return Err(CliError::NotFound(format!("id {id}")));
            }
            println!("updated task #{id}");
        }
        Command::Done { id } => {
            if !repo.set_completed(id, Completion::Done)? {
                return Err(CliError::NotFound(format!("id {id}")));
            }
            println!("task #{id} done");
        }
        Command::Reopen { id } => {
            if !repo.set_completed(id, Completion::Pending)? {
                return Err(CliError::NotFound(format!("id {id}")));
            }
            println!("task #{id} reopened");
        }
        Command::Rm { id, title } => {
            let removed = match (id, title) {
                (Some(id), _) => repo.delete(id)?,
                (None, Some(title)) => repo.delete_by_title(&title)?,
                (None, None) => return Err(CliError::Usage("pass a task id or --title")),
            };
            // Delete is absorbing: a missing target is not a failure
            if removed {
                println!("removed");
            } else {
                println!("nothing to remove");
            }
        }
    }
    Ok(())
}

fn find_one(repo: &TaskRepo, id: Option<TaskId>, title: Option<&str>) -> Result<Task, CliError> {
    match (id, title) {
        (Some(id), _) => repo
            .get(id)?
            .ok_or_else(|| CliError::NotFound(format!("id {id}"))),
        (None, Some(title)) => repo
            .get_by_title(title)?
            .ok_or_else(|| CliError::NotFound(format!("title \"{title}\""))),
        (None, None) => Err(CliError::Usage("pass a task id or --title")),
    }
}

fn print_line(task: &Task) {
    let flag = if task.completed.is_done() { "x" } else { " " };
    println!("[{flag}] #{} {} ({})", task.id, task.title, task.subject);
}

fn print_details(task: &Task) {
    print_line(task);
    if !task.instructor.is_empty() {
        println!("    instructor: {}", task.instructor);
    }
    if !task.due_date.is_empty() {
        println!("    due: {}", task.due_date);
    }
    println!("    {}", task.description);
}

fn default_db_path() -> PathBuf {
    if let Ok(path) = std::env::var("TAREFA_DB") {
        return PathBuf::from(path);
    }
    dirs_home().join(".tarefa").join("tarefas.db")
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}
