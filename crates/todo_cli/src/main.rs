//! Command-line front end for the to-do store.
//!
//! # Responsibility
//! - Map user commands onto store operations and print read projections.
//! - Keep all business rules inside `todo_core`.

use clap::{Args, Parser, Subcommand};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use todo_core::{
    default_log_level, filter_from_path, init_logging, FilterMode, JsonTodoRepository,
    StoreConfig, TodoId, TodoItem, TodoPatch, TodoStore, DEFAULT_SLOT,
};

#[derive(Debug, Parser)]
#[command(name = "todo", version, about = "Keep a to-do list in a local JSON file")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct Settings {
    /// Directory holding the store file.
    #[arg(long, env = "TODO_APP_DATA_DIR", default_value = ".", global = true)]
    data_dir: PathBuf,

    /// File stem of the store inside the data directory.
    #[arg(long, env = "TODO_APP_SLOT", default_value = DEFAULT_SLOT, global = true)]
    slot: String,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "TODO_APP_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "TODO_APP_LOG_LEVEL", global = true)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a new item.
    Add {
        #[arg(required = true)]
        title: Vec<String>,
    },
    /// List items, optionally filtered.
    List {
        #[arg(long, conflicts_with = "path")]
        filter: Option<FilterMode>,
        /// Presentation path such as `/todos/active`.
        #[arg(long)]
        path: Option<String>,
    },
    /// Mark an item as done.
    Done { id: String },
    /// Mark an item as not done.
    Undone { id: String },
    /// Change an item's title.
    Edit {
        id: String,
        #[arg(required = true)]
        title: Vec<String>,
    },
    /// Delete an item.
    Rm { id: String },
    /// Mark every item done, or not done with `--undo`.
    CompleteAll {
        #[arg(long)]
        undo: bool,
    },
    /// Delete every completed item.
    ClearCompleted,
    /// Print item counts.
    Stats,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let settings = cli.settings;
    if let Some(log_dir) = settings.log_dir.as_deref() {
        let level = settings
            .log_level
            .as_deref()
            .unwrap_or_else(|| default_log_level());
        init_logging(level, log_dir)?;
    }

    let config = StoreConfig::new(settings.data_dir).with_slot(settings.slot);
    let mut store = TodoStore::open_json(&config)?;
    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&cli.command)
    );

    match cli.command {
        Command::Add { title } => {
            let todo = store.create_todo(&title.join(" "))?;
            println!("added {}", todo.id);
        }
        Command::List { filter, path } => {
            if let Some(path) = path {
                let resolved = filter_from_path(&path)?;
                store.set_filter(resolved.filter);
                println!("{}", resolved.canonical_path);
            } else if let Some(filter) = filter {
                store.set_filter(filter);
            }
            for todo in store.filtered_todos() {
                println!("{}", render(todo));
            }
        }
        Command::Done { id } => {
            let todo = store.update_todo(&TodoId::parse(id)?, TodoPatch::new().done(true))?;
            println!("{}", render(todo));
        }
        Command::Undone { id } => {
            let todo = store.update_todo(&TodoId::parse(id)?, TodoPatch::new().done(false))?;
            println!("{}", render(todo));
        }
        Command::Edit { id, title } => {
            let patch = TodoPatch::new().title(title.join(" "));
            let todo = store.update_todo(&TodoId::parse(id)?, patch)?;
            println!("{}", render(todo));
        }
        Command::Rm { id } => {
            let removed = store.delete_todo(&TodoId::parse(id)?)?;
            println!("removed {}", removed.id);
        }
        Command::CompleteAll { undo } => {
            store.complete_all(!undo)?;
            print_stats(&store);
        }
        Command::ClearCompleted => {
            let removed = store.clear_completed()?;
            println!("removed {removed}");
        }
        Command::Stats => print_stats(&store),
    }

    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Add { .. } => "add",
        Command::List { .. } => "list",
        Command::Done { .. } => "done",
        Command::Undone { .. } => "undone",
        Command::Edit { .. } => "edit",
        Command::Rm { .. } => "rm",
        Command::CompleteAll { .. } => "complete-all",
        Command::ClearCompleted => "clear-completed",
        Command::Stats => "stats",
    }
}

fn render(todo: &TodoItem) -> String {
    let mark = if todo.done { 'x' } else { ' ' };
    format!("[{mark}] {}  {}", todo.id, todo.title)
}

fn print_stats(store: &TodoStore<JsonTodoRepository>) {
    println!(
        "total={} active={} completed={}",
        store.total(),
        store.active_count(),
        store.completed_count()
    );
}
