use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use taskflow::commands::*;
use taskflow::models::{Filter, Priority};

#[derive(Parser)]
#[command(name = "taskflow")]
#[command(about = "Local task list with a daily reset", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// Longer description
        #[arg(short, long)]
        description: Option<String>,
        /// Category label
        #[arg(short, long)]
        category: Option<String>,
        /// Priority
        #[arg(short, long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Scheduled date in YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        /// Scheduled time in HH:MM
        #[arg(long)]
        time: Option<String>,
    },
    /// List tasks
    List {
        /// View filter
        #[arg(short, long, value_enum, default_value_t = Filter::All)]
        filter: Filter,
        /// Case-insensitive text search over title, description and category
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Toggle completion of a task
    Complete {
        id: u64,
    },
    /// Toggle the important flag of a task
    Important {
        id: u64,
    },
    /// Edit a task
    Edit {
        id: u64,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New priority
        #[arg(short, long, value_enum)]
        priority: Option<Priority>,
        /// New scheduled date in YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        /// New scheduled time in HH:MM
        #[arg(long)]
        time: Option<String>,
    },
    /// Remove a task
    Remove {
        id: u64,
    },
    /// Remove all tasks
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Replace the collection with the example tasks
    Samples,
    /// Show pending/completed/overdue/important counters
    Stats,
    /// Export tasks to a JSON file
    Export {
        /// Destination file (default: taskflow-backup-<date>.json)
        path: Option<PathBuf>,
    },
    /// Import tasks from a JSON file, replacing the current collection
    Import {
        path: PathBuf,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Add { title, description, category, priority, date, time } => {
            cmd_add(title, description, category, priority, date, time, false)
        }
        Commands::List { filter, search } => cmd_list(filter, search),
        Commands::Complete { id } => cmd_complete(id, false),
        Commands::Important { id } => cmd_important(id, false),
        Commands::Edit { id, title, description, category, priority, date, time } => {
            cmd_edit(id, title, description, category, priority, date, time, false)
        }
        Commands::Remove { id } => cmd_remove(id, false),
        Commands::Clear { force } => cmd_clear(force),
        Commands::Samples => cmd_samples(false),
        Commands::Stats => cmd_stats(),
        Commands::Export { path } => cmd_export(path, false),
        Commands::Import { path } => cmd_import(path, false),
        Commands::Completions { shell } => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "taskflow", &mut io::stdout());
        }
    }
}
