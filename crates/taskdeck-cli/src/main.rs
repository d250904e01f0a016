//! Taskdeck CLI - manage tasks from the terminal.

mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::{Config, Paths};

/// Taskdeck CLI for task management.
#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "Taskdeck CLI for authentication and task management")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// API base URL (overrides config file)
    #[arg(long, global = true, env = "TASKDECK_API_URL")]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Login with email and password
    Login,

    /// Create a new account
    Register,

    /// Logout and clear stored credentials
    Logout,

    /// Show the logged-in identity
    Whoami,

    /// Check authentication status against the server
    Status,

    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List tasks
    List,
    /// Show task details
    Show {
        /// Task ID
        id: i64,
    },
    /// Create a task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(short, long)]
        description: Option<String>,
        /// Initial status
        #[arg(short, long, default_value = "pending")]
        status: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: i64,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New status
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Mark a task completed
    Done {
        /// Task ID
        id: i64,
    },
    /// Delete a task
    Rm {
        /// Task ID
        id: i64,
    },
    /// Move a task to a new position
    Move {
        /// Task ID
        id: i64,
        /// Target position (0-based)
        position: i64,
    },
    /// Show task statistics
    Stats,
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let paths = Paths::new()?;
    let mut config = Config::load(&paths)?;
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.clone();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone();
    }
    Ok(config)
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_env("TASKDECK_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    let result = match &cli.command {
        Commands::Login => commands::login(&config, &cli.format).await,
        Commands::Register => commands::register(&config, &cli.format).await,
        Commands::Logout => commands::logout(&config, &cli.format).await,
        Commands::Whoami => commands::whoami(&config, &cli.format).await,
        Commands::Status => commands::status(&config, &cli.format).await,
        Commands::Task { command } => match command {
            TaskCommands::List => commands::task_list(&config, &cli.format).await,
            TaskCommands::Show { id } => commands::task_show(&config, *id, &cli.format).await,
            TaskCommands::Add {
                title,
                description,
                status,
            } => {
                commands::task_add(&config, title, description.as_deref(), status, &cli.format)
                    .await
            }
            TaskCommands::Update {
                id,
                title,
                description,
                status,
            } => {
                commands::task_update(
                    &config,
                    *id,
                    title.as_deref(),
                    description.as_deref(),
                    status.as_deref(),
                    &cli.format,
                )
                .await
            }
            TaskCommands::Done { id } => commands::task_done(&config, *id, &cli.format).await,
            TaskCommands::Rm { id } => commands::task_rm(&config, *id, &cli.format).await,
            TaskCommands::Move { id, position } => {
                commands::task_move(&config, *id, *position, &cli.format).await
            }
            TaskCommands::Stats => commands::task_stats(&config, &cli.format).await,
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
