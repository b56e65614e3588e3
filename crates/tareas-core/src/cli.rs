use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tareas_shared::StatusFilter;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// The `/actividades` REST service.
    Remote,
    /// A JSON array in the data directory.
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StatusArg {
    #[default]
    All,
    Pending,
    Completed,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => StatusFilter::All,
            StatusArg::Pending => StatusFilter::Pending,
            StatusArg::Completed => StatusFilter::Completed,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tareas",
    version,
    about = "Tareas: manage a task list kept on a REST service or on disk"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[arg(long = "backend", value_enum, default_value_t = Backend::Local, global = true)]
    pub backend: Backend,

    /// Base URL of the REST service, overriding the config file.
    #[arg(long = "api", global = true)]
    pub api: Option<String>,

    /// Data directory of the local backend, overriding the config file.
    #[arg(long = "data", global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show tasks matching the filters (default).
    List(ListArgs),
    /// Create a task.
    Add(AddArgs),
    /// Change fields of an existing task.
    Edit(EditArgs),
    /// Flip a task between pending and completed.
    Toggle { id: String },
    /// Remove a task.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[arg(long = "status", value_enum, default_value_t = StatusArg::All)]
    pub status: StatusArg,

    #[arg(long = "category", default_value = "")]
    pub category: String,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    pub name: String,

    #[arg(long = "category", default_value = "")]
    pub category: String,

    #[arg(long = "description", default_value = "")]
    pub description: String,

    /// Remote backend only.
    #[arg(long = "priority", default_value = "")]
    pub priority: String,

    /// Remote backend only; `YYYY-MM-DDTHH:MM`, defaults to today 00:00.
    #[arg(long = "due")]
    pub due: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    pub id: String,

    #[arg(long = "name")]
    pub name: Option<String>,

    #[arg(long = "category")]
    pub category: Option<String>,

    #[arg(long = "description")]
    pub description: Option<String>,

    #[arg(long = "priority")]
    pub priority: Option<String>,

    #[arg(long = "due")]
    pub due: Option<String>,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = match (quiet, verbose) {
        (2.., _) => "error",
        (1, _) | (0, 0) => "warn",
        (0, 1) => "info",
        (0, 2) => "debug",
        (0, _) => "trace",
    };

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level)
            .map_err(|e| anyhow!("invalid log filter {default_level}: {e}"))?,
    };

    let stderr = std::io::stderr();
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(stderr.is_terminal())
        .with_writer(std::io::stderr)
        .try_init()
    {
        debug!(error = %err, "keeping the already installed subscriber");
    }

    Ok(())
}
