use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context, anyhow};
use tareas_shared::datetime::{default_due_input, now_local};
use tareas_shared::view::RenderContext;
use tareas_shared::{
    Board, DELETE_CONFIRMATION, FormError, KeyValueStore, LocalSession, LocalTaskForm,
    RemoteClient, RemoteSession, RemoteTask, RemoteTaskForm, StatusFilter, TaskFilter, TaskStatus,
};
use tracing::{info, instrument, warn};

use crate::cli::{Backend, Command, ListArgs};
use crate::config::{Config, resolve_data_dir};
use crate::datastore::FileStore;
use crate::render::Renderer;

/// The streams a command reads answers from and writes output to.
pub struct Console<R, W> {
    pub input: R,
    pub output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Asks a yes/no question; anything but `y` or `yes` declines.
    pub fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool> {
        write!(self.output, "{prompt} [y/N] ")?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input
            .read_line(&mut answer)
            .context("failed reading confirmation")?;
        Ok(matches!(
            answer.trim().to_lowercase().as_str(),
            "y" | "yes"
        ))
    }

    pub fn message(&mut self, message: &str) -> anyhow::Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }
}

#[instrument(skip(cfg, command, renderer))]
pub fn dispatch(
    cfg: &Config,
    backend: Backend,
    command: Command,
    renderer: &Renderer,
) -> anyhow::Result<()> {
    let ctx = RenderContext {
        now: now_local(),
        near_due_days: cfg.settings.display.near_due_days,
    };
    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout().lock());

    match backend {
        Backend::Local => {
            let data_dir = resolve_data_dir(cfg).context("failed to resolve data directory")?;
            let store = FileStore::open(&data_dir).with_context(|| {
                format!("failed to open task store at {}", data_dir.display())
            })?;
            let mut session = LocalSession::open(store, &cfg.settings.local.storage_key)?;
            run_local(&mut session, command, &ctx, renderer, &mut console)
        }
        Backend::Remote => {
            let session = remote_session(cfg)?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("failed to start async runtime")?;
            runtime.block_on(run_remote(&session, command, &ctx, renderer, &mut console))
        }
    }
}

fn remote_session(cfg: &Config) -> anyhow::Result<RemoteSession> {
    let remote = &cfg.settings.remote;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(remote.timeout_secs))
        .build()
        .context("failed to build HTTP client")?;
    info!(base_url = %remote.base_url, "using remote backend");
    Ok(RemoteSession::new(RemoteClient::with_client(
        http,
        &remote.base_url,
    )))
}

fn list_filter(args: &ListArgs) -> TaskFilter {
    TaskFilter::new(StatusFilter::from(args.status), &args.category)
}

fn warn_remote_only(priority: Option<&str>, due: Option<&str>) {
    let priority = priority.is_some_and(|value| !value.trim().is_empty());
    if priority || due.is_some() {
        warn!("priority and due date only apply to the remote backend; ignoring them");
    }
}

/// Runs one command against the local store, then prints the list.
#[instrument(skip_all)]
pub fn run_local<S, R, W>(
    session: &mut LocalSession<S>,
    command: Command,
    ctx: &RenderContext,
    renderer: &Renderer,
    console: &mut Console<R, W>,
) -> anyhow::Result<()>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    match command {
        Command::List(args) => {
            session.board_mut().apply_filter(list_filter(&args));
        }
        Command::Add(args) => {
            warn_remote_only(Some(&args.priority), args.due.as_deref());
            let mut form = LocalTaskForm {
                text: args.name,
                category: args.category,
                description: args.description,
            };
            if !session.submit(&mut form)? {
                return Err(FormError::MissingName.into());
            }
            console.message("Task created.")?;
        }
        Command::Edit(args) => {
            warn_remote_only(args.priority.as_deref(), args.due.as_deref());
            let key = session.board().resolve(&args.id)?;
            let mut form = session
                .begin_edit(&key)
                .ok_or_else(|| anyhow!("task not found: {key}"))?;
            if let Some(name) = args.name {
                form.text = name;
            }
            if let Some(category) = args.category {
                form.category = category;
            }
            if let Some(description) = args.description {
                form.description = description;
            }
            if !session.submit(&mut form)? {
                return Err(FormError::MissingName.into());
            }
            console.message("Task updated.")?;
        }
        Command::Toggle { id } => {
            let key = session.board().resolve(&id)?;
            let completed = session.toggle(&key)?;
            console.message(if completed {
                "Task completed."
            } else {
                "Task marked pending."
            })?;
        }
        Command::Delete { id, yes } => {
            let key = session.board().resolve(&id)?;
            if !yes && !console.confirm(DELETE_CONFIRMATION)? {
                return console.message("Nothing deleted.");
            }
            session.remove(&key)?;
            console.message("Task deleted.")?;
        }
    }

    renderer.write_task_list(&mut console.output, &session.view(ctx))
}

/// Runs one command against the REST service, then prints the list the
/// service returned last.
#[instrument(skip_all, fields(base_url = %session.client().base_url()))]
pub async fn run_remote<R, W>(
    session: &RemoteSession,
    command: Command,
    ctx: &RenderContext,
    renderer: &Renderer,
    console: &mut Console<R, W>,
) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    let mut board: Board<RemoteTask> = Board::with_tasks(session.refresh().await?);

    match command {
        Command::List(args) => {
            board.apply_filter(list_filter(&args));
        }
        Command::Add(args) => {
            let form = RemoteTaskForm {
                name: args.name,
                category: args.category,
                description: args.description,
                priority: args.priority,
                due: args
                    .due
                    .unwrap_or_else(|| default_due_input(ctx.now.date())),
            };
            let submission = board.submission(form.to_payload(TaskStatus::Pending))?;
            board.replace_tasks(session.submit(submission).await?);
            console.message("Task submitted.")?;
        }
        Command::Edit(args) => {
            let key = board.resolve(&args.id)?;
            let task = board
                .begin_edit(&key)
                .cloned()
                .ok_or_else(|| anyhow!("task not found: {key}"))?;

            let mut form = RemoteTaskForm::from_task(&task);
            if let Some(name) = args.name {
                form.name = name;
            }
            if let Some(category) = args.category {
                form.category = category;
            }
            if let Some(description) = args.description {
                form.description = description;
            }
            if let Some(priority) = args.priority {
                form.priority = priority;
            }
            if let Some(due) = args.due {
                form.due = due;
            }

            let submission = board.submission(form.to_payload(task.status))?;
            board.replace_tasks(session.submit(submission).await?);
            console.message("Task submitted.")?;
        }
        Command::Toggle { id } => {
            let key = board.resolve(&id)?;
            let task = board
                .find(&key)
                .cloned()
                .ok_or_else(|| anyhow!("task not found: {key}"))?;
            let done = if task.status.toggled().is_completed() {
                "Task completed."
            } else {
                "Task marked pending."
            };
            let refreshed = session.toggle_and_refresh(&task).await?;
            apply_refresh(&mut board, console, refreshed, done)?;
        }
        Command::Delete { id, yes } => {
            let key = board.resolve(&id)?;
            if !yes && !console.confirm(DELETE_CONFIRMATION)? {
                return console.message("Nothing deleted.");
            }
            let refreshed = session.delete_and_refresh(&key).await?;
            apply_refresh(&mut board, console, refreshed, "Task deleted.")?;
        }
    }

    renderer.write_task_list(&mut console.output, &board.view(ctx))
}

fn apply_refresh<R: BufRead, W: Write>(
    board: &mut Board<RemoteTask>,
    console: &mut Console<R, W>,
    refreshed: Option<Vec<RemoteTask>>,
    done: &str,
) -> anyhow::Result<()> {
    match refreshed {
        Some(tasks) => {
            board.replace_tasks(tasks);
            console.message(done)
        }
        None => console.message("The service did not apply the change."),
    }
}
