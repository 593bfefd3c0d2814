//! `TaskDeck` — terminal-native personal task organizer.
//!
//! Launches the TUI against a task store. Configuration via CLI flags,
//! environment variables, or config file (`~/.config/taskdeck/config.toml`).
//!
//! ```bash
//! # Guest session against a local store
//! cargo run --bin taskdeck
//!
//! # Signed-in session against a remote store
//! cargo run --bin taskdeck -- --api-url http://tasks.example.com:9000 \
//!     --email alice@example.com
//!
//! # Or via environment variables
//! TASKDECK_API=http://127.0.0.1:9000 TASKDECK_EMAIL=alice@example.com cargo run
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_appender::non_blocking::WorkerGuard;

use taskdeck::app::{App, AppCommand};
use taskdeck::config::{CliArgs, ClientConfig};
use taskdeck::gateway::HttpTaskGateway;
use taskdeck::identity::Session;
use taskdeck::tasks::TaskCollectionManager;
use taskdeck::ui::{self, ViewState};

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > config file > env > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&config.log_level, cli.log_file.as_deref());

    tracing::info!("taskdeck starting");

    // Resolve the session: signed-in email, or guest/incognito fallback.
    let session = match &config.email {
        Some(email) => match Session::authenticated(email) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => Session::guest(&config.guest_name),
    };
    tracing::info!(owner = %session.owner(), guest = session.is_guest(), "session resolved");

    let gateway = Arc::new(HttpTaskGateway::with_timeout(
        &config.api_url,
        config.request_timeout,
    ));
    let manager = Arc::new(TaskCollectionManager::with_capacity(
        gateway,
        config.max_tasks_per_user,
    ));

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, &manager, session, &config).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("taskdeck exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the
/// terminal). Returns a [`WorkerGuard`] that must be held until shutdown to
/// ensure all buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskdeck.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop: draw a frame from manager snapshots, poll for
/// input, dispatch resulting commands.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    manager: &Arc<TaskCollectionManager>,
    session: Session,
    config: &ClientConfig,
) -> io::Result<()> {
    let mut app = App::new(session);

    // Kick off the initial load; completions surface on later frames.
    dispatch(manager, &app, AppCommand::Reload);

    loop {
        // Step 1: Snapshot the collection once per frame.
        let view_tasks = manager.filtered_view();
        app.clamp_selection(view_tasks.len());
        let view = ViewState {
            tasks: &view_tasks,
            filter_label: manager.filter_repeat().label(),
            task_count: manager.len(),
            capacity: manager.capacity(),
            is_loading: manager.is_loading(),
            error: manager.last_error().map(|e| e.to_string()),
            today: Local::now().date_naive(),
        };

        // Step 2: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app, &view))?;

        // Step 3: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(command) = app.handle_key_event(key, &view_tasks) {
                dispatch(manager, &app, command);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Apply a command: view-state commands act synchronously, remote commands
/// are spawned so the UI keeps drawing while they are in flight. Failures
/// land in the manager's error slot and render on the next frame.
fn dispatch(manager: &Arc<TaskCollectionManager>, app: &App, command: AppCommand) {
    match command {
        AppCommand::CycleFilter => {
            manager.set_filter_repeat(manager.filter_repeat().cycled());
        }
        AppCommand::SetSearch(query) => manager.set_search_query(query),
        AppCommand::DismissError => manager.dismiss_error(),
        AppCommand::Reload => {
            let manager = Arc::clone(manager);
            let owner = app.owner().clone();
            tokio::spawn(async move {
                let _ = manager.load(&owner).await;
            });
        }
        AppCommand::Create(draft) => {
            let manager = Arc::clone(manager);
            let owner = app.owner().clone();
            tokio::spawn(async move {
                let _ = manager.create(&owner, draft).await;
            });
        }
        AppCommand::Update(task_id, patch) => {
            let manager = Arc::clone(manager);
            let owner = app.owner().clone();
            tokio::spawn(async move {
                let _ = manager.update(&owner, &task_id, patch).await;
            });
        }
        AppCommand::Delete(task_id) => {
            let manager = Arc::clone(manager);
            let owner = app.owner().clone();
            tokio::spawn(async move {
                let _ = manager.delete(&owner, &task_id).await;
            });
        }
    }
}
