use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{self, Event};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use boxcode::app::{EventResult, Workbench, WorkbenchConfig};
use boxcode::kernel::services::adapters::settings::ensure_settings_at;
use boxcode::kernel::services::adapters::{
    ensure_settings_file, load_settings_from, AppMessage, AsyncRuntime, HttpProjectApi,
};
use boxcode::kernel::services::ports::Settings;
use boxcode::tui::terminal_guard::{ShutdownFlag, TerminalGuard};

/// Longest the loop sleeps waiting for input when no layout work is due.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Terminal editor for Python projects organized as files, classes and
/// methods.
#[derive(Parser)]
#[command(name = "boxcode")]
#[command(version)]
struct Args {
    /// Project server base URL (overrides the settings file)
    #[arg(long, env = "BOXCODE_SERVER_URL")]
    server_url: Option<String>,

    /// Directory the generated code is written to (default: current directory)
    #[arg(long, env = "BOXCODE_EXPORT_DIR")]
    export_dir: Option<PathBuf>,

    /// Settings file to use instead of the per-user one
    #[arg(long, env = "BOXCODE_SETTINGS")]
    settings: Option<PathBuf>,
}

fn load_settings(path: Option<PathBuf>) -> Settings {
    let path = match path {
        Some(path) => ensure_settings_at(&path).map(|()| path),
        None => ensure_settings_file(),
    };
    match path {
        Ok(path) => {
            tracing::info!(path = %path.display(), "settings file");
            load_settings_from(&path).unwrap_or_default()
        }
        Err(e) => {
            tracing::warn!(error = %e, "settings unavailable, using defaults");
            Settings::default()
        }
    }
}

#[cfg(unix)]
fn watch_signals(guard: &TerminalGuard, shutdown: &ShutdownFlag) {
    let watcher = boxcode::tui::terminal_guard::watch_termination_signals(
        guard.restore_handle(),
        shutdown.clone(),
    );
    if let Err(e) = watcher {
        tracing::warn!(error = %e, "signal handlers not installed");
    }
}

#[cfg(not(unix))]
fn watch_signals(_guard: &TerminalGuard, _shutdown: &ShutdownFlag) {}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let mut logging = boxcode::logging::init(None);
    let log_rx = logging.as_mut().and_then(|guard| guard.take_lines());

    let mut settings = load_settings(args.settings);
    if let Some(url) = args.server_url {
        settings.server_url = url;
    }
    let export_dir = match args.export_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    tracing::info!(
        server = %settings.server_url,
        export_dir = %export_dir.display(),
        "starting boxcode"
    );

    let (tx, rx) = mpsc::channel();
    let api = HttpProjectApi::new(settings.server_url.clone());
    let runtime = AsyncRuntime::new(tx, Arc::new(api))?;
    runtime.prepare_editor_library();

    let config = WorkbenchConfig::from_settings(&settings, export_dir);
    let mut workbench = Workbench::new(runtime, config, log_rx);

    let guard = TerminalGuard::enter()?;
    let shutdown = ShutdownFlag::new();
    watch_signals(&guard, &shutdown);

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let result = run(&mut terminal, &mut workbench, &rx, &shutdown);
    drop(guard);

    match &result {
        Ok(()) => tracing::info!("boxcode exited"),
        Err(e) => tracing::error!(error = %e, "boxcode exited with error"),
    }
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    workbench: &mut Workbench,
    rx: &Receiver<AppMessage>,
    shutdown: &ShutdownFlag,
) -> io::Result<()> {
    let mut dirty = true;
    loop {
        if shutdown.is_requested() {
            tracing::info!("shutdown requested");
            return Ok(());
        }

        for msg in rx.try_iter() {
            dirty |= workbench.handle_message(msg);
        }
        dirty |= workbench.tick(Instant::now());

        if dirty {
            terminal.draw(|frame| {
                workbench.render(frame, frame.area());
                if let Some(pos) = workbench.cursor_position() {
                    frame.set_cursor_position(pos);
                }
            })?;
            dirty = false;
        }

        let timeout = workbench
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .map_or(IDLE_POLL, |wait| wait.min(IDLE_POLL));
        if !event::poll(timeout)? {
            continue;
        }

        let event = event::read()?;
        match workbench.handle_event(&event) {
            EventResult::Quit => return Ok(()),
            EventResult::Consumed => dirty = true,
            EventResult::Ignored => dirty |= matches!(event, Event::Resize(_, _)),
        }
    }
}
