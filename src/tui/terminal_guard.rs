use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Enters and leaves the full-screen mode the box editor runs in.
pub trait ScreenMode: Send + Sync + 'static {
    fn enter(&self) -> io::Result<()>;
    fn leave(&self) -> io::Result<()>;
}

/// Raw mode on the alternate screen with mouse capture, so box headers and
/// toolbar buttons receive clicks. Pastes arrive as one event.
#[derive(Debug, Default)]
pub struct FullScreen;

impl ScreenMode for FullScreen {
    fn enter(&self) -> io::Result<()> {
        use crossterm::{
            event::{EnableBracketedPaste, EnableMouseCapture},
            execute,
            terminal::{enable_raw_mode, EnterAlternateScreen},
        };

        enable_raw_mode()?;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste
        )
    }

    fn leave(&self) -> io::Result<()> {
        use crossterm::{
            cursor::Show,
            event::{DisableBracketedPaste, DisableMouseCapture},
            execute,
            terminal::{disable_raw_mode, LeaveAlternateScreen},
        };

        // Every step runs; the first failure is reported.
        let raw = disable_raw_mode();
        let screen = execute!(
            io::stdout(),
            DisableBracketedPaste,
            LeaveAlternateScreen,
            DisableMouseCapture,
            Show
        );
        raw.and(screen)
    }
}

/// Cloneable handle that puts the terminal back exactly once.
#[derive(Clone)]
pub struct ScreenRestore {
    done: Arc<AtomicBool>,
    mode: Arc<dyn ScreenMode>,
}

impl ScreenRestore {
    pub fn restore(&self) -> io::Result<()> {
        if self.done.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.mode.leave()
    }

    pub fn is_restored(&self) -> bool {
        self.done.load(Ordering::SeqCst)
    }
}

pub struct TerminalGuard {
    restore: ScreenRestore,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        Self::with_mode(Arc::new(FullScreen))
    }

    pub fn with_mode(mode: Arc<dyn ScreenMode>) -> io::Result<Self> {
        mode.enter()?;
        Ok(Self {
            restore: ScreenRestore {
                done: Arc::new(AtomicBool::new(false)),
                mode,
            },
        })
    }

    pub fn restore_handle(&self) -> ScreenRestore {
        self.restore.clone()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = self.restore.restore() {
            tracing::warn!(error = %e, "terminal restore failed");
        }
    }
}

/// Set by the signal thread; the main loop exits once it sees it.
#[derive(Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How long the main loop gets to wind down after SIGINT/SIGTERM before the
/// process is forced out.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

pub fn exit_code_for_signal(signal: i32) -> i32 {
    128 + signal
}

#[cfg(unix)]
pub fn watch_termination_signals(
    restore: ScreenRestore,
    shutdown: ShutdownFlag,
) -> io::Result<std::thread::JoinHandle<()>> {
    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    Ok(std::thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            tracing::info!(signal, "termination signal received");
            shutdown.request();

            std::thread::sleep(SHUTDOWN_GRACE);
            if restore.is_restored() {
                return;
            }
            let _ = restore.restore();
            std::process::exit(exit_code_for_signal(signal));
        }
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/tui/terminal_guard.rs"]
mod tests;
