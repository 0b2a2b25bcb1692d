//! Tracing setup: a daily log file plus a line feed for the status bar.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "boxcode.log";
pub const DEFAULT_FILTER: &str = "boxcode=info";

pub struct LoggingGuard {
    _flush: WorkerGuard,
    log_dir: PathBuf,
    lines: Option<Receiver<String>>,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// The receiving end of the status-bar feed. Only the first caller gets it.
    pub fn take_lines(&mut self) -> Option<Receiver<String>> {
        self.lines.take()
    }
}

/// Buffers one formatted event and forwards it line by line when dropped.
/// tracing-subscriber creates a fresh writer per event.
struct LineForwarder {
    pending: Vec<u8>,
    tx: Sender<String>,
}

impl Write for LineForwarder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LineForwarder {
    fn drop(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        for line in String::from_utf8_lossy(&self.pending).lines() {
            if !line.trim().is_empty() {
                let _ = self.tx.send(line.to_string());
            }
        }
    }
}

#[derive(Clone)]
struct SplitWriter {
    file: NonBlocking,
    tx: Sender<String>,
}

struct SplitHandle {
    file: NonBlocking,
    feed: LineForwarder,
}

impl<'a> MakeWriter<'a> for SplitWriter {
    type Writer = SplitHandle;

    fn make_writer(&'a self) -> Self::Writer {
        SplitHandle {
            file: self.file.make_writer(),
            feed: LineForwarder {
                pending: Vec::with_capacity(160),
                tx: self.tx.clone(),
            },
        }
    }
}

impl Write for SplitHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.file.write(buf)?;
        let _ = self.feed.write_all(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn resolve_log_dir() -> Option<PathBuf> {
    crate::kernel::services::adapters::ensure_log_dir()
        .or_else(|_| -> io::Result<PathBuf> {
            let dir = std::env::temp_dir().join("boxcode").join("logs");
            std::fs::create_dir_all(&dir)?;
            Ok(dir)
        })
        .ok()
}

/// Installs the global subscriber. `RUST_LOG` wins over `default_filter`.
/// Returns `None` when no log directory is writable or a subscriber is
/// already installed.
pub fn init(default_filter: Option<&str>) -> Option<LoggingGuard> {
    let log_dir = resolve_log_dir()?;
    init_in(&log_dir, default_filter)
}

pub fn init_in(log_dir: &Path, default_filter: Option<&str>) -> Option<LoggingGuard> {
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    let (file, flush) = tracing_appender::non_blocking(appender);
    let (tx, lines) = mpsc::channel::<String>();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter.unwrap_or(DEFAULT_FILTER)));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(SplitWriter { file, tx })
            .with_ansi(false)
            .with_target(true),
    );
    if subscriber.try_init().is_err() {
        return None;
    }

    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "panic");
    }));
    tracing::info!(log_dir = %log_dir.display(), "logging initialized");

    Some(LoggingGuard {
        _flush: flush,
        log_dir: log_dir.to_path_buf(),
        lines: Some(lines),
    })
}

#[cfg(test)]
#[path = "../tests/unit/logging.rs"]
mod tests;
