//! The terminal workbench: routes input to the kernel, runs effects, keeps
//! the scene and the editors in step, and draws frames.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::event::Event;
use ratatui::layout::Rect;
use ratatui::Frame;

use super::theme::UiTheme;
use crate::kernel::services::adapters::{AppMessage, AsyncRuntime};
use crate::kernel::services::ports::Settings;
use crate::kernel::{Action as KernelAction, AppState, ExportConfig, FocusTarget, Store};
use crate::models::BoxId;
use crate::tui::clipboard::{Clipboard, Passthrough};
use crate::ui::editor::{CodeEditorFactory, EditorOptions, EditorRegistry};
use crate::ui::scene::{HitTree, Renderer};

mod bridge;
mod dialogs;
mod input;
mod render;

const LOG_BUFFER_CAP: usize = 500;
const MAX_LOG_DRAIN_PER_TICK: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Consumed,
    Ignored,
    Quit,
}

impl EventResult {
    pub fn is_consumed(self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}

#[derive(Debug, Clone)]
pub struct WorkbenchConfig {
    pub export: ExportConfig,
    pub layout_settle: Duration,
    pub theme: UiTheme,
    pub editor: EditorOptions,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            export: ExportConfig::default(),
            layout_settle: Duration::from_millis(
                crate::kernel::services::ports::settings::DEFAULT_LAYOUT_SETTLE_MS,
            ),
            theme: UiTheme::default(),
            editor: EditorOptions::default(),
        }
    }
}

impl WorkbenchConfig {
    pub fn from_settings(settings: &Settings, export_dir: PathBuf) -> Self {
        Self {
            export: ExportConfig {
                dir: export_dir,
                file_name: settings.export_file_name.clone(),
            },
            layout_settle: Duration::from_millis(settings.layout_settle_ms),
            theme: UiTheme::from_settings(&settings.theme),
            editor: EditorOptions::default(),
        }
    }
}

type ClipboardSink = Box<dyn Write + Send>;

pub struct Workbench {
    store: Store,
    renderer: Renderer,
    registry: EditorRegistry<CodeEditorFactory>,
    runtime: AsyncRuntime,
    clipboard: Clipboard<ClipboardSink>,
    hits: HitTree,
    theme: UiTheme,
    log_rx: Option<Receiver<String>>,
    logs: VecDeque<String>,
    scene_scroll: u32,
    last_selected: Option<BoxId>,
    last_scene_area: Option<Rect>,
    last_preview_rows: u16,
    cursor: Option<(u16, u16)>,
}

impl Workbench {
    pub fn new(
        runtime: AsyncRuntime,
        config: WorkbenchConfig,
        log_rx: Option<Receiver<String>>,
    ) -> Self {
        let stdout: ClipboardSink = Box::new(io::stdout());
        Self {
            store: Store::new(AppState::new(config.export)),
            renderer: Renderer::new(config.layout_settle),
            registry: EditorRegistry::new(config.editor),
            runtime,
            clipboard: Clipboard::new(stdout, Passthrough::detect()),
            hits: HitTree::new(),
            theme: config.theme,
            log_rx,
            logs: VecDeque::with_capacity(64),
            scene_scroll: 0,
            last_selected: None,
            last_scene_area: None,
            last_preview_rows: 1,
            cursor: None,
        }
    }

    /// Redirects OSC 52 output, mainly so tests can observe it.
    pub fn set_clipboard(&mut self, sink: ClipboardSink, passthrough: Passthrough) {
        self.clipboard = Clipboard::new(sink, passthrough);
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn focus(&self) -> FocusTarget {
        self.store.state().ui.focus
    }

    pub fn selected(&self) -> Option<BoxId> {
        self.store.state().ui.selected
    }

    pub fn registry(&self) -> &EditorRegistry<CodeEditorFactory> {
        &self.registry
    }

    pub fn runtime(&self) -> &AsyncRuntime {
        &self.runtime
    }

    pub fn logs(&self) -> impl Iterator<Item = &String> {
        self.logs.iter()
    }

    /// Applies one async result. Returns whether a redraw is needed.
    pub fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::ProjectSaved { result } => match result {
                Ok(message) => self.dispatch_kernel(KernelAction::ProjectSaved { message }),
                Err(error) => {
                    tracing::warn!(error = %error, "save failed");
                    self.dispatch_kernel(KernelAction::ProjectSaveFailed { error })
                }
            },
            AppMessage::ProjectsListed { result } => match result {
                Ok(projects) => self.dispatch_kernel(KernelAction::ProjectsListed { projects }),
                Err(error) => {
                    tracing::warn!(error = %error, "listing projects failed");
                    self.dispatch_kernel(KernelAction::ProjectListFailed { error })
                }
            },
            AppMessage::ProjectLoaded {
                request,
                filename,
                result,
            } => match result {
                Ok(nodes) => self.dispatch_kernel(KernelAction::ProjectLoaded {
                    request,
                    filename,
                    nodes,
                }),
                Err(error) => {
                    tracing::warn!(filename = %filename, error = %error, "load failed");
                    self.dispatch_kernel(KernelAction::ProjectLoadFailed { request, error })
                }
            },
            AppMessage::CodeExported { path, result } => match result {
                Ok(()) => self.dispatch_kernel(KernelAction::CodeExported { path }),
                Err(error) => {
                    tracing::error!(path = %path.display(), error = %error, "export failed");
                    self.dispatch_kernel(KernelAction::CodeExportFailed { path, error })
                }
            },
            AppMessage::EditorLibraryReady(library) => {
                let realized = self.registry.mark_ready(CodeEditorFactory::new(library));
                tracing::debug!(count = realized.len(), "parked editors realized");
                true
            }
        }
    }

    /// Fires settled layout work and drains log lines. Returns whether a
    /// redraw is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let touched = self
            .renderer
            .fire_due(&self.store.state().tree, &mut self.registry, now);
        let logged = self.drain_logs();
        !touched.is_empty() || logged
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.renderer.next_deadline()
    }

    pub fn handle_event(&mut self, event: &Event) -> EventResult {
        input::handle_event(self, event)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.render_at(frame, area, Instant::now());
    }

    pub fn render_at(&mut self, frame: &mut Frame, area: Rect, now: Instant) {
        render::render(self, frame, area, now);
    }

    /// Terminal cell for the caret of the focused editor, if any.
    pub fn cursor_position(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    fn drain_logs(&mut self) -> bool {
        let Some(rx) = self.log_rx.as_ref() else {
            return false;
        };
        let mut any = false;
        for line in rx.try_iter().take(MAX_LOG_DRAIN_PER_TICK) {
            self.logs.push_back(line);
            any = true;
        }
        while self.logs.len() > LOG_BUFFER_CAP {
            self.logs.pop_front();
        }
        any
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/app/workbench.rs"]
mod tests;
