use std::collections::VecDeque;
use std::path::PathBuf;

use crate::models::{BoxId, BoxKind, BoxTree};

pub const DEFAULT_PROJECT_NAME: &str = "my_project";
pub const DEFAULT_EXPORT_FILE_NAME: &str = "generated_code.py";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Tree,
    Editor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputDialogKind {
    NewFile,
    NewChild { parent: BoxId, kind: BoxKind },
    RenameBox { id: BoxId },
    SaveProject,
}

impl InputDialogKind {
    pub fn prompt(&self) -> &'static str {
        match self {
            InputDialogKind::NewFile => "Enter file name (e.g., main.py):",
            InputDialogKind::NewChild {
                kind: BoxKind::Class,
                ..
            } => "Enter class name:",
            InputDialogKind::NewChild { .. } => "Enter method name (e.g., my_method or __init__):",
            InputDialogKind::RenameBox { .. } => "Rename box:",
            InputDialogKind::SaveProject => "Enter project name to save:",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputDialogState {
    pub visible: bool,
    pub title: String,
    pub value: String,
    pub cursor: usize,
    pub kind: Option<InputDialogKind>,
}

impl InputDialogState {
    pub fn open(&mut self, kind: InputDialogKind, value: String) {
        self.visible = true;
        self.title = kind.prompt().to_string();
        self.cursor = value.len();
        self.value = value;
        self.kind = Some(kind);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteBox { id: BoxId },
}

#[derive(Debug, Clone, Default)]
pub struct ConfirmDialogState {
    pub visible: bool,
    pub message: String,
    pub on_confirm: Option<PendingAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Blocking alerts, shown one at a time until dismissed.
#[derive(Debug, Clone, Default)]
pub struct NoticeState {
    queue: VecDeque<Notice>,
}

impl NoticeState {
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.queue.push_back(Notice {
            level,
            message: message.into(),
        });
    }

    pub fn current(&self) -> Option<&Notice> {
        self.queue.front()
    }

    pub fn dismiss(&mut self) -> bool {
        self.queue.pop_front().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPickerState {
    pub visible: bool,
    pub projects: Vec<String>,
    pub selected: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CodePreviewState {
    pub visible: bool,
    pub code: String,
    pub scroll: usize,
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub focus: FocusTarget,
    pub selected: Option<BoxId>,
    pub input_dialog: InputDialogState,
    pub confirm_dialog: ConfirmDialogState,
    pub notices: NoticeState,
    pub project_picker: ProjectPickerState,
    pub code_preview: CodePreviewState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            focus: FocusTarget::Tree,
            selected: None,
            input_dialog: InputDialogState::default(),
            confirm_dialog: ConfirmDialogState::default(),
            notices: NoticeState::default(),
            project_picker: ProjectPickerState::default(),
            code_preview: CodePreviewState::default(),
        }
    }
}

impl UiState {
    /// A modal that swallows input is open.
    pub fn has_modal(&self) -> bool {
        self.input_dialog.visible
            || self.confirm_dialog.visible
            || !self.notices.is_empty()
            || self.project_picker.visible
            || self.code_preview.visible
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    pub request: u64,
    pub filename: String,
}

#[derive(Debug, Clone, Default)]
pub struct PersistenceState {
    pub next_request: u64,
    pub pending_load: Option<PendingLoad>,
    pub last_project_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub dir: PathBuf,
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub tree: BoxTree,
    pub ui: UiState,
    pub persistence: PersistenceState,
    pub export: ExportConfig,
}

impl AppState {
    pub fn new(export: ExportConfig) -> Self {
        Self {
            export,
            ..Self::default()
        }
    }
}
