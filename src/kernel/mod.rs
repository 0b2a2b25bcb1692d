//! Headless application core (state/action/effect).

pub mod action;
pub mod codegen;
pub mod effect;
pub mod services;
pub mod state;
pub mod store;

pub use action::Action;
pub use codegen::{generate_box, generate_project, CodeSource, StoredCode};
pub use effect::Effect;
pub use state::{
    AppState, CodePreviewState, ConfirmDialogState, ExportConfig, FocusTarget, InputDialogKind,
    InputDialogState, Notice, NoticeLevel, NoticeState, PendingAction, PendingLoad,
    PersistenceState, ProjectPickerState, UiState,
};
pub use store::{DispatchResult, Store};
