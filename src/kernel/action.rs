use std::path::PathBuf;

use crate::kernel::services::ports::ProjectError;
use crate::kernel::state::NoticeLevel;
use crate::models::{BoxId, HierarchyNode};

#[derive(Debug, Clone)]
pub enum Action {
    AddFile,
    AddChild {
        parent: BoxId,
    },
    RenameBox {
        id: BoxId,
    },
    DeleteBox {
        id: BoxId,
    },
    ToggleExpand {
        id: BoxId,
    },
    SelectBox {
        id: BoxId,
    },
    MoveSelection {
        delta: isize,
    },
    FocusEditor,
    FocusTree,
    SyncCode {
        id: BoxId,
        code: String,
    },
    CopyCode {
        id: BoxId,
    },
    Notify {
        level: NoticeLevel,
        message: String,
    },
    NoticeDismiss,
    InputDialogAppend(char),
    InputDialogBackspace,
    InputDialogCursorLeft,
    InputDialogCursorRight,
    InputDialogAccept,
    InputDialogCancel,
    ConfirmDialogAccept,
    ConfirmDialogCancel,
    SaveProject,
    ProjectSaved {
        message: String,
    },
    ProjectSaveFailed {
        error: ProjectError,
    },
    ListProjects,
    ProjectsListed {
        projects: Vec<String>,
    },
    ProjectListFailed {
        error: ProjectError,
    },
    PickerMoveSelection {
        delta: isize,
    },
    PickerAccept,
    PickerClose,
    LoadProject {
        filename: String,
    },
    ProjectLoaded {
        request: u64,
        filename: String,
        nodes: Vec<HierarchyNode>,
    },
    ProjectLoadFailed {
        request: u64,
        error: ProjectError,
    },
    ShowGeneratedCode {
        code: String,
    },
    PreviewScroll {
        delta: isize,
    },
    PreviewClose,
    ExportGeneratedCode,
    CodeExported {
        path: PathBuf,
    },
    CodeExportFailed {
        path: PathBuf,
        error: String,
    },
}
