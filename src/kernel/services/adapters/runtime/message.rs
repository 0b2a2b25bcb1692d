use std::path::PathBuf;
use std::sync::Arc;

use crate::kernel::services::ports::ProjectResult;
use crate::models::HierarchyNode;
use crate::ui::editor::EditorLibrary;

pub enum AppMessage {
    ProjectSaved {
        result: ProjectResult<String>,
    },
    ProjectsListed {
        result: ProjectResult<Vec<String>>,
    },
    ProjectLoaded {
        request: u64,
        filename: String,
        result: ProjectResult<Vec<HierarchyNode>>,
    },
    CodeExported {
        path: PathBuf,
        result: Result<(), String>,
    },
    EditorLibraryReady(Arc<EditorLibrary>),
}
