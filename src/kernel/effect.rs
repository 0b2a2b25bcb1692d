use std::path::PathBuf;

use crate::models::BoxId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SaveProject {
        name: String,
    },
    ListProjects,
    LoadProject {
        request: u64,
        filename: String,
    },
    /// Dispose the editor widgets of boxes that are about to leave the store.
    ReleaseEditors(Vec<BoxId>),
    CopyBoxCode {
        id: BoxId,
    },
    ExportGeneratedCode {
        path: PathBuf,
        content: String,
    },
}
