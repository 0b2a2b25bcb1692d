use std::io;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use super::message::AppMessage;
use crate::kernel::services::ports::{ProjectApi, SaveRequest};
use crate::models::HierarchyNode;
use crate::ui::editor::EditorLibrary;

pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
    tx: Sender<AppMessage>,
    api: Arc<dyn ProjectApi>,
}

impl AsyncRuntime {
    pub fn new(tx: Sender<AppMessage>, api: Arc<dyn ProjectApi>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self { runtime, tx, api })
    }

    pub fn tokio_handle(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }

    pub fn save_project(&self, name: String, data: Vec<HierarchyNode>) {
        let tx = self.tx.clone();
        let api = self.api.clone();
        self.runtime.spawn(async move {
            let result = api.save(SaveRequest { name, data }).await;
            let _ = tx.send(AppMessage::ProjectSaved { result });
        });
    }

    pub fn list_projects(&self) {
        let tx = self.tx.clone();
        let api = self.api.clone();
        self.runtime.spawn(async move {
            let result = api.list().await;
            let _ = tx.send(AppMessage::ProjectsListed { result });
        });
    }

    pub fn load_project(&self, request: u64, filename: String) {
        let tx = self.tx.clone();
        let api = self.api.clone();
        self.runtime.spawn(async move {
            let result = api.load(&filename).await;
            let _ = tx.send(AppMessage::ProjectLoaded {
                request,
                filename,
                result,
            });
        });
    }

    pub fn export_code(&self, path: PathBuf, content: String) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = tokio::fs::write(&path, content.as_bytes())
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppMessage::CodeExported { path, result });
        });
    }

    /// Editors cannot be built until the grammar is loaded.
    pub fn prepare_editor_library(&self) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let library = match tokio::task::spawn_blocking(EditorLibrary::python).await {
                Ok(library) => library,
                Err(e) => {
                    tracing::error!(error = %e, "editor library task failed");
                    return;
                }
            };
            if library.parser().is_none() {
                tracing::error!(language = library.language(), "grammar rejected by parser");
                return;
            }
            tracing::info!(
                language = library.language(),
                node_kinds = library.node_kind_count(),
                "editor library ready"
            );
            let _ = tx.send(AppMessage::EditorLibraryReady(Arc::new(library)));
        });
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime.rs"]
mod tests;
