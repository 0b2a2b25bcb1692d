use super::Workbench;
use crate::kernel::{
    generate_project, Action as KernelAction, CodeSource, Effect as KernelEffect, NoticeLevel,
};
use crate::models::BoxId;
use crate::ui::editor::EditorWidget;

impl Workbench {
    pub(super) fn dispatch_kernel(&mut self, action: KernelAction) -> bool {
        let result = self.store.dispatch(action);
        for effect in result.effects {
            self.run_effect(effect);
        }
        result.state_changed
    }

    fn run_effect(&mut self, effect: KernelEffect) {
        match effect {
            KernelEffect::SaveProject { name } => {
                self.sync_live_code();
                let data = self.store.state().tree.to_hierarchy();
                tracing::info!(name = %name, roots = data.len(), "saving project");
                self.runtime.save_project(name, data);
            }
            KernelEffect::ListProjects => self.runtime.list_projects(),
            KernelEffect::LoadProject { request, filename } => {
                tracing::info!(request, filename = %filename, "loading project");
                self.runtime.load_project(request, filename);
            }
            KernelEffect::ReleaseEditors(ids) => {
                self.renderer.release(&ids, &mut self.registry);
            }
            KernelEffect::CopyBoxCode { id } => self.copy_box_code(id),
            KernelEffect::ExportGeneratedCode { path, content } => {
                self.runtime.export_code(path, content);
            }
        }
    }

    /// Copies the text of live widgets back into their box records.
    pub(super) fn sync_live_code(&mut self) -> bool {
        let mut changed = false;
        for id in self.registry.live_ids() {
            let Some(code) = self.registry.get_editor(id).map(|w| w.value()) else {
                continue;
            };
            let stale = self
                .store
                .state()
                .tree
                .get(id)
                .is_some_and(|record| record.code != code);
            if stale {
                changed |= self.dispatch_kernel(KernelAction::SyncCode { id, code });
            }
        }
        changed
    }

    pub(super) fn sync_box_code(&mut self, id: BoxId) -> bool {
        let Some(code) = self.registry.live_code(id) else {
            return false;
        };
        self.dispatch_kernel(KernelAction::SyncCode { id, code })
    }

    pub(super) fn show_generated_code(&mut self) -> bool {
        let code = generate_project(&self.store.state().tree, &self.registry);
        self.dispatch_kernel(KernelAction::ShowGeneratedCode { code })
    }

    pub(super) fn export_generated_code(&mut self) -> bool {
        self.sync_live_code();
        self.dispatch_kernel(KernelAction::ExportGeneratedCode)
    }

    fn copy_box_code(&mut self, id: BoxId) {
        let Some(record) = self.store.state().tree.get(id) else {
            return;
        };
        let title = record.title.clone();
        let code = self
            .registry
            .live_code(id)
            .unwrap_or_else(|| record.code.clone());

        let (level, message) = match self.clipboard.copy(&code) {
            Ok(bytes) => {
                tracing::debug!(id = %id, bytes, "copied box code");
                (NoticeLevel::Info, format!("Copied code of '{title}' to clipboard."))
            }
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "copy failed");
                (NoticeLevel::Error, format!("Failed to copy code: {e}"))
            }
        };
        self.dispatch_kernel(KernelAction::Notify { level, message });
    }
}
