use crate::kernel::codegen::{generate_project, StoredCode};
use crate::kernel::services::ports::ProjectError;
use crate::kernel::state::{InputDialogKind, NoticeLevel, PendingLoad, DEFAULT_PROJECT_NAME};
use crate::kernel::{Action, Effect};

use super::DispatchResult;

impl super::Store {
    pub(super) fn reduce_project_action(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::SaveProject => {
                let name = self
                    .state
                    .persistence
                    .last_project_name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());
                self.state
                    .ui
                    .input_dialog
                    .open(InputDialogKind::SaveProject, name);
                DispatchResult::changed(true)
            }
            Action::ProjectSaved { message } => {
                tracing::info!(%message, "project saved");
                self.notify(NoticeLevel::Info, message);
                DispatchResult::changed(true)
            }
            Action::ProjectSaveFailed { error } => {
                tracing::warn!(error = %error, "project save failed");
                let message = match &error {
                    ProjectError::Rejected(m) => format!("Error: {m}"),
                    ProjectError::Network(_) => error.to_string(),
                };
                self.notify(NoticeLevel::Error, message);
                DispatchResult::changed(true)
            }
            Action::ListProjects => DispatchResult::with_effects(vec![Effect::ListProjects], false),
            Action::ProjectsListed { projects } => {
                let picker = &mut self.state.ui.project_picker;
                picker.visible = true;
                picker.projects = projects;
                picker.selected = 0;
                DispatchResult::changed(true)
            }
            Action::ProjectListFailed { error } => {
                tracing::warn!(error = %error, "project listing failed");
                let message = match &error {
                    ProjectError::Rejected(m) => format!("Error listing projects: {m}"),
                    ProjectError::Network(_) => error.to_string(),
                };
                self.notify(NoticeLevel::Error, message);
                DispatchResult::changed(true)
            }
            Action::PickerMoveSelection { delta } => {
                let picker = &mut self.state.ui.project_picker;
                if !picker.visible || picker.projects.is_empty() {
                    return DispatchResult::unchanged();
                }
                let last = picker.projects.len() as isize - 1;
                let next = (picker.selected as isize + delta).clamp(0, last) as usize;
                let changed = next != picker.selected;
                picker.selected = next;
                DispatchResult::changed(changed)
            }
            Action::PickerAccept => {
                let picker = &self.state.ui.project_picker;
                if !picker.visible {
                    return DispatchResult::unchanged();
                }
                match picker.projects.get(picker.selected).cloned() {
                    Some(filename) => self.begin_load(filename),
                    None => {
                        self.state.ui.project_picker = Default::default();
                        DispatchResult::changed(true)
                    }
                }
            }
            Action::PickerClose => {
                if !self.state.ui.project_picker.visible {
                    return DispatchResult::unchanged();
                }
                self.state.ui.project_picker = Default::default();
                DispatchResult::changed(true)
            }
            Action::LoadProject { filename } => self.begin_load(filename),
            Action::ProjectLoaded {
                request,
                filename,
                nodes,
            } => {
                if !self.is_current_load(request) {
                    tracing::debug!(request, %filename, "dropping stale project load");
                    return DispatchResult::unchanged();
                }
                self.state.persistence.pending_load = None;
                self.state.ui.project_picker = Default::default();

                match self.state.tree.replace_with_hierarchy(&nodes) {
                    Ok(discarded) => {
                        tracing::info!(
                            %filename,
                            boxes = self.state.tree.len(),
                            discarded = discarded.len(),
                            "project loaded"
                        );
                        self.state.ui.selected = self.state.tree.roots().first().copied();
                        self.state.ui.focus = crate::kernel::FocusTarget::Tree;
                        self.notify(NoticeLevel::Info, format!("Project '{filename}' loaded."));
                        let effects = if discarded.is_empty() {
                            Vec::new()
                        } else {
                            vec![Effect::ReleaseEditors(discarded)]
                        };
                        DispatchResult::with_effects(effects, true)
                    }
                    Err(e) => {
                        tracing::warn!(%filename, error = %e, "rejected malformed hierarchy");
                        self.notify(
                            NoticeLevel::Error,
                            format!("Error loading project: {e}"),
                        );
                        DispatchResult::changed(true)
                    }
                }
            }
            Action::ProjectLoadFailed { request, error } => {
                if !self.is_current_load(request) {
                    tracing::debug!(request, "dropping stale project load failure");
                    return DispatchResult::unchanged();
                }
                self.state.persistence.pending_load = None;
                tracing::warn!(error = %error, "project load failed");
                let message = match &error {
                    ProjectError::Rejected(m) => format!("Error loading project: {m}"),
                    ProjectError::Network(_) => error.to_string(),
                };
                self.notify(NoticeLevel::Error, message);
                DispatchResult::changed(true)
            }
            Action::ShowGeneratedCode { code } => {
                let preview = &mut self.state.ui.code_preview;
                preview.visible = true;
                preview.code = code;
                preview.scroll = 0;
                DispatchResult::changed(true)
            }
            Action::PreviewScroll { delta } => {
                let preview = &mut self.state.ui.code_preview;
                if !preview.visible {
                    return DispatchResult::unchanged();
                }
                let max = preview.code.lines().count().saturating_sub(1) as isize;
                let next = (preview.scroll as isize + delta).clamp(0, max.max(0)) as usize;
                let changed = next != preview.scroll;
                preview.scroll = next;
                DispatchResult::changed(changed)
            }
            Action::PreviewClose => {
                if !self.state.ui.code_preview.visible {
                    return DispatchResult::unchanged();
                }
                self.state.ui.code_preview = Default::default();
                DispatchResult::changed(true)
            }
            Action::ExportGeneratedCode => {
                let content = generate_project(&self.state.tree, &StoredCode);
                let path = self.state.export.dir.join(&self.state.export.file_name);
                DispatchResult::with_effects(
                    vec![Effect::ExportGeneratedCode { path, content }],
                    false,
                )
            }
            Action::CodeExported { path } => {
                tracing::info!(path = %path.display(), "generated code exported");
                self.notify(
                    NoticeLevel::Info,
                    format!("Generated code written to {}", path.display()),
                );
                DispatchResult::changed(true)
            }
            Action::CodeExportFailed { path, error } => {
                tracing::warn!(path = %path.display(), %error, "export failed");
                self.notify(
                    NoticeLevel::Error,
                    format!("Failed to write {}: {error}", path.display()),
                );
                DispatchResult::changed(true)
            }
            _ => DispatchResult::unchanged(),
        }
    }

    /// Supersedes any load still in flight.
    fn begin_load(&mut self, filename: String) -> DispatchResult {
        let persistence = &mut self.state.persistence;
        persistence.next_request += 1;
        let request = persistence.next_request;
        persistence.pending_load = Some(PendingLoad {
            request,
            filename: filename.clone(),
        });
        self.state.ui.project_picker = Default::default();
        tracing::info!(request, %filename, "loading project");
        DispatchResult::with_effects(vec![Effect::LoadProject { request, filename }], true)
    }

    fn is_current_load(&self, request: u64) -> bool {
        self.state
            .persistence
            .pending_load
            .as_ref()
            .is_some_and(|p| p.request == request)
    }
}
