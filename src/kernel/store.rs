use crate::models::BoxId;

use super::state::{InputDialogKind, NoticeLevel, PendingAction};
use super::{Action, AppState, Effect, FocusTarget};

mod input_dialog;
mod project;

pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: false,
        }
    }

    fn changed(state_changed: bool) -> Self {
        Self {
            effects: Vec::new(),
            state_changed,
        }
    }

    fn with_effects(effects: Vec<Effect>, state_changed: bool) -> Self {
        Self {
            effects,
            state_changed,
        }
    }
}

pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::AddFile => {
                self.state
                    .ui
                    .input_dialog
                    .open(InputDialogKind::NewFile, String::new());
                DispatchResult::changed(true)
            }
            Action::AddChild { parent } => {
                let Some(kind) = self
                    .state
                    .tree
                    .get(parent)
                    .and_then(|record| record.kind.child_kind())
                else {
                    return DispatchResult::unchanged();
                };
                self.state
                    .ui
                    .input_dialog
                    .open(InputDialogKind::NewChild { parent, kind }, String::new());
                DispatchResult::changed(true)
            }
            Action::RenameBox { id } => {
                let Some(title) = self.state.tree.get(id).map(|r| r.title.clone()) else {
                    return DispatchResult::unchanged();
                };
                self.state
                    .ui
                    .input_dialog
                    .open(InputDialogKind::RenameBox { id }, title);
                DispatchResult::changed(true)
            }
            Action::DeleteBox { id } => {
                let Some(title) = self.state.tree.get(id).map(|r| r.title.clone()) else {
                    return DispatchResult::unchanged();
                };
                let dialog = &mut self.state.ui.confirm_dialog;
                dialog.visible = true;
                dialog.message =
                    format!("Are you sure you want to delete '{title}' and all its contents?");
                dialog.on_confirm = Some(PendingAction::DeleteBox { id });
                DispatchResult::changed(true)
            }
            Action::ToggleExpand { id } => match self.state.tree.toggle_expanded(id) {
                Ok(expanded) => {
                    self.state.ui.selected = Some(id);
                    if !expanded && self.state.ui.focus == FocusTarget::Editor {
                        self.state.ui.focus = FocusTarget::Tree;
                    }
                    DispatchResult::changed(true)
                }
                Err(e) => {
                    tracing::debug!(error = %e, "toggle_expand ignored");
                    DispatchResult::unchanged()
                }
            },
            Action::SelectBox { id } => {
                if !self.state.tree.contains(id) {
                    return DispatchResult::unchanged();
                }
                let prev = self.state.ui.selected.replace(id);
                DispatchResult::changed(prev != Some(id))
            }
            Action::MoveSelection { delta } => DispatchResult::changed(self.move_selection(delta)),
            Action::FocusEditor => {
                let expanded = self
                    .state
                    .ui
                    .selected
                    .and_then(|id| self.state.tree.get(id))
                    .is_some_and(|r| r.expanded);
                if !expanded || self.state.ui.focus == FocusTarget::Editor {
                    return DispatchResult::unchanged();
                }
                self.state.ui.focus = FocusTarget::Editor;
                DispatchResult::changed(true)
            }
            Action::FocusTree => {
                let prev = self.state.ui.focus;
                self.state.ui.focus = FocusTarget::Tree;
                DispatchResult::changed(prev != FocusTarget::Tree)
            }
            Action::SyncCode { id, code } => {
                DispatchResult::changed(self.state.tree.set_code(id, code).unwrap_or(false))
            }
            Action::CopyCode { id } => {
                if !self.state.tree.contains(id) {
                    return DispatchResult::unchanged();
                }
                DispatchResult::with_effects(vec![Effect::CopyBoxCode { id }], false)
            }
            Action::Notify { level, message } => {
                self.state.ui.notices.push(level, message);
                DispatchResult::changed(true)
            }
            Action::NoticeDismiss => DispatchResult::changed(self.state.ui.notices.dismiss()),
            Action::ConfirmDialogAccept => {
                let dialog = &mut self.state.ui.confirm_dialog;
                if !dialog.visible {
                    return DispatchResult::unchanged();
                }
                let pending = dialog.on_confirm.take();
                *dialog = Default::default();
                match pending {
                    Some(PendingAction::DeleteBox { id }) => self.delete_subtree(id),
                    None => DispatchResult::changed(true),
                }
            }
            Action::ConfirmDialogCancel => {
                let dialog = &mut self.state.ui.confirm_dialog;
                if !dialog.visible {
                    return DispatchResult::unchanged();
                }
                *dialog = Default::default();
                DispatchResult::changed(true)
            }
            action @ (Action::InputDialogAppend(_)
            | Action::InputDialogBackspace
            | Action::InputDialogCursorLeft
            | Action::InputDialogCursorRight
            | Action::InputDialogAccept
            | Action::InputDialogCancel) => self.reduce_input_dialog_action(action),
            other => self.reduce_project_action(other),
        }
    }

    fn delete_subtree(&mut self, id: BoxId) -> DispatchResult {
        if !self.state.tree.contains(id) {
            return DispatchResult::changed(true);
        }
        let parent = self.state.tree.parent(id);

        // Widgets are released before their boxes leave the store.
        let mut doomed = vec![id];
        doomed.extend(self.state.tree.descendants(id));
        let effects = vec![Effect::ReleaseEditors(doomed)];

        match self.state.tree.remove_subtree(id) {
            Ok(removed) => {
                tracing::info!(box_id = %id, removed = removed.len(), "deleted box subtree");
                let selection_gone = self
                    .state
                    .ui
                    .selected
                    .is_some_and(|sel| removed.contains(&sel));
                if selection_gone {
                    self.state.ui.selected =
                        parent.or_else(|| self.state.tree.roots().first().copied());
                    self.state.ui.focus = FocusTarget::Tree;
                }
            }
            Err(e) => {
                tracing::warn!(box_id = %id, error = %e, "remove_subtree failed");
            }
        }

        DispatchResult::with_effects(effects, true)
    }

    fn move_selection(&mut self, delta: isize) -> bool {
        let rows = self.state.tree.preorder();
        if rows.is_empty() {
            return false;
        }
        let current = self
            .state
            .ui
            .selected
            .and_then(|sel| rows.iter().position(|(id, _)| *id == sel));
        let next = match current {
            Some(idx) => (idx as isize + delta).clamp(0, rows.len() as isize - 1) as usize,
            None => 0,
        };
        let next_id = rows[next].0;
        let prev = self.state.ui.selected.replace(next_id);
        prev != Some(next_id)
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.state.ui.notices.push(level, message);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
