use crate::kernel::{Action, Effect, InputDialogKind};
use crate::models::BoxTreeError;

use super::DispatchResult;

impl super::Store {
    pub(super) fn reduce_input_dialog_action(&mut self, action: Action) -> DispatchResult {
        let dialog = &mut self.state.ui.input_dialog;
        if !dialog.visible {
            return DispatchResult::unchanged();
        }

        match action {
            Action::InputDialogAppend(ch) => {
                if dialog.cursor > dialog.value.len() {
                    dialog.cursor = dialog.value.len();
                }
                dialog.value.insert(dialog.cursor, ch);
                dialog.cursor += ch.len_utf8();
                DispatchResult::changed(true)
            }
            Action::InputDialogBackspace => {
                if dialog.cursor == 0 {
                    return DispatchResult::unchanged();
                }
                let prev = dialog.value[..dialog.cursor]
                    .char_indices()
                    .last()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                dialog.value.drain(prev..dialog.cursor);
                dialog.cursor = prev;
                DispatchResult::changed(true)
            }
            Action::InputDialogCursorLeft => {
                if dialog.cursor == 0 {
                    return DispatchResult::unchanged();
                }
                dialog.cursor = dialog.value[..dialog.cursor]
                    .char_indices()
                    .last()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                DispatchResult::changed(true)
            }
            Action::InputDialogCursorRight => {
                if dialog.cursor >= dialog.value.len() {
                    return DispatchResult::unchanged();
                }
                dialog.cursor = dialog.value[dialog.cursor..]
                    .chars()
                    .next()
                    .map(|ch| dialog.cursor + ch.len_utf8())
                    .unwrap_or(dialog.value.len());
                DispatchResult::changed(true)
            }
            Action::InputDialogCancel => {
                dialog.reset();
                DispatchResult::changed(true)
            }
            Action::InputDialogAccept => {
                let value = dialog.value.trim().to_string();
                let kind = dialog.kind.take();
                dialog.reset();
                match kind {
                    Some(kind) => self.accept_input(kind, value),
                    None => DispatchResult::changed(true),
                }
            }
            _ => DispatchResult::unchanged(),
        }
    }

    fn accept_input(&mut self, kind: InputDialogKind, value: String) -> DispatchResult {
        // An empty answer is a cancelled prompt: close silently.
        if value.is_empty() {
            return DispatchResult::changed(true);
        }

        let created = match kind {
            InputDialogKind::NewFile => self.state.tree.add_file(&value),
            InputDialogKind::NewChild { parent, .. } => self.state.tree.add_child(parent, &value),
            InputDialogKind::RenameBox { id } => {
                if let Err(e) = self.state.tree.rename(id, &value) {
                    tracing::warn!(box_id = %id, error = %e, "rename failed");
                }
                return DispatchResult::changed(true);
            }
            InputDialogKind::SaveProject => {
                self.state.persistence.last_project_name = Some(value.clone());
                return DispatchResult::with_effects(
                    vec![Effect::SaveProject { name: value }],
                    true,
                );
            }
        };

        match created {
            Ok(id) => {
                tracing::info!(box_id = %id, title = %value, "box created");
                self.state.ui.selected = Some(id);
            }
            Err(BoxTreeError::EmptyTitle) => {}
            Err(e) => {
                tracing::warn!(error = %e, "box creation failed");
            }
        }
        DispatchResult::changed(true)
    }
}
