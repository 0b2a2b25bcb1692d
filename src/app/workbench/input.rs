use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use super::{EventResult, Workbench};
use crate::kernel::{Action as KernelAction, FocusTarget};
use crate::models::BoxId;
use crate::ui::geom::Pos;
use crate::ui::scene::{HeaderButton, NodeKind, Sense, ToolbarAction};

const SCENE_SCROLL_STEP: u32 = 3;

pub(super) fn handle_event(workbench: &mut Workbench, event: &Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => workbench.handle_key(key),
        Event::Mouse(mouse) => workbench.handle_mouse(mouse),
        Event::Paste(text) => workbench.handle_paste(text),
        Event::Resize(_, _) => EventResult::Consumed,
        _ => EventResult::Ignored,
    }
}

/// Topmost surface that receives keyboard input.
#[derive(Clone, Copy)]
enum KeyRoute {
    Notice,
    Confirm,
    InputDialog,
    Picker,
    Preview,
    Editor,
    Tree,
}

fn consumed(changed: bool) -> EventResult {
    if changed {
        EventResult::Consumed
    } else {
        EventResult::Ignored
    }
}

impl Workbench {
    fn handle_key(&mut self, key: &KeyEvent) -> EventResult {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return EventResult::Quit;
        }

        let ui = &self.store.state().ui;
        let route = if !ui.notices.is_empty() {
            KeyRoute::Notice
        } else if ui.confirm_dialog.visible {
            KeyRoute::Confirm
        } else if ui.input_dialog.visible {
            KeyRoute::InputDialog
        } else if ui.project_picker.visible {
            KeyRoute::Picker
        } else if ui.code_preview.visible {
            KeyRoute::Preview
        } else if ui.focus == FocusTarget::Editor {
            KeyRoute::Editor
        } else {
            KeyRoute::Tree
        };

        match route {
            KeyRoute::Notice => self.handle_notice_key(key),
            KeyRoute::Confirm => self.handle_confirm_key(key),
            KeyRoute::InputDialog => self.handle_input_dialog_key(key),
            KeyRoute::Picker => self.handle_picker_key(key),
            KeyRoute::Preview => self.handle_preview_key(key),
            KeyRoute::Editor => self.handle_editor_key(key),
            KeyRoute::Tree => self.handle_tree_key(key),
        }
    }

    fn handle_notice_key(&mut self, key: &KeyEvent) -> EventResult {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => {
                consumed(self.dispatch_kernel(KernelAction::NoticeDismiss))
            }
            _ => EventResult::Consumed,
        }
    }

    fn handle_confirm_key(&mut self, key: &KeyEvent) -> EventResult {
        let action = match key.code {
            KeyCode::Enter | KeyCode::Char('y') => KernelAction::ConfirmDialogAccept,
            KeyCode::Esc | KeyCode::Char('n') => KernelAction::ConfirmDialogCancel,
            _ => return EventResult::Consumed,
        };
        self.dispatch_kernel(action);
        EventResult::Consumed
    }

    fn handle_input_dialog_key(&mut self, key: &KeyEvent) -> EventResult {
        let action = match key.code {
            KeyCode::Enter => KernelAction::InputDialogAccept,
            KeyCode::Esc => KernelAction::InputDialogCancel,
            KeyCode::Backspace => KernelAction::InputDialogBackspace,
            KeyCode::Left => KernelAction::InputDialogCursorLeft,
            KeyCode::Right => KernelAction::InputDialogCursorRight,
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                KernelAction::InputDialogAppend(ch)
            }
            _ => return EventResult::Consumed,
        };
        self.dispatch_kernel(action);
        EventResult::Consumed
    }

    fn handle_picker_key(&mut self, key: &KeyEvent) -> EventResult {
        let action = match key.code {
            KeyCode::Up | KeyCode::Char('k') => KernelAction::PickerMoveSelection { delta: -1 },
            KeyCode::Down | KeyCode::Char('j') => KernelAction::PickerMoveSelection { delta: 1 },
            KeyCode::Enter => KernelAction::PickerAccept,
            KeyCode::Esc | KeyCode::Char('q') => KernelAction::PickerClose,
            _ => return EventResult::Consumed,
        };
        self.dispatch_kernel(action);
        EventResult::Consumed
    }

    fn handle_preview_key(&mut self, key: &KeyEvent) -> EventResult {
        let page = self.preview_page_height() as isize;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.dispatch_kernel(KernelAction::PreviewScroll { delta: -1 });
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.dispatch_kernel(KernelAction::PreviewScroll { delta: 1 });
            }
            KeyCode::PageUp => {
                self.dispatch_kernel(KernelAction::PreviewScroll { delta: -page });
            }
            KeyCode::PageDown => {
                self.dispatch_kernel(KernelAction::PreviewScroll { delta: page });
            }
            KeyCode::Char('w') => {
                self.export_generated_code();
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                self.dispatch_kernel(KernelAction::PreviewClose);
            }
            _ => {}
        }
        EventResult::Consumed
    }

    fn handle_tree_key(&mut self, key: &KeyEvent) -> EventResult {
        let selected = self.store.state().ui.selected;
        let on_selected = |make: fn(BoxId) -> KernelAction| selected.map(make);

        let action = match key.code {
            KeyCode::Char('q') => return EventResult::Quit,
            KeyCode::Char('a') => Some(KernelAction::AddFile),
            KeyCode::Char('c') => on_selected(|parent| KernelAction::AddChild { parent }),
            KeyCode::Char('r') => on_selected(|id| KernelAction::RenameBox { id }),
            KeyCode::Char('d') | KeyCode::Delete => {
                on_selected(|id| KernelAction::DeleteBox { id })
            }
            KeyCode::Char('y') => on_selected(|id| KernelAction::CopyCode { id }),
            KeyCode::Enter | KeyCode::Char(' ') => {
                on_selected(|id| KernelAction::ToggleExpand { id })
            }
            KeyCode::Char('e') => Some(KernelAction::FocusEditor),
            KeyCode::Char('s') => Some(KernelAction::SaveProject),
            KeyCode::Char('o') => Some(KernelAction::ListProjects),
            KeyCode::Char('g') => return consumed(self.show_generated_code()),
            KeyCode::Up | KeyCode::Char('k') => Some(KernelAction::MoveSelection { delta: -1 }),
            KeyCode::Down | KeyCode::Char('j') => Some(KernelAction::MoveSelection { delta: 1 }),
            KeyCode::PageUp => {
                self.scroll_scene(-(self.scene_page_height() as i64));
                return EventResult::Consumed;
            }
            KeyCode::PageDown => {
                self.scroll_scene(self.scene_page_height() as i64);
                return EventResult::Consumed;
            }
            _ => None,
        };

        match action {
            Some(action) => consumed(self.dispatch_kernel(action)),
            None => EventResult::Ignored,
        }
    }

    fn handle_editor_key(&mut self, key: &KeyEvent) -> EventResult {
        if key.code == KeyCode::Esc {
            if let Some(id) = self.store.state().ui.selected {
                self.sync_box_code(id);
            }
            self.dispatch_kernel(KernelAction::FocusTree);
            return EventResult::Consumed;
        }

        let Some(id) = self.store.state().ui.selected else {
            return EventResult::Ignored;
        };
        let Some(editor) = self.registry.get_editor_mut(id) else {
            // Widget not built yet; swallow keys until it is.
            return EventResult::Consumed;
        };

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let edited = match key.code {
            KeyCode::Char('f') if ctrl => {
                editor.toggle_fold();
                false
            }
            KeyCode::Char(_) if ctrl => return EventResult::Ignored,
            KeyCode::Char(ch) => {
                editor.insert_char(ch);
                true
            }
            KeyCode::Enter => {
                editor.insert_newline();
                true
            }
            KeyCode::Tab => {
                editor.insert_tab();
                true
            }
            KeyCode::Backspace => {
                editor.backspace();
                true
            }
            KeyCode::Delete => {
                editor.delete();
                true
            }
            KeyCode::Left => {
                editor.move_left();
                false
            }
            KeyCode::Right => {
                editor.move_right();
                false
            }
            KeyCode::Up => {
                editor.move_up();
                false
            }
            KeyCode::Down => {
                editor.move_down();
                false
            }
            KeyCode::Home => {
                editor.move_home();
                false
            }
            KeyCode::End => {
                editor.move_end();
                false
            }
            KeyCode::PageUp => {
                editor.page(false);
                false
            }
            KeyCode::PageDown => {
                editor.page(true);
                false
            }
            _ => return EventResult::Ignored,
        };

        if edited {
            self.sync_box_code(id);
        }
        EventResult::Consumed
    }

    fn handle_paste(&mut self, text: &str) -> EventResult {
        let ui = &self.store.state().ui;
        if ui.input_dialog.visible {
            for ch in text.chars().filter(|c| !c.is_control()) {
                self.dispatch_kernel(KernelAction::InputDialogAppend(ch));
            }
            return EventResult::Consumed;
        }
        if ui.has_modal() || ui.focus != FocusTarget::Editor {
            return EventResult::Ignored;
        }
        let Some(id) = ui.selected else {
            return EventResult::Ignored;
        };
        let Some(editor) = self.registry.get_editor_mut(id) else {
            return EventResult::Ignored;
        };
        editor.insert_text(text);
        self.sync_box_code(id);
        EventResult::Consumed
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> EventResult {
        let pos = Pos::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_click(pos),
            MouseEventKind::ScrollUp => self.handle_wheel(pos, -1),
            MouseEventKind::ScrollDown => self.handle_wheel(pos, 1),
            _ => EventResult::Ignored,
        }
    }

    fn handle_click(&mut self, pos: Pos) -> EventResult {
        let Some(node) = self.hits.hit_test_with_sense(pos, Sense::CLICK).copied() else {
            return EventResult::Ignored;
        };

        let ui = &self.store.state().ui;
        if ui.has_modal() {
            if let NodeKind::PickerItem { index } = node.kind {
                if ui.notices.is_empty() && ui.project_picker.visible {
                    let delta = index as isize - ui.project_picker.selected as isize;
                    self.dispatch_kernel(KernelAction::PickerMoveSelection { delta });
                    self.dispatch_kernel(KernelAction::PickerAccept);
                }
            }
            return EventResult::Consumed;
        }

        match node.kind {
            NodeKind::Toolbar { action } => {
                match action {
                    ToolbarAction::AddFile => self.dispatch_kernel(KernelAction::AddFile),
                    ToolbarAction::Save => self.dispatch_kernel(KernelAction::SaveProject),
                    ToolbarAction::Load => self.dispatch_kernel(KernelAction::ListProjects),
                    ToolbarAction::Generate => self.show_generated_code(),
                };
            }
            NodeKind::HeaderButton { id, button } => {
                self.dispatch_kernel(KernelAction::SelectBox { id });
                let action = match button {
                    HeaderButton::AddChild => KernelAction::AddChild { parent: id },
                    HeaderButton::Copy => KernelAction::CopyCode { id },
                    HeaderButton::Delete => KernelAction::DeleteBox { id },
                };
                self.dispatch_kernel(action);
            }
            NodeKind::BoxHeader { id } => {
                self.leave_editor();
                self.dispatch_kernel(KernelAction::ToggleExpand { id });
            }
            NodeKind::BoxTitle { id } => {
                self.leave_editor();
                self.dispatch_kernel(KernelAction::SelectBox { id });
                self.dispatch_kernel(KernelAction::RenameBox { id });
            }
            NodeKind::EditorArea { id } => {
                if self.store.state().ui.selected != Some(id) {
                    self.leave_editor();
                    self.dispatch_kernel(KernelAction::SelectBox { id });
                }
                self.dispatch_kernel(KernelAction::FocusEditor);
                if let Some(editor) = self.registry.get_editor_mut(id) {
                    editor.click(pos);
                }
            }
            NodeKind::SceneArea => {
                self.leave_editor();
            }
            NodeKind::PickerItem { .. } => {}
        }
        EventResult::Consumed
    }

    fn handle_wheel(&mut self, pos: Pos, direction: i64) -> EventResult {
        let ui = &self.store.state().ui;
        if ui.code_preview.visible && ui.notices.is_empty() {
            self.dispatch_kernel(KernelAction::PreviewScroll {
                delta: direction as isize * SCENE_SCROLL_STEP as isize,
            });
            return EventResult::Consumed;
        }
        if ui.has_modal() {
            return EventResult::Consumed;
        }
        if self.hits.hit_test_with_sense(pos, Sense::SCROLL).is_none() {
            return EventResult::Ignored;
        }
        self.scroll_scene(direction * SCENE_SCROLL_STEP as i64);
        EventResult::Consumed
    }

    /// Leaves the focused editor, keeping its text in the store.
    fn leave_editor(&mut self) {
        if self.store.state().ui.focus != FocusTarget::Editor {
            return;
        }
        if let Some(id) = self.store.state().ui.selected {
            self.sync_box_code(id);
        }
        self.dispatch_kernel(KernelAction::FocusTree);
    }

    fn scroll_scene(&mut self, delta: i64) {
        let total = self.renderer.scene().total_height() as i64;
        let page = self.scene_page_height() as i64;
        let max = (total - page).max(0);
        self.scene_scroll = (self.scene_scroll as i64 + delta).clamp(0, max) as u32;
    }

    fn scene_page_height(&self) -> u16 {
        self.last_scene_area.map(|a| a.height).unwrap_or(1).max(1)
    }
}
