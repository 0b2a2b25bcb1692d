use super::*;
use crate::kernel::services::ports::ProjectError;
use crate::kernel::state::{ExportConfig, NoticeLevel};
use crate::models::{BoxKind, HierarchyNode};
use std::path::PathBuf;

fn new_store() -> Store {
    Store::new(AppState::default())
}

fn type_and_accept(store: &mut Store, text: &str) -> DispatchResult {
    for ch in text.chars() {
        store.dispatch(Action::InputDialogAppend(ch));
    }
    store.dispatch(Action::InputDialogAccept)
}

fn add_file(store: &mut Store, name: &str) -> BoxId {
    store.dispatch(Action::AddFile);
    type_and_accept(store, name);
    store.state.ui.selected.unwrap()
}

fn add_child(store: &mut Store, parent: BoxId, name: &str) -> BoxId {
    store.dispatch(Action::AddChild { parent });
    type_and_accept(store, name);
    store.state.ui.selected.unwrap()
}

fn node(title: &str, kind: BoxKind, children: Vec<HierarchyNode>) -> HierarchyNode {
    HierarchyNode {
        id: 0,
        title: title.to_string(),
        kind,
        code: String::new(),
        children,
    }
}

#[test]
fn add_file_opens_prompt_and_creates_box() {
    let mut store = new_store();
    store.dispatch(Action::AddFile);
    assert!(store.state.ui.input_dialog.visible);
    assert_eq!(
        store.state.ui.input_dialog.title,
        "Enter file name (e.g., main.py):"
    );

    let result = type_and_accept(&mut store, "  main.py ");
    assert!(result.state_changed);
    assert!(!store.state.ui.input_dialog.visible);

    let id = store.state.ui.selected.unwrap();
    let record = store.state.tree.get(id).unwrap();
    assert_eq!(record.title, "main.py");
    assert_eq!(record.kind, BoxKind::File);
    assert_eq!(record.code, "# File: main.py\n");
}

#[test]
fn empty_prompt_answer_creates_nothing() {
    let mut store = new_store();
    store.dispatch(Action::AddFile);
    type_and_accept(&mut store, "   ");
    assert!(store.state.tree.is_empty());
    assert!(!store.state.ui.input_dialog.visible);
    assert!(store.state.ui.notices.is_empty());
}

#[test]
fn cancelled_prompt_creates_nothing() {
    let mut store = new_store();
    store.dispatch(Action::AddFile);
    store.dispatch(Action::InputDialogAppend('x'));
    store.dispatch(Action::InputDialogCancel);
    assert!(store.state.tree.is_empty());
    assert!(!store.state.ui.input_dialog.visible);
}

#[test]
fn add_child_picks_kind_from_parent() {
    let mut store = new_store();
    let file = add_file(&mut store, "main.py");

    store.dispatch(Action::AddChild { parent: file });
    assert_eq!(store.state.ui.input_dialog.title, "Enter class name:");
    type_and_accept(&mut store, "Dog");
    let class = store.state.ui.selected.unwrap();
    assert_eq!(store.state.tree.get(class).unwrap().kind, BoxKind::Class);
    assert!(store.state.tree.get(file).unwrap().expanded);

    store.dispatch(Action::AddChild { parent: class });
    assert_eq!(
        store.state.ui.input_dialog.title,
        "Enter method name (e.g., my_method or __init__):"
    );
    type_and_accept(&mut store, "__init__");
    let method = store.state.ui.selected.unwrap();
    let record = store.state.tree.get(method).unwrap();
    assert_eq!(record.kind, BoxKind::Method);
    assert_eq!(record.code, "def __init__(self, ):\n    pass\n");

    let result = store.dispatch(Action::AddChild { parent: method });
    assert!(!result.state_changed);
    assert!(!store.state.ui.input_dialog.visible);
}

#[test]
fn input_dialog_cursor_edits_multibyte_text() {
    let mut store = new_store();
    store.dispatch(Action::AddFile);
    store.dispatch(Action::InputDialogAppend('a'));
    store.dispatch(Action::InputDialogAppend('é'));
    store.dispatch(Action::InputDialogAppend('b'));
    store.dispatch(Action::InputDialogCursorLeft);
    store.dispatch(Action::InputDialogBackspace);
    assert_eq!(store.state.ui.input_dialog.value, "ab");
    assert_eq!(store.state.ui.input_dialog.cursor, 1);

    store.dispatch(Action::InputDialogCursorRight);
    assert_eq!(store.state.ui.input_dialog.cursor, 2);
    let result = store.dispatch(Action::InputDialogCursorRight);
    assert!(!result.state_changed);
}

#[test]
fn rename_prefills_current_title() {
    let mut store = new_store();
    let file = add_file(&mut store, "main.py");

    store.dispatch(Action::RenameBox { id: file });
    assert_eq!(store.state.ui.input_dialog.value, "main.py");
    assert_eq!(store.state.ui.input_dialog.cursor, "main.py".len());

    for _ in 0.."main.py".len() {
        store.dispatch(Action::InputDialogBackspace);
    }
    type_and_accept(&mut store, "app.py");
    assert_eq!(store.state.tree.get(file).unwrap().title, "app.py");
}

#[test]
fn delete_requires_confirmation() {
    let mut store = new_store();
    let file = add_file(&mut store, "main.py");

    let result = store.dispatch(Action::DeleteBox { id: file });
    assert!(result.effects.is_empty());
    assert!(store.state.ui.confirm_dialog.visible);
    assert_eq!(
        store.state.ui.confirm_dialog.message,
        "Are you sure you want to delete 'main.py' and all its contents?"
    );

    store.dispatch(Action::ConfirmDialogCancel);
    assert!(store.state.tree.contains(file));
    assert!(!store.state.ui.confirm_dialog.visible);
}

#[test]
fn confirmed_delete_releases_whole_subtree() {
    let mut store = new_store();
    let file = add_file(&mut store, "main.py");
    let class = add_child(&mut store, file, "Dog");
    let init = add_child(&mut store, class, "__init__");
    let bark = add_child(&mut store, class, "bark");
    let other = add_file(&mut store, "util.py");

    store.dispatch(Action::SelectBox { id: bark });
    store.dispatch(Action::DeleteBox { id: class });
    let result = store.dispatch(Action::ConfirmDialogAccept);

    assert_eq!(
        result.effects,
        vec![Effect::ReleaseEditors(vec![class, init, bark])]
    );
    assert_eq!(store.state.tree.len(), 2);
    assert!(store.state.tree.contains(file));
    assert!(store.state.tree.contains(other));
    assert!(store.state.tree.children(file).is_empty());
    assert_eq!(store.state.ui.selected, Some(file));
}

#[test]
fn deleting_last_root_clears_selection() {
    let mut store = new_store();
    let file = add_file(&mut store, "main.py");
    store.dispatch(Action::DeleteBox { id: file });
    store.dispatch(Action::ConfirmDialogAccept);
    assert!(store.state.tree.is_empty());
    assert_eq!(store.state.ui.selected, None);
}

#[test]
fn toggle_collapses_and_returns_focus_to_tree() {
    let mut store = new_store();
    let file = add_file(&mut store, "main.py");

    store.dispatch(Action::ToggleExpand { id: file });
    assert!(store.state.tree.get(file).unwrap().expanded);
    store.dispatch(Action::FocusEditor);
    assert_eq!(store.state.ui.focus, FocusTarget::Editor);

    store.dispatch(Action::ToggleExpand { id: file });
    assert!(!store.state.tree.get(file).unwrap().expanded);
    assert_eq!(store.state.ui.focus, FocusTarget::Tree);
}

#[test]
fn focus_editor_requires_expanded_selection() {
    let mut store = new_store();
    add_file(&mut store, "main.py");
    let result = store.dispatch(Action::FocusEditor);
    assert!(!result.state_changed);
    assert_eq!(store.state.ui.focus, FocusTarget::Tree);
}

#[test]
fn move_selection_walks_preorder_and_clamps() {
    let mut store = new_store();
    let file = add_file(&mut store, "main.py");
    let class = add_child(&mut store, file, "Dog");
    let other = add_file(&mut store, "util.py");

    store.dispatch(Action::SelectBox { id: file });
    store.dispatch(Action::MoveSelection { delta: 1 });
    assert_eq!(store.state.ui.selected, Some(class));
    store.dispatch(Action::MoveSelection { delta: 5 });
    assert_eq!(store.state.ui.selected, Some(other));
    let result = store.dispatch(Action::MoveSelection { delta: 1 });
    assert!(!result.state_changed);
    store.dispatch(Action::MoveSelection { delta: -10 });
    assert_eq!(store.state.ui.selected, Some(file));
}

#[test]
fn sync_code_updates_stored_code() {
    let mut store = new_store();
    let file = add_file(&mut store, "main.py");
    let result = store.dispatch(Action::SyncCode {
        id: file,
        code: "import os\n".to_string(),
    });
    assert!(result.state_changed);
    assert_eq!(store.state.tree.get(file).unwrap().code, "import os\n");

    let result = store.dispatch(Action::SyncCode {
        id: file,
        code: "import os\n".to_string(),
    });
    assert!(!result.state_changed);
}

#[test]
fn copy_code_emits_effect_for_known_box() {
    let mut store = new_store();
    let file = add_file(&mut store, "main.py");
    let result = store.dispatch(Action::CopyCode { id: file });
    assert_eq!(result.effects, vec![Effect::CopyBoxCode { id: file }]);
    let result = store.dispatch(Action::CopyCode { id: BoxId(999) });
    assert!(result.effects.is_empty());
}

#[test]
fn save_prompts_with_default_then_last_name() {
    let mut store = new_store();
    add_file(&mut store, "main.py");

    store.dispatch(Action::SaveProject);
    assert_eq!(
        store.state.ui.input_dialog.title,
        "Enter project name to save:"
    );
    assert_eq!(store.state.ui.input_dialog.value, "my_project");
    let result = store.dispatch(Action::InputDialogAccept);
    assert_eq!(
        result.effects,
        vec![Effect::SaveProject {
            name: "my_project".to_string()
        }]
    );

    store.dispatch(Action::SaveProject);
    for _ in 0.."my_project".len() {
        store.dispatch(Action::InputDialogBackspace);
    }
    let result = type_and_accept(&mut store, "zoo");
    assert_eq!(
        result.effects,
        vec![Effect::SaveProject {
            name: "zoo".to_string()
        }]
    );
    store.dispatch(Action::SaveProject);
    assert_eq!(store.state.ui.input_dialog.value, "zoo");
}

#[test]
fn save_with_empty_name_is_aborted() {
    let mut store = new_store();
    store.dispatch(Action::SaveProject);
    for _ in 0.."my_project".len() {
        store.dispatch(Action::InputDialogBackspace);
    }
    let result = store.dispatch(Action::InputDialogAccept);
    assert!(result.effects.is_empty());
}

#[test]
fn save_outcomes_become_notices() {
    let mut store = new_store();
    store.dispatch(Action::ProjectSaved {
        message: "Project saved as demo.boxcode".to_string(),
    });
    store.dispatch(Action::ProjectSaveFailed {
        error: ProjectError::Rejected("disk full".to_string()),
    });
    store.dispatch(Action::ProjectSaveFailed {
        error: ProjectError::Network("connection refused".to_string()),
    });

    let notices = &mut store.state.ui.notices;
    let first = notices.current().unwrap().clone();
    assert_eq!(first.level, NoticeLevel::Info);
    assert_eq!(first.message, "Project saved as demo.boxcode");
    notices.dismiss();
    assert_eq!(notices.current().unwrap().message, "Error: disk full");
    notices.dismiss();
    assert_eq!(
        notices.current().unwrap().message,
        "Network error: connection refused"
    );
}

#[test]
fn project_picker_lists_and_loads_selection() {
    let mut store = new_store();
    let result = store.dispatch(Action::ListProjects);
    assert_eq!(result.effects, vec![Effect::ListProjects]);

    store.dispatch(Action::ProjectsListed {
        projects: vec!["a.boxcode".to_string(), "b.boxcode".to_string()],
    });
    assert!(store.state.ui.project_picker.visible);
    store.dispatch(Action::PickerMoveSelection { delta: 1 });
    let result = store.dispatch(Action::PickerAccept);

    assert_eq!(
        result.effects,
        vec![Effect::LoadProject {
            request: 1,
            filename: "b.boxcode".to_string()
        }]
    );
    assert!(!store.state.ui.project_picker.visible);
}

#[test]
fn list_failure_is_reported() {
    let mut store = new_store();
    store.dispatch(Action::ProjectListFailed {
        error: ProjectError::Rejected("no dir".to_string()),
    });
    assert_eq!(
        store.state.ui.notices.current().unwrap().message,
        "Error listing projects: no dir"
    );
}

#[test]
fn loading_replaces_store_and_releases_old_editors() {
    let mut store = new_store();
    let old = add_file(&mut store, "old.py");

    let result = store.dispatch(Action::LoadProject {
        filename: "demo.boxcode".to_string(),
    });
    let request = match &result.effects[..] {
        [Effect::LoadProject { request, .. }] => *request,
        other => panic!("unexpected effects: {other:?}"),
    };

    let nodes = vec![node(
        "main.py",
        BoxKind::File,
        vec![node(
            "Dog",
            BoxKind::Class,
            vec![node("bark", BoxKind::Method, Vec::new())],
        )],
    )];
    let result = store.dispatch(Action::ProjectLoaded {
        request,
        filename: "demo.boxcode".to_string(),
        nodes,
    });

    assert_eq!(result.effects, vec![Effect::ReleaseEditors(vec![old])]);
    assert_eq!(store.state.tree.len(), 3);
    let root = store.state.tree.roots()[0];
    assert_eq!(store.state.tree.get(root).unwrap().title, "main.py");
    assert!(store.state.tree.iter().all(|r| !r.expanded));
    assert_eq!(store.state.ui.selected, Some(root));
    assert_eq!(store.state.persistence.pending_load, None);
    assert_eq!(
        store.state.ui.notices.current().unwrap().message,
        "Project 'demo.boxcode' loaded."
    );
}

#[test]
fn stale_load_responses_are_dropped() {
    let mut store = new_store();
    store.dispatch(Action::LoadProject {
        filename: "first.boxcode".to_string(),
    });
    store.dispatch(Action::LoadProject {
        filename: "second.boxcode".to_string(),
    });

    let result = store.dispatch(Action::ProjectLoaded {
        request: 1,
        filename: "first.boxcode".to_string(),
        nodes: vec![node("first.py", BoxKind::File, Vec::new())],
    });
    assert!(!result.state_changed);
    assert!(store.state.tree.is_empty());

    let result = store.dispatch(Action::ProjectLoadFailed {
        request: 1,
        error: ProjectError::Network("late".to_string()),
    });
    assert!(!result.state_changed);
    assert!(store.state.ui.notices.is_empty());

    store.dispatch(Action::ProjectLoaded {
        request: 2,
        filename: "second.boxcode".to_string(),
        nodes: vec![node("second.py", BoxKind::File, Vec::new())],
    });
    let root = store.state.tree.roots()[0];
    assert_eq!(store.state.tree.get(root).unwrap().title, "second.py");
}

#[test]
fn malformed_hierarchy_keeps_current_store() {
    let mut store = new_store();
    let file = add_file(&mut store, "main.py");
    store.dispatch(Action::LoadProject {
        filename: "bad.boxcode".to_string(),
    });

    let result = store.dispatch(Action::ProjectLoaded {
        request: 1,
        filename: "bad.boxcode".to_string(),
        nodes: vec![node("orphan", BoxKind::Method, Vec::new())],
    });

    assert!(result.effects.is_empty());
    assert!(store.state.tree.contains(file));
    assert_eq!(store.state.tree.len(), 1);
    let notice = store.state.ui.notices.current().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.starts_with("Error loading project: "));
}

#[test]
fn rejected_load_reports_server_message() {
    let mut store = new_store();
    store.dispatch(Action::LoadProject {
        filename: "x.boxcode".to_string(),
    });
    store.dispatch(Action::ProjectLoadFailed {
        request: 1,
        error: ProjectError::Rejected("missing".to_string()),
    });
    assert_eq!(
        store.state.ui.notices.current().unwrap().message,
        "Error loading project: missing"
    );
    assert_eq!(store.state.persistence.pending_load, None);
}

#[test]
fn preview_scroll_is_clamped() {
    let mut store = new_store();
    store.dispatch(Action::ShowGeneratedCode {
        code: "a\nb\nc".to_string(),
    });
    store.dispatch(Action::PreviewScroll { delta: 10 });
    assert_eq!(store.state.ui.code_preview.scroll, 2);
    store.dispatch(Action::PreviewScroll { delta: -10 });
    assert_eq!(store.state.ui.code_preview.scroll, 0);
    store.dispatch(Action::PreviewClose);
    assert!(!store.state.ui.code_preview.visible);
}

#[test]
fn export_targets_configured_path() {
    let mut store = Store::new(AppState::new(ExportConfig {
        dir: PathBuf::from("/tmp/out"),
        file_name: "generated_code.py".to_string(),
    }));
    let file = add_file(&mut store, "main.py");
    add_child(&mut store, file, "Dog");

    let result = store.dispatch(Action::ExportGeneratedCode);
    match &result.effects[..] {
        [Effect::ExportGeneratedCode { path, content }] => {
            assert_eq!(path, &PathBuf::from("/tmp/out/generated_code.py"));
            assert!(content.starts_with("# --- Code for main.py ---"));
            assert!(content.contains("class Dog:"));
        }
        other => panic!("unexpected effects: {other:?}"),
    }

    store.dispatch(Action::CodeExported {
        path: PathBuf::from("/tmp/out/generated_code.py"),
    });
    assert_eq!(
        store.state.ui.notices.current().unwrap().message,
        "Generated code written to /tmp/out/generated_code.py"
    );
}

#[test]
fn notices_queue_until_dismissed() {
    let mut store = new_store();
    store.dispatch(Action::Notify {
        level: NoticeLevel::Info,
        message: "one".to_string(),
    });
    store.dispatch(Action::Notify {
        level: NoticeLevel::Info,
        message: "two".to_string(),
    });
    assert!(store.state.ui.has_modal());
    store.dispatch(Action::NoticeDismiss);
    assert_eq!(store.state.ui.notices.current().unwrap().message, "two");
    store.dispatch(Action::NoticeDismiss);
    assert!(!store.state.ui.has_modal());
    let result = store.dispatch(Action::NoticeDismiss);
    assert!(!result.state_changed);
}
