use super::*;
use crate::models::BoxId;
use crate::ui::editor::TokenKind;

fn editor(text: &str) -> CodeEditor {
    let container = ContainerRef::new(BoxId(1), Rect::new(0, 0, 40, 5));
    CodeEditor::new(
        container,
        "python",
        text,
        &EditorOptions::default(),
        Arc::new(EditorLibrary::python()),
    )
}

#[test]
fn newline_after_colon_indents_one_level() {
    let mut ed = editor("class Foo:");
    ed.move_end();
    ed.insert_newline();
    assert_eq!(ed.cursor(), (1, 4));
    for ch in "def bar(self):".chars() {
        ed.insert_char(ch);
    }
    ed.insert_newline();
    assert_eq!(ed.cursor(), (2, 8));
    for ch in "pass".chars() {
        ed.insert_char(ch);
    }
    ed.insert_newline();
    assert_eq!(ed.cursor(), (3, 8));
    assert_eq!(
        ed.value(),
        "class Foo:\n    def bar(self):\n        pass\n        "
    );
}

#[test]
fn backspace_dedents_and_joins_lines() {
    let mut ed = editor("if x:\n        y");
    ed.move_down();
    ed.move_home();
    assert_eq!(ed.cursor(), (1, 8));
    ed.backspace();
    assert_eq!(ed.cursor(), (1, 4));
    assert_eq!(ed.line(1), "    y");

    ed.move_home();
    assert_eq!(ed.cursor(), (1, 0));
    ed.backspace();
    assert_eq!(ed.cursor(), (0, 5));
    assert_eq!(ed.value(), "if x:    y");
}

#[test]
fn tab_inserts_to_next_stop() {
    let mut ed = editor("ab");
    ed.move_end();
    ed.insert_tab();
    assert_eq!(ed.value(), "ab  ");
    assert_eq!(ed.cursor(), (0, 4));
}

#[test]
fn delete_at_line_end_joins_next_line() {
    let mut ed = editor("a\nb");
    ed.move_end();
    ed.delete();
    assert_eq!(ed.value(), "ab");
}

#[test]
fn folding_hides_indented_block() {
    let mut ed = editor("class Foo:\n    def a(self):\n        pass\n\nx = 1");
    assert_eq!(ed.fold_range(0), Some((1, 2)));
    assert_eq!(ed.fold_range(1), Some((2, 2)));
    assert_eq!(ed.fold_range(4), None);

    assert!(ed.toggle_fold());
    assert!(ed.is_folded(0));
    assert_eq!(ed.visible_rows(), vec![0, 3, 4]);

    ed.move_down();
    assert_eq!(ed.cursor().0, 3);

    ed.move_up();
    assert!(ed.toggle_fold());
    assert_eq!(ed.visible_rows(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn folding_disabled_by_options() {
    let container = ContainerRef::new(BoxId(1), Rect::new(0, 0, 40, 5));
    let options = EditorOptions {
        folding: false,
        ..EditorOptions::default()
    };
    let mut ed = CodeEditor::new(
        container,
        "python",
        "if x:\n    y",
        &options,
        Arc::new(EditorLibrary::python()),
    );
    assert!(!ed.toggle_fold());
}

#[test]
fn viewport_follows_cursor() {
    let mut ed = editor("0\n1\n2\n3\n4\n5\n6\n7");
    for _ in 0..6 {
        ed.move_down();
    }
    assert_eq!(ed.scroll(), 2);
    assert_eq!(ed.rows_in_view(), vec![2, 3, 4, 5, 6]);
    ed.page(false);
    assert_eq!(ed.cursor().0, 1);
    assert_eq!(ed.scroll(), 1);
}

#[test]
fn screen_cursor_accounts_for_gutter() {
    let mut ed = editor("abc");
    ed.move_end();
    assert_eq!(ed.gutter_width(), 3);
    assert_eq!(ed.screen_cursor(), Some(Pos::new(6, 0)));
}

#[test]
fn click_places_cursor() {
    let mut ed = editor("hello\nworld");
    assert!(ed.click(Pos::new(5, 1)));
    assert_eq!(ed.cursor(), (1, 2));
    assert!(!ed.click(Pos::new(50, 1)));
}

#[test]
fn widget_contract_round_trips_value() {
    let mut ed = editor("a\r\nb");
    assert_eq!(ed.value(), "a\nb");
    ed.set_value("class A:\n    pass\n");
    assert_eq!(ed.value(), "class A:\n    pass\n");
    ed.layout(Rect::new(2, 3, 20, 4));
    assert_eq!(ed.area(), Rect::new(2, 3, 20, 4));
    assert_eq!(ed.container().area, Rect::new(2, 3, 20, 4));
    ed.dispose();
    assert!(ed.is_disposed());
}

#[test]
fn pasted_text_keeps_its_own_indentation() {
    let mut ed = editor("");
    ed.insert_text("def f():\r\n\treturn 1\n");
    assert_eq!(ed.value(), "def f():\n    return 1\n");
    assert_eq!(ed.cursor(), (2, 0));

    ed.insert_text("x");
    assert_eq!(ed.cursor(), (2, 1));
}

#[test]
fn docstring_lines_highlight_as_string() {
    let ed = editor(
        "def f(self):\n    \"\"\"\n    return the class for import\n    \"\"\"\n    pass\n",
    );

    assert_eq!(
        ed.highlight(0),
        vec![
            Token {
                start: 0,
                end: 3,
                kind: TokenKind::Keyword
            },
            Token {
                start: 6,
                end: 10,
                kind: TokenKind::Builtin
            },
        ]
    );
    assert_eq!(
        ed.highlight(2),
        vec![Token {
            start: 0,
            end: 31,
            kind: TokenKind::String
        }]
    );
    assert!(ed.highlight(3).iter().all(|t| t.kind == TokenKind::String));
    assert_eq!(
        ed.highlight(4),
        vec![Token {
            start: 4,
            end: 8,
            kind: TokenKind::Keyword
        }]
    );
}

#[test]
fn highlighting_follows_edits() {
    let mut ed = editor("x = 1\nreturn_value = 2\n");
    assert_eq!(ed.highlight(0)[0].kind, TokenKind::Number);

    ed.insert_char('#');
    assert_eq!(
        ed.highlight(0),
        vec![Token {
            start: 0,
            end: 6,
            kind: TokenKind::Comment
        }]
    );
    assert!(ed.highlight(1).iter().all(|t| t.kind == TokenKind::Number));

    ed.backspace();
    ed.set_value("print('é', 2)");
    let tokens = ed.highlight(0);
    assert_eq!(tokens[0].kind, TokenKind::Builtin);
    assert_eq!((tokens[1].start, tokens[1].end), (6, 9));
    assert_eq!(tokens[1].kind, TokenKind::String);
    assert_eq!((tokens[2].start, tokens[2].end), (11, 12));
}
