use super::*;

fn classified(source: &str) -> Vec<(String, TokenKind)> {
    let library = EditorLibrary::python();
    let rope = Rope::from_str(source);
    let tree = library.parser().unwrap().parse(source, None).unwrap();

    let mut found = Vec::new();
    let mut stack = vec![tree.root_node()];
    while let Some(node) = stack.pop() {
        if let Some(kind) = library.classify(node, &rope) {
            let text = source[node.start_byte()..node.end_byte()].to_string();
            found.push((node.start_byte(), text, kind));
            if matches!(kind, TokenKind::String | TokenKind::Comment) {
                continue;
            }
        }
        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }
    found.sort_by_key(|(start, _, _)| *start);
    found
        .into_iter()
        .map(|(_, text, kind)| (text, kind))
        .collect()
}

#[test]
fn python_grammar_parses_a_module() {
    let library = EditorLibrary::python();
    assert_eq!(library.language(), "python");
    assert!(library.node_kind_count() > 0);

    let tree = library
        .parser()
        .unwrap()
        .parse("class A:\n    def f(self):\n        pass\n", None)
        .unwrap();
    assert_eq!(tree.root_node().kind(), "module");
    assert!(!tree.root_node().has_error());
}

#[test]
fn keyword_kinds_exclude_plain_names() {
    let library = EditorLibrary::python();
    assert!(library.is_keyword("class"));
    assert!(library.is_keyword("pass"));
    assert!(!library.is_keyword("print"));
    assert!(!library.is_keyword("identifier"));
}

#[test]
fn nodes_classify_by_grammar_role() {
    let found = classified("def f(self):\n    return print(1.5, \"s\")  # done\n");
    let expected = [
        ("def", TokenKind::Keyword),
        ("self", TokenKind::Builtin),
        ("return", TokenKind::Keyword),
        ("print", TokenKind::Builtin),
        ("1.5", TokenKind::Number),
        ("\"s\"", TokenKind::String),
        ("# done", TokenKind::Comment),
    ];
    let expected: Vec<(String, TokenKind)> = expected
        .iter()
        .map(|(text, kind)| (text.to_string(), *kind))
        .collect();
    assert_eq!(found, expected);
}

#[test]
fn literals_and_names_outside_calls() {
    let found = classified("value_2 = None\n");
    assert_eq!(found, vec![("None".to_string(), TokenKind::Keyword)]);

    let found = classified("s = 'class import'\n");
    assert_eq!(
        found,
        vec![("'class import'".to_string(), TokenKind::String)]
    );
}
