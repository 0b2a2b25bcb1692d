use super::*;
use rustc_hash::FxHashMap;

struct LiveEdits(FxHashMap<BoxId, String>);

impl CodeSource for LiveEdits {
    fn live_code(&self, id: BoxId) -> Option<String> {
        self.0.get(&id).cloned()
    }
}

fn indent_of(output: &str, needle: &str) -> usize {
    let line = output
        .lines()
        .find(|line| line.trim_start().starts_with(needle))
        .unwrap_or_else(|| panic!("missing line starting with {needle:?}"));
    line.len() - line.trim_start().len()
}

#[test]
fn file_class_method_scenario() {
    let mut tree = BoxTree::new();
    let file = tree.add_file("a.py").unwrap();
    let class = tree.add_child(file, "Foo").unwrap();
    tree.add_child(class, "bar").unwrap();

    let out = generate_project(&tree, &StoredCode);

    assert!(out.contains("# --- Code for a.py ---"));
    assert!(out.contains("# --- End of a.py ---"));
    assert_eq!(indent_of(&out, "class Foo:"), 0);
    assert_eq!(indent_of(&out, "def bar(self):"), 4);
    // The class placeholder is gone; only the method's own body remains.
    let pass_indents: Vec<usize> = out
        .lines()
        .filter(|l| l.trim() == "pass")
        .map(|l| l.len() - l.trim_start().len())
        .collect();
    assert_eq!(pass_indents, vec![8]);
}

#[test]
fn full_output_for_single_file() {
    let mut tree = BoxTree::new();
    let file = tree.add_file("a.py").unwrap();
    let class = tree.add_child(file, "Foo").unwrap();
    tree.add_child(class, "bar").unwrap();

    let out = generate_project(&tree, &StoredCode);
    assert_eq!(
        out,
        "# --- Code for a.py ---\n\
         # File: a.py\n\
         \n\
         \n\
         class Foo:\n    def bar(self):\n        pass\n\
         \n\
         # --- End of a.py ---"
    );
}

#[test]
fn empty_class_keeps_placeholder() {
    let mut tree = BoxTree::new();
    let file = tree.add_file("a.py").unwrap();
    let class = tree.add_child(file, "Foo").unwrap();

    assert_eq!(
        generate_box(&tree, &StoredCode, class, 0),
        "class Foo:\n    pass\n"
    );
}

#[test]
fn init_and_regular_method_signatures() {
    let mut tree = BoxTree::new();
    let file = tree.add_file("a.py").unwrap();
    let class = tree.add_child(file, "Foo").unwrap();
    tree.add_child(class, "__init__").unwrap();
    tree.add_child(class, "run").unwrap();

    let out = generate_project(&tree, &StoredCode);
    assert!(out.contains("    def __init__(self, "));
    assert!(out.contains("    def run(self):\n"));
}

#[test]
fn class_methods_are_joined_with_one_blank_line() {
    let mut tree = BoxTree::new();
    let file = tree.add_file("a.py").unwrap();
    let class = tree.add_child(file, "Foo").unwrap();
    tree.add_child(class, "a").unwrap();
    tree.add_child(class, "b").unwrap();

    let out = generate_box(&tree, &StoredCode, class, 0);
    assert_eq!(
        out,
        "class Foo:\n    def a(self):\n        pass\n\n    def b(self):\n        pass\n"
    );
}

#[test]
fn file_classes_are_joined_with_two_blank_lines() {
    let mut tree = BoxTree::new();
    let file = tree.add_file("a.py").unwrap();
    tree.add_child(file, "A").unwrap();
    tree.add_child(file, "B").unwrap();

    let out = generate_box(&tree, &StoredCode, file, 0);
    assert_eq!(
        out,
        "# File: a.py\n\n\nclass A:\n    pass\n\n\nclass B:\n    pass\n"
    );
}

#[test]
fn class_without_placeholder_appends_methods() {
    let mut tree = BoxTree::new();
    let file = tree.add_file("a.py").unwrap();
    let class = tree.add_child(file, "Foo").unwrap();
    tree.add_child(class, "run").unwrap();
    tree.set_code(class, "class Foo:\n    x = 1".to_string())
        .unwrap();

    let out = generate_box(&tree, &StoredCode, class, 0);
    assert_eq!(
        out,
        "class Foo:\n    x = 1\n    def run(self):\n        pass\n"
    );
}

#[test]
fn placeholder_swallows_trailing_blank_lines_but_keeps_following_code() {
    let mut tree = BoxTree::new();
    let file = tree.add_file("a.py").unwrap();
    let class = tree.add_child(file, "Foo").unwrap();
    tree.add_child(class, "run").unwrap();
    tree.set_code(class, "class Foo:\n    pass\n\n    y = 2\n".to_string())
        .unwrap();

    let out = generate_box(&tree, &StoredCode, class, 0);
    assert_eq!(
        out,
        "class Foo:\n    def run(self):\n        pass\n\n    y = 2\n"
    );
}

#[test]
fn blank_lines_are_not_indented() {
    assert_eq!(indent_block("a\n   \nb", 1), "    a\n\n    b");
}

#[test]
fn live_code_wins_over_stored_code() {
    let mut tree = BoxTree::new();
    let file = tree.add_file("a.py").unwrap();
    let mut live = FxHashMap::default();
    live.insert(file, "import os\n".to_string());

    let out = generate_project(&tree, &LiveEdits(live));
    assert!(out.contains("import os"));
    assert!(!out.contains("# File: a.py"));
}

#[test]
fn files_are_concatenated_in_store_order() {
    let mut tree = BoxTree::new();
    tree.add_file("b.py").unwrap();
    tree.add_file("a.py").unwrap();

    let out = generate_project(&tree, &StoredCode);
    let b = out.find("# --- Code for b.py ---").unwrap();
    let a = out.find("# --- Code for a.py ---").unwrap();
    assert!(b < a);
    assert!(out.starts_with("# --- Code for b.py ---"));
    assert!(out.ends_with("# --- End of a.py ---"));
}

#[test]
fn empty_tree_generates_nothing() {
    assert_eq!(generate_project(&BoxTree::new(), &StoredCode), "");
}
