//! Code generation: flattens the box tree into one indented source listing.

use crate::models::{BoxId, BoxKind, BoxTree};

const INDENT_WIDTH: usize = 4;

/// Where live (possibly unsynced) code for a box comes from.
pub trait CodeSource {
    fn live_code(&self, id: BoxId) -> Option<String>;
}

/// Reads nothing live; generation falls back to the stored code.
pub struct StoredCode;

impl CodeSource for StoredCode {
    fn live_code(&self, _id: BoxId) -> Option<String> {
        None
    }
}

/// All files in store order, each wrapped in begin/end markers.
pub fn generate_project(tree: &BoxTree, source: &dyn CodeSource) -> String {
    let mut out = String::new();
    for &id in tree.roots() {
        let Some(file) = tree.get(id) else {
            continue;
        };
        out.push_str(&format!("# --- Code for {} ---\n", file.title));
        out.push_str(&generate_box(tree, source, id, 0));
        out.push_str(&format!("\n# --- End of {} ---\n\n", file.title));
    }
    out.trim().to_string()
}

pub fn generate_box(tree: &BoxTree, source: &dyn CodeSource, id: BoxId, level: usize) -> String {
    let Some(record) = tree.get(id) else {
        return String::new();
    };

    let code = source
        .live_code(id)
        .unwrap_or_else(|| record.code.clone());
    let mut result = indent_block(&code, level);

    if !record.kind.can_have_children() {
        return result;
    }

    // Classes and functions inside a file start back at column 0.
    let child_level = match record.kind {
        BoxKind::File => 0,
        _ => level + 1,
    };
    let parts: Vec<String> = tree
        .children(id)
        .iter()
        .map(|child| generate_box(tree, source, *child, child_level))
        .filter(|part| !part.is_empty())
        .collect();
    let separator = if record.kind == BoxKind::Class {
        "\n"
    } else {
        "\n\n"
    };
    let child_code = parts.join(separator);
    if child_code.trim().is_empty() {
        return result;
    }

    match record.kind {
        BoxKind::Class => match replace_pass_placeholder(&result, level + 1, &child_code) {
            Some(replaced) => result = replaced,
            None => {
                if !result.trim().is_empty() {
                    result.push('\n');
                }
                result.push_str(&child_code);
            }
        },
        _ => {
            if !result.trim().is_empty() {
                result.push_str("\n\n");
            }
            result.push_str(&child_code);
        }
    }

    result
}

fn indent_block(code: &str, level: usize) -> String {
    let indent = " ".repeat(level * INDENT_WIDTH);
    code.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replaces the first `pass` line sitting exactly at `level`, plus any blank
/// lines right after it, with `replacement`.
fn replace_pass_placeholder(code: &str, level: usize, replacement: &str) -> Option<String> {
    let marker = format!("{}pass", " ".repeat(level * INDENT_WIDTH));
    let lines: Vec<&str> = code.split('\n').collect();
    let at = lines.iter().position(|line| line.trim_end() == marker)?;

    let mut rest = at + 1;
    while rest < lines.len() && lines[rest].trim().is_empty() {
        rest += 1;
    }

    let mut out = String::with_capacity(code.len() + replacement.len());
    for line in &lines[..at] {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(replacement);
    if rest < lines.len() {
        out.push('\n');
        out.push_str(&lines[rest..].join("\n"));
    }
    Some(out)
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/codegen.rs"]
mod tests;
