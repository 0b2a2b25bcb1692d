//! Parse tree kept in step with an editor's rope, and the per-row tokens
//! derived from it.

use ropey::Rope;
use tree_sitter::{InputEdit, Parser, Point, Tree};

use super::{EditorLibrary, Token, TokenKind};

pub(super) struct SyntaxTree {
    parser: Parser,
    tree: Tree,
}

impl SyntaxTree {
    pub(super) fn new(library: &EditorLibrary, rope: &Rope) -> Option<Self> {
        let mut parser = library.parser()?;
        let tree = parse_rope(&mut parser, rope, None)?;
        Some(Self { parser, tree })
    }

    pub(super) fn reparse(&mut self, rope: &Rope) {
        if let Some(tree) = parse_rope(&mut self.parser, rope, None) {
            self.tree = tree;
        }
    }

    /// `rope` is the text after the edit.
    pub(super) fn apply_edit(&mut self, rope: &Rope, edit: &InputEdit) {
        self.tree.edit(edit);
        match parse_rope(&mut self.parser, rope, Some(&self.tree)) {
            Some(tree) => self.tree = tree,
            None => self.reparse(rope),
        }
    }

    pub(super) fn highlight(&self, library: &EditorLibrary, rope: &Rope, row: usize) -> Vec<Token> {
        if row >= rope.len_lines() {
            return Vec::new();
        }
        let line = rope.line(row);
        let mut len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len -= 1;
        }
        let first_char = rope.line_to_char(row);
        let range_start = rope.char_to_byte(first_char);
        let range_end = rope.char_to_byte(first_char + len);
        if range_start >= range_end {
            return Vec::new();
        }

        let mut tokens = Vec::new();
        let mut stack = vec![self.tree.root_node()];
        while let Some(node) = stack.pop() {
            if node.end_byte() <= range_start || node.start_byte() >= range_end {
                continue;
            }

            if let Some(kind) = library.classify(node, rope) {
                let start = node.start_byte().max(range_start);
                let end = node.end_byte().min(range_end);
                if start < end {
                    tokens.push(Token {
                        start: rope.byte_to_char(start) - first_char,
                        end: rope.byte_to_char(end) - first_char,
                        kind,
                    });
                }
                if matches!(kind, TokenKind::Comment | TokenKind::String) {
                    continue;
                }
            }

            for i in (0..node.child_count()).rev() {
                if let Some(child) = node.child(i) {
                    stack.push(child);
                }
            }
        }

        tokens.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));
        merge_adjacent(&mut tokens);
        tokens
    }
}

/// Describes replacing chars `start..end` of `rope` with `text`. Built
/// before the rope changes.
pub(super) fn input_edit(rope: &Rope, start: usize, end: usize, text: &str) -> InputEdit {
    let start_byte = rope.char_to_byte(start);
    let old_end_byte = rope.char_to_byte(end);
    let start_position = point_at(rope, start_byte);
    InputEdit {
        start_byte,
        old_end_byte,
        new_end_byte: start_byte + text.len(),
        start_position,
        old_end_position: point_at(rope, old_end_byte),
        new_end_position: advance_point(start_position, text),
    }
}

fn point_at(rope: &Rope, byte: usize) -> Point {
    let row = rope.byte_to_line(byte);
    Point {
        row,
        column: byte - rope.line_to_byte(row),
    }
}

fn advance_point(start: Point, text: &str) -> Point {
    let mut row = start.row;
    let mut column = start.column;
    for &b in text.as_bytes() {
        if b == b'\n' {
            row += 1;
            column = 0;
        } else {
            column += 1;
        }
    }
    Point { row, column }
}

fn parse_rope(parser: &mut Parser, rope: &Rope, old_tree: Option<&Tree>) -> Option<Tree> {
    parser.parse_with(&mut move |byte, _| bytes_from(rope, byte), old_tree)
}

fn bytes_from(rope: &Rope, byte: usize) -> &[u8] {
    if byte >= rope.len_bytes() {
        return &[];
    }
    let (chunk, chunk_start, _, _) = rope.chunk_at_byte(byte);
    &chunk.as_bytes()[byte - chunk_start..]
}

fn merge_adjacent(tokens: &mut Vec<Token>) {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens.drain(..) {
        if let Some(prev) = out.last_mut() {
            if prev.kind == token.kind && token.start <= prev.end {
                prev.end = prev.end.max(token.end);
                continue;
            }
        }
        out.push(token);
    }
    *tokens = out;
}
