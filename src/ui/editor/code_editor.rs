use std::collections::BTreeSet;
use std::sync::Arc;

use ropey::Rope;
use unicode_width::UnicodeWidthChar;

use super::syntax::{self, SyntaxTree};
use super::{ContainerRef, EditorFactory, EditorLibrary, EditorOptions, EditorWidget, Token};
use crate::ui::geom::{Pos, Rect};

const INDENT: usize = 4;

/// A small rope-backed Python editor living inside one box.
pub struct CodeEditor {
    rope: Rope,
    cursor: (usize, usize),
    scroll: usize,
    folds: BTreeSet<usize>,
    area: Rect,
    container: ContainerRef,
    language: String,
    options: EditorOptions,
    library: Arc<EditorLibrary>,
    syntax: Option<SyntaxTree>,
    disposed: bool,
}

impl CodeEditor {
    pub fn new(
        container: ContainerRef,
        language: &str,
        value: &str,
        options: &EditorOptions,
        library: Arc<EditorLibrary>,
    ) -> Self {
        let rope = Rope::from_str(&normalize(value));
        let syntax = SyntaxTree::new(&library, &rope);
        if syntax.is_none() {
            tracing::warn!(language, "no parser for editor, highlighting off");
        }
        Self {
            rope,
            cursor: (0, 0),
            scroll: 0,
            folds: BTreeSet::new(),
            area: container.area,
            container,
            language: language.to_string(),
            options: options.clone(),
            library,
            syntax,
            disposed: false,
        }
    }

    pub fn container(&self) -> ContainerRef {
        self.container
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn line(&self, row: usize) -> String {
        if row >= self.rope.len_lines() {
            return String::new();
        }
        let mut line = self.rope.line(row).to_string();
        if line.ends_with('\n') {
            line.pop();
        }
        line
    }

    fn line_len(&self, row: usize) -> usize {
        self.line(row).chars().count()
    }

    fn char_index(&self, row: usize, col: usize) -> usize {
        self.rope.line_to_char(row) + col.min(self.line_len(row))
    }

    pub fn highlight(&self, row: usize) -> Vec<Token> {
        match &self.syntax {
            Some(syntax) => syntax.highlight(&self.library, &self.rope, row),
            None => Vec::new(),
        }
    }

    /// Replaces chars `start..end` with `text`, keeping the parse tree in step.
    fn splice(&mut self, start: usize, end: usize, text: &str) {
        let edit = syntax::input_edit(&self.rope, start, end, text);
        if end > start {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
        if let Some(syntax) = self.syntax.as_mut() {
            syntax.apply_edit(&self.rope, &edit);
        }
    }

    // ---- editing ----

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_newline();
            return;
        }
        let (row, col) = self.cursor;
        let idx = self.char_index(row, col);
        let mut buf = [0; 4];
        self.splice(idx, idx, ch.encode_utf8(&mut buf));
        self.cursor = (row, col + 1);
        self.after_edit(false);
    }

    /// Carries the current indentation over, one level deeper after a `:`.
    pub fn insert_newline(&mut self) {
        let (row, col) = self.cursor;
        let line = self.line(row);
        let before: String = line.chars().take(col).collect();
        let mut indent: String = before.chars().take_while(|c| *c == ' ').collect();
        if before.trim_end().ends_with(':') {
            indent.push_str(&" ".repeat(INDENT));
        }

        let idx = self.char_index(row, col);
        let inserted = format!("\n{indent}");
        self.splice(idx, idx, &inserted);
        self.cursor = (row + 1, indent.chars().count());
        self.after_edit(true);
    }

    /// Inserts pasted text verbatim, without auto-indent.
    pub fn insert_text(&mut self, text: &str) {
        let text = normalize(text)
            .replace('\r', "")
            .replace('\t', &" ".repeat(INDENT));
        if text.is_empty() {
            return;
        }
        let (row, col) = self.cursor;
        let idx = self.char_index(row, col);
        self.splice(idx, idx, &text);
        let end = idx + text.chars().count();
        let new_row = self.rope.char_to_line(end);
        self.cursor = (new_row, end - self.rope.line_to_char(new_row));
        self.after_edit(text.contains('\n'));
    }

    pub fn insert_tab(&mut self) {
        let (row, col) = self.cursor;
        let width = INDENT - col % INDENT;
        let idx = self.char_index(row, col);
        self.splice(idx, idx, &" ".repeat(width));
        self.cursor = (row, col + width);
        self.after_edit(false);
    }

    pub fn backspace(&mut self) {
        let (row, col) = self.cursor;
        if col == 0 {
            if row == 0 {
                return;
            }
            let prev_len = self.line_len(row - 1);
            let idx = self.rope.line_to_char(row);
            self.splice(idx - 1, idx, "");
            self.cursor = (row - 1, prev_len);
            self.after_edit(true);
            return;
        }

        let line = self.line(row);
        let only_spaces_before = line.chars().take(col).all(|c| c == ' ');
        let count = if only_spaces_before {
            (col - 1) % INDENT + 1
        } else {
            1
        };
        let end = self.char_index(row, col);
        self.splice(end - count, end, "");
        self.cursor = (row, col - count);
        self.after_edit(false);
    }

    pub fn delete(&mut self) {
        let (row, col) = self.cursor;
        if col < self.line_len(row) {
            let idx = self.char_index(row, col);
            self.splice(idx, idx + 1, "");
            self.after_edit(false);
        } else if row + 1 < self.line_count() {
            let idx = self.char_index(row, col);
            self.splice(idx, idx + 1, "");
            self.after_edit(true);
        }
    }

    fn after_edit(&mut self, lines_changed: bool) {
        if lines_changed {
            self.folds.clear();
        } else {
            let headers: Vec<usize> = self.folds.iter().copied().collect();
            for header in headers {
                if self.fold_range(header).is_none() {
                    self.folds.remove(&header);
                }
            }
        }
        self.reveal_cursor();
        self.ensure_cursor_visible();
    }

    // ---- movement ----

    pub fn move_left(&mut self) {
        let (row, col) = self.cursor;
        if col > 0 {
            self.cursor = (row, col - 1);
        } else if let Some(prev) = self.prev_visible_row(row) {
            self.cursor = (prev, self.line_len(prev));
        }
        self.ensure_cursor_visible();
    }

    pub fn move_right(&mut self) {
        let (row, col) = self.cursor;
        if col < self.line_len(row) {
            self.cursor = (row, col + 1);
        } else if let Some(next) = self.next_visible_row(row) {
            self.cursor = (next, 0);
        }
        self.ensure_cursor_visible();
    }

    pub fn move_up(&mut self) {
        let (row, col) = self.cursor;
        if let Some(prev) = self.prev_visible_row(row) {
            self.cursor = (prev, col.min(self.line_len(prev)));
        }
        self.ensure_cursor_visible();
    }

    pub fn move_down(&mut self) {
        let (row, col) = self.cursor;
        if let Some(next) = self.next_visible_row(row) {
            self.cursor = (next, col.min(self.line_len(next)));
        }
        self.ensure_cursor_visible();
    }

    pub fn move_home(&mut self) {
        let row = self.cursor.0;
        let indent = self.line(row).chars().take_while(|c| *c == ' ').count();
        let col = if self.cursor.1 == indent { 0 } else { indent };
        self.cursor = (row, col);
    }

    pub fn move_end(&mut self) {
        let row = self.cursor.0;
        self.cursor = (row, self.line_len(row));
    }

    pub fn page(&mut self, down: bool) {
        let step = (self.area.h as usize).max(1);
        for _ in 0..step {
            if down {
                self.move_down();
            } else {
                self.move_up();
            }
        }
    }

    /// Moves the cursor to a cell inside the editor area.
    pub fn click(&mut self, pos: Pos) -> bool {
        if !self.area.contains(pos) {
            return false;
        }
        let offset = (pos.y - self.area.y) as usize;
        let rows = self.visible_rows();
        let Some(&row) = rows.get(self.scroll + offset) else {
            return false;
        };
        let gutter = self.gutter_width() as usize;
        let x = (pos.x - self.area.x) as usize;
        let target = x.saturating_sub(gutter);

        let mut width = 0;
        let mut col = 0;
        for ch in self.line(row).chars() {
            let w = ch.width().unwrap_or(0);
            if width + w > target {
                break;
            }
            width += w;
            col += 1;
        }
        self.cursor = (row, col);
        true
    }

    // ---- folding ----

    /// Rows hidden when `row` is folded: the indented block under a line that
    /// ends with `:`.
    pub fn fold_range(&self, row: usize) -> Option<(usize, usize)> {
        let header = self.line(row);
        if !header.trim_end().ends_with(':') {
            return None;
        }
        let base = indent_width(&header);
        let mut end = None;
        for next in row + 1..self.line_count() {
            let line = self.line(next);
            if line.trim().is_empty() {
                continue;
            }
            if indent_width(&line) <= base {
                break;
            }
            end = Some(next);
        }
        end.map(|end| (row + 1, end))
    }

    pub fn toggle_fold(&mut self) -> bool {
        if !self.options.folding {
            return false;
        }
        let row = self.cursor.0;
        if self.folds.remove(&row) {
            return true;
        }
        if self.fold_range(row).is_none() {
            return false;
        }
        self.folds.insert(row);
        self.ensure_cursor_visible();
        true
    }

    pub fn is_folded(&self, row: usize) -> bool {
        self.folds.contains(&row)
    }

    pub fn is_foldable(&self, row: usize) -> bool {
        self.options.folding && self.fold_range(row).is_some()
    }

    fn is_hidden(&self, row: usize) -> bool {
        self.folds.iter().any(|header| {
            self.fold_range(*header)
                .is_some_and(|(start, end)| row >= start && row <= end)
        })
    }

    fn reveal_cursor(&mut self) {
        let row = self.cursor.0;
        let headers: Vec<usize> = self.folds.iter().copied().collect();
        for header in headers {
            if let Some((start, end)) = self.fold_range(header) {
                if row >= start && row <= end {
                    self.folds.remove(&header);
                }
            }
        }
    }

    pub fn visible_rows(&self) -> Vec<usize> {
        (0..self.line_count())
            .filter(|row| !self.is_hidden(*row))
            .collect()
    }

    fn prev_visible_row(&self, row: usize) -> Option<usize> {
        (0..row).rev().find(|r| !self.is_hidden(*r))
    }

    fn next_visible_row(&self, row: usize) -> Option<usize> {
        (row + 1..self.line_count()).find(|r| !self.is_hidden(*r))
    }

    // ---- viewport ----

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Rows currently drawn, top to bottom.
    pub fn rows_in_view(&self) -> Vec<usize> {
        self.visible_rows()
            .into_iter()
            .skip(self.scroll)
            .take(self.area.h as usize)
            .collect()
    }

    pub fn gutter_width(&self) -> u16 {
        if !self.options.line_numbers {
            return if self.options.folding { 2 } else { 0 };
        }
        let digits = self.line_count().max(1).to_string().len() as u16;
        digits + 2
    }

    fn ensure_cursor_visible(&mut self) {
        let height = self.area.h as usize;
        if height == 0 {
            return;
        }
        let rows = self.visible_rows();
        let Some(idx) = rows.iter().position(|r| *r == self.cursor.0) else {
            return;
        };
        if idx < self.scroll {
            self.scroll = idx;
        } else if idx >= self.scroll + height {
            self.scroll = idx + 1 - height;
        }
    }

    /// Terminal cell of the cursor, if it is on screen.
    pub fn screen_cursor(&self) -> Option<Pos> {
        let (row, col) = self.cursor;
        let offset = self.rows_in_view().iter().position(|r| *r == row)?;
        let width: usize = self
            .line(row)
            .chars()
            .take(col)
            .map(|ch| ch.width().unwrap_or(0))
            .sum();
        let x = self.area.x as usize + self.gutter_width() as usize + width;
        if x >= self.area.right() as usize {
            return None;
        }
        Some(Pos::new(x as u16, self.area.y + offset as u16))
    }
}

impl EditorWidget for CodeEditor {
    fn value(&self) -> String {
        self.rope.to_string()
    }

    fn set_value(&mut self, value: &str) {
        self.rope = Rope::from_str(&normalize(value));
        if let Some(syntax) = self.syntax.as_mut() {
            syntax.reparse(&self.rope);
        }
        self.folds.clear();
        self.cursor = (0, 0);
        self.scroll = 0;
    }

    fn layout(&mut self, area: Rect) {
        self.area = area;
        self.container.area = area;
        self.ensure_cursor_visible();
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.folds.clear();
    }
}

pub struct CodeEditorFactory {
    library: Arc<EditorLibrary>,
}

impl CodeEditorFactory {
    pub fn new(library: Arc<EditorLibrary>) -> Self {
        Self { library }
    }
}

impl EditorFactory for CodeEditorFactory {
    type Widget = CodeEditor;

    fn create(
        &self,
        container: ContainerRef,
        language: &str,
        initial_value: &str,
        options: &EditorOptions,
    ) -> CodeEditor {
        CodeEditor::new(
            container,
            language,
            initial_value,
            options,
            self.library.clone(),
        )
    }
}

fn normalize(value: &str) -> String {
    value.replace("\r\n", "\n")
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ').count()
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/editor/code_editor.rs"]
mod tests;
