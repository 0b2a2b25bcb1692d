use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use super::{dialogs, Workbench};
use crate::app::theme::UiTheme;
use crate::kernel::FocusTarget;
use crate::ui::editor::{CodeEditor, Token};
use crate::ui::geom;
use crate::ui::scene::{
    header_buttons, header_title_rect, toolbar_buttons, BoxSlot, BoxView, Node, NodeKind, Sense,
    HEADER_HEIGHT,
};

const TREE_HINTS: &str =
    "a file  c child  r rename  d delete  y copy  \u{23ce} toggle  e edit  s save  o load  g generate  q quit";
const EDITOR_HINTS: &str = "Esc back  ^F fold  Tab indent";

pub(super) fn to_geom(rect: Rect) -> geom::Rect {
    geom::Rect::new(rect.x, rect.y, rect.width, rect.height)
}

pub(super) fn render(workbench: &mut Workbench, frame: &mut Frame, area: Rect, now: Instant) {
    workbench.hits.clear();
    workbench.cursor = None;
    if area.width == 0 || area.height < 3 {
        return;
    }

    let toolbar = Rect::new(area.x, area.y, area.width, 1);
    let status = Rect::new(area.x, area.bottom() - 1, area.width, 1);
    let scene = Rect::new(area.x, area.y + 1, area.width, area.height - 2);

    workbench
        .renderer
        .project(&workbench.store.state().tree, &mut workbench.registry);

    workbench.render_toolbar(frame, toolbar);
    workbench.render_scene(frame, scene);
    workbench.renderer.schedule_layout(&workbench.registry, now);
    workbench.render_status(frame, status);

    dialogs::render_modals(workbench, frame, area);
}

impl Workbench {
    fn render_toolbar(&mut self, frame: &mut Frame, area: Rect) {
        let button_style = Style::default()
            .fg(self.theme.button_fg)
            .add_modifier(Modifier::BOLD);
        for (action, rect) in toolbar_buttons(to_geom(area)) {
            let cell = Rect::new(rect.x, rect.y, rect.w, rect.h);
            frame.render_widget(Paragraph::new(action.label()).style(button_style), cell);
            self.hits
                .push(Node::new(rect, Sense::CLICK, NodeKind::Toolbar { action }));
        }

        let label = match &self.store.state().persistence.last_project_name {
            Some(name) => format!("boxcode \u{00b7} {name}"),
            None => "boxcode".to_string(),
        };
        let width = label.width() as u16;
        if width + 1 < area.width / 2 {
            let cell = Rect::new(area.right() - width, area.y, width, 1);
            let style = Style::default().fg(self.theme.muted_fg);
            frame.render_widget(Paragraph::new(label).style(style), cell);
        }
    }

    fn render_scene(&mut self, frame: &mut Frame, area: Rect) {
        self.last_scene_area = Some(area);
        self.hits.push(Node::new(
            to_geom(area),
            Sense::CLICK | Sense::SCROLL,
            NodeKind::SceneArea,
        ));
        if area.height == 0 {
            return;
        }

        if self.renderer.scene().is_empty() {
            let hint = Paragraph::new("No boxes yet. Press 'a' or click [Add File] to start.")
                .style(Style::default().fg(self.theme.muted_fg));
            frame.render_widget(hint, area);
            return;
        }

        let slots = self.renderer.scene().layout();
        self.reveal_selection(&slots, area.height);

        let top = self.scene_scroll;
        let bottom = top + area.height as u32;
        for slot in &slots {
            let Some(view) = self.renderer.scene().view(slot.id).cloned() else {
                continue;
            };
            let indent = slot.indent().min(area.width.saturating_sub(1));
            let x = area.x + indent;
            let width = area.width - indent;

            if slot.top >= top && slot.top < bottom {
                let y = area.y + (slot.top - top) as u16;
                self.render_box_header(frame, &view, Rect::new(x, y, width, HEADER_HEIGHT));
            }

            if slot.content_height == 0 {
                continue;
            }
            let start = slot.content_top().max(top);
            let end = (slot.content_top() + slot.content_height as u32).min(bottom);
            let rows = end.saturating_sub(start) as u16;
            let y = if rows > 0 {
                area.y + (start - top) as u16
            } else {
                area.y
            };
            // One column for the left rule, the rest belongs to the editor.
            let content = Rect::new(x.saturating_add(1), y, width.saturating_sub(1), rows);
            self.renderer.set_content_area(slot.id, to_geom(content));
            if rows > 0 && content.width > 0 {
                let rule = Rect::new(x, y, 1, rows);
                self.render_box_content(frame, &view, rule, content);
            }
        }
    }

    /// Scrolls just enough to show a newly selected box.
    fn reveal_selection(&mut self, slots: &[BoxSlot], height: u16) {
        let total: u32 = slots
            .last()
            .map(|s| s.content_top() + s.content_height as u32)
            .unwrap_or(0);
        let max_scroll = total.saturating_sub(height as u32);

        let selected = self.store.state().ui.selected;
        if selected != self.last_selected {
            self.last_selected = selected;
            if let Some(slot) = selected.and_then(|id| slots.iter().find(|s| s.id == id)) {
                let block_bottom = slot.content_top() + slot.content_height as u32;
                if slot.top < self.scene_scroll {
                    self.scene_scroll = slot.top;
                } else if block_bottom > self.scene_scroll + height as u32 {
                    self.scene_scroll = block_bottom.saturating_sub(height as u32).min(slot.top);
                }
            }
        }
        self.scene_scroll = self.scene_scroll.min(max_scroll);
    }

    fn render_box_header(&mut self, frame: &mut Frame, view: &BoxView, area: Rect) {
        let ui = &self.store.state().ui;
        let selected = ui.selected == Some(view.id);
        let editing = selected && ui.focus == FocusTarget::Editor;

        let mut base = Style::default();
        if selected {
            base = base.bg(self.theme.selected_bg);
        }
        let arrow = if view.expanded { "\u{25be}" } else { "\u{25b8}" };
        let border = if editing {
            self.theme.focus_border
        } else {
            self.theme.inactive_border
        };

        let buttons = header_buttons(to_geom(area), view.kind);
        let text_end = buttons
            .iter()
            .map(|(_, r)| r.x)
            .min()
            .unwrap_or(area.right())
            .saturating_sub(1);
        let text_area = Rect::new(area.x, area.y, text_end.saturating_sub(area.x), 1);

        let line = Line::from(vec![
            Span::styled(format!("{arrow} "), base.fg(border)),
            Span::styled(
                format!("{} ", view.kind.as_str()),
                base.fg(self.theme.kind_fg(view.kind)),
            ),
            Span::styled(view.title.clone(), base.add_modifier(Modifier::BOLD)),
        ]);
        frame.render_widget(Paragraph::new("").style(base), area);
        frame.render_widget(Paragraph::new(line).style(base), text_area);

        self.hits.push(Node::new(
            to_geom(area),
            Sense::CLICK,
            NodeKind::BoxHeader { id: view.id },
        ));
        if let Some(rect) = header_title_rect(to_geom(area), view.kind, &view.title, text_end) {
            self.hits.push(Node::new(
                rect,
                Sense::CLICK,
                NodeKind::BoxTitle { id: view.id },
            ));
        }

        let button_style = base.fg(self.theme.button_fg);
        for (button, rect) in buttons {
            let cell = Rect::new(rect.x, rect.y, rect.w, rect.h);
            frame.render_widget(
                Paragraph::new(button.label(view.kind)).style(button_style),
                cell,
            );
            self.hits.push(Node::new(
                rect,
                Sense::CLICK,
                NodeKind::HeaderButton {
                    id: view.id,
                    button,
                },
            ));
        }
    }

    fn render_box_content(&mut self, frame: &mut Frame, view: &BoxView, rule: Rect, area: Rect) {
        let ui = &self.store.state().ui;
        let editing = ui.selected == Some(view.id) && ui.focus == FocusTarget::Editor;
        let rule_color = if editing {
            self.theme.focus_border
        } else {
            self.theme.kind_fg(view.kind)
        };
        let rule_lines: Vec<Line> = (0..rule.height).map(|_| Line::raw("\u{2502}")).collect();
        frame.render_widget(
            Paragraph::new(rule_lines).style(Style::default().fg(rule_color)),
            rule,
        );

        self.hits.push(Node::new(
            to_geom(area),
            Sense::CLICK | Sense::SCROLL,
            NodeKind::EditorArea { id: view.id },
        ));

        match self.registry.get_editor(view.id) {
            Some(editor) => {
                let (lines, cursor) = editor_lines(editor, area, &self.theme);
                frame.render_widget(Paragraph::new(lines), area);
                if editing {
                    self.cursor = cursor;
                }
            }
            None => {
                let code = self
                    .store
                    .state()
                    .tree
                    .get(view.id)
                    .map(|record| record.code.clone())
                    .unwrap_or_default();
                let lines: Vec<Line> = code
                    .lines()
                    .take(area.height as usize)
                    .map(|l| Line::raw(l.to_string()))
                    .collect();
                let style = Style::default().fg(self.theme.muted_fg);
                frame.render_widget(Paragraph::new(lines).style(style), area);
            }
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let hints = match self.store.state().ui.focus {
            FocusTarget::Editor => EDITOR_HINTS,
            FocusTarget::Tree => TREE_HINTS,
        };

        // Loading state and the last log line sit on the right and win over
        // the hints when space runs out.
        let muted = Style::default().fg(self.theme.muted_fg);
        let mut extras = Vec::new();
        if !self.registry.is_ready() {
            extras.push(Span::styled("(editor loading) ", muted));
        }
        if let Some(line) = self.logs.back() {
            extras.push(Span::styled(format!("| {line} "), muted));
        }
        let extras_width = extras
            .iter()
            .map(|span| span.width() as u16)
            .sum::<u16>()
            .min(area.width / 2);

        let left = Rect::new(area.x, area.y, area.width - extras_width, 1);
        frame.render_widget(Paragraph::new(hints), left);
        if extras_width > 0 {
            let right = Rect::new(left.right(), area.y, extras_width, 1);
            frame.render_widget(Paragraph::new(Line::from(extras)), right);
        }
    }
}

/// Visible rows of a live editor with gutter and highlighting, plus the
/// caret cell when it is on screen.
fn editor_lines(
    editor: &CodeEditor,
    area: Rect,
    theme: &UiTheme,
) -> (Vec<Line<'static>>, Option<(u16, u16)>) {
    let gutter = editor.gutter_width() as usize;
    let number_width = gutter.saturating_sub(2);
    let show_numbers = editor.options().line_numbers;
    let gutter_style = Style::default().fg(theme.line_number_fg);
    let (cursor_row, cursor_col) = editor.cursor();

    let rows: Vec<usize> = editor
        .visible_rows()
        .into_iter()
        .skip(editor.scroll())
        .take(area.height as usize)
        .collect();

    let mut cursor = None;
    let mut lines = Vec::with_capacity(rows.len());
    for (offset, row) in rows.iter().enumerate() {
        let marker = if editor.is_folded(*row) {
            "\u{25b8}"
        } else if editor.is_foldable(*row) {
            "\u{25be}"
        } else {
            " "
        };
        let mut prefix = String::with_capacity(gutter);
        if show_numbers {
            prefix.push_str(&format!("{:>number_width$}", row + 1));
        }
        if gutter > 0 {
            prefix.push_str(marker);
            prefix.push(' ');
        }

        let text = editor.line(*row);
        let mut spans = vec![Span::styled(prefix, gutter_style)];
        spans.extend(highlight(&text, &editor.highlight(*row), theme));
        lines.push(Line::from(spans));

        if *row == cursor_row {
            let before: String = text.chars().take(cursor_col).collect();
            let x = area.x as usize + gutter + before.width();
            if x < area.right() as usize {
                cursor = Some((x as u16, area.y + offset as u16));
            }
        }
    }
    (lines, cursor)
}

fn highlight(line: &str, tokens: &[Token], theme: &UiTheme) -> Vec<Span<'static>> {
    let chars: Vec<char> = line.chars().collect();
    let mut spans = Vec::new();
    let mut col = 0usize;
    for token in tokens {
        let start = token.start.clamp(col, chars.len());
        let end = token.end.clamp(start, chars.len());
        if start > col {
            spans.push(Span::raw(chars[col..start].iter().collect::<String>()));
        }
        if end > start {
            spans.push(Span::styled(
                chars[start..end].iter().collect::<String>(),
                Style::default().fg(theme.token_fg(token.kind)),
            ));
        }
        col = end;
    }
    if col < chars.len() {
        spans.push(Span::raw(chars[col..].iter().collect::<String>()));
    }
    spans
}
