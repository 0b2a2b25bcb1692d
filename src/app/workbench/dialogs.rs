use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::render::to_geom;
use super::Workbench;
use crate::kernel::NoticeLevel;
use crate::ui::scene::{Node, NodeKind, Sense};

const MODAL_LAYER: u8 = 1;

pub(super) fn render_modals(workbench: &mut Workbench, frame: &mut Frame, area: Rect) {
    let ui = &workbench.store.state().ui;
    let (preview, picker, input, confirm, notice) = (
        ui.code_preview.visible,
        ui.project_picker.visible,
        ui.input_dialog.visible,
        ui.confirm_dialog.visible,
        !ui.notices.is_empty(),
    );

    if preview {
        workbench.render_preview(frame, area);
    }
    if picker {
        workbench.render_picker(frame, area);
    }
    if input {
        workbench.render_input_dialog(frame, area);
    }
    if confirm {
        workbench.render_confirm_dialog(frame, area);
    }
    if notice {
        workbench.render_notice(frame, area);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

fn hint(key: &'static str, label: &'static str, key_style: Style) -> Vec<Span<'static>> {
    vec![Span::styled(key, key_style), Span::raw(label)]
}

impl Workbench {
    fn modal_block(&self, title: String, color: ratatui::style::Color) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
    }

    fn render_input_dialog(&mut self, frame: &mut Frame, area: Rect) {
        let dialog = &self.store.state().ui.input_dialog;
        let width = 60.min(area.width.saturating_sub(4)).max(20);
        let rect = centered(area, width, 5);
        if rect.height < 3 {
            return;
        }
        frame.render_widget(Clear, rect);
        let block = self.modal_block(dialog.title.clone(), self.theme.focus_border);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        // Keep the caret in view for values wider than the box.
        let before = &dialog.value[..dialog.cursor.min(dialog.value.len())];
        let caret = before.width() as u16;
        let skip = caret.saturating_sub(inner.width.saturating_sub(1));
        let visible: String = {
            let mut cols = 0u16;
            dialog
                .value
                .chars()
                .skip_while(|c| {
                    let skip_it = cols < skip;
                    cols += c.width().unwrap_or(0) as u16;
                    skip_it
                })
                .collect()
        };
        let key_style = Style::default().fg(self.theme.button_fg);
        let mut lines = vec![Line::raw(visible)];
        if inner.height > 1 {
            let mut spans = hint("[Enter]", " OK  ", key_style);
            spans.extend(hint("[Esc]", " Cancel", key_style));
            lines.push(Line::from(spans).style(Style::default().fg(self.theme.muted_fg)));
        }
        frame.render_widget(Paragraph::new(lines), inner);

        if inner.width > 0 && inner.height > 0 {
            let x = inner.x + (caret - skip).min(inner.width - 1);
            self.cursor = Some((x, inner.y));
        }
        self.block_clicks(rect);
    }

    fn render_confirm_dialog(&mut self, frame: &mut Frame, area: Rect) {
        let dialog = &self.store.state().ui.confirm_dialog;
        let width = 56.min(area.width.saturating_sub(4)).max(20);
        let rect = centered(area, width, 6);
        if rect.height < 3 {
            return;
        }
        frame.render_widget(Clear, rect);
        let block = self.modal_block("Confirm".to_string(), self.theme.error_fg);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let key_style = Style::default().fg(self.theme.button_fg);
        let mut spans = hint("[Enter/y]", " Delete  ", key_style);
        spans.extend(hint("[Esc/n]", " Cancel", key_style));
        let content = Paragraph::new(vec![
            Line::raw(dialog.message.clone()),
            Line::raw(""),
            Line::from(spans),
        ])
        .wrap(Wrap { trim: true });
        frame.render_widget(content, inner);
        self.block_clicks(rect);
    }

    fn render_notice(&mut self, frame: &mut Frame, area: Rect) {
        let Some(notice) = self.store.state().ui.notices.current() else {
            return;
        };
        let (title, color) = match notice.level {
            NoticeLevel::Info => ("Info", self.theme.notice_fg(NoticeLevel::Info)),
            NoticeLevel::Error => ("Error", self.theme.notice_fg(NoticeLevel::Error)),
        };
        let width = 60.min(area.width.saturating_sub(4)).max(20);
        let text_width = width.saturating_sub(2).max(1) as usize;
        let wrapped_rows = notice
            .message
            .lines()
            .map(|l| l.width().max(1).div_ceil(text_width))
            .sum::<usize>() as u16;
        let rect = centered(area, width, wrapped_rows + 4);
        if rect.height < 3 {
            return;
        }
        frame.render_widget(Clear, rect);
        let block = self.modal_block(title.to_string(), color);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let key_style = Style::default().fg(self.theme.button_fg);
        let mut lines: Vec<Line> = notice
            .message
            .lines()
            .map(|l| Line::raw(l.to_string()))
            .collect();
        lines.push(Line::raw(""));
        lines.push(Line::from(hint("[Enter]", " OK", key_style)));
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
        self.block_clicks(rect);
    }

    fn render_picker(&mut self, frame: &mut Frame, area: Rect) {
        let picker = &self.store.state().ui.project_picker;
        let projects = picker.projects.clone();
        let selected = picker.selected;
        let rows = projects.len().max(1) as u16;
        let width = 50.min(area.width.saturating_sub(4)).max(20);
        let rect = centered(area, width, rows.saturating_add(4).min(area.height));
        if rect.height < 3 {
            return;
        }
        frame.render_widget(Clear, rect);
        let block = self.modal_block("Load Project".to_string(), self.theme.focus_border);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        self.block_clicks(rect);

        if projects.is_empty() {
            let empty = Paragraph::new("No saved projects found.")
                .style(Style::default().fg(self.theme.muted_fg));
            frame.render_widget(empty, inner);
            return;
        }

        let list_height = inner.height.saturating_sub(1).max(1) as usize;
        let first = selected.saturating_sub(list_height - 1);
        let selected_style = Style::default()
            .bg(self.theme.selected_bg)
            .add_modifier(Modifier::BOLD);

        let mut items = Vec::new();
        for (offset, (index, name)) in projects
            .iter()
            .enumerate()
            .skip(first)
            .take(list_height)
            .enumerate()
        {
            let row = Rect::new(inner.x, inner.y + offset as u16, inner.width, 1);
            let style = if index == selected {
                selected_style
            } else {
                Style::default()
            };
            frame.render_widget(Paragraph::new(name.as_str()).style(style), row);
            items.push(
                Node::new(to_geom(row), Sense::CLICK, NodeKind::PickerItem { index })
                    .on_layer(MODAL_LAYER + 1),
            );
        }
        if inner.height > 1 {
            let key_style = Style::default().fg(self.theme.button_fg);
            let mut spans = hint("[Enter]", " Load  ", key_style);
            spans.extend(hint("[Esc]", " Close", key_style));
            let hint_row = Rect::new(inner.x, inner.bottom() - 1, inner.width, 1);
            frame.render_widget(
                Paragraph::new(Line::from(spans)).style(Style::default().fg(self.theme.muted_fg)),
                hint_row,
            );
        }
        for item in items {
            self.hits.push(item);
        }
    }

    fn render_preview(&mut self, frame: &mut Frame, area: Rect) {
        let preview = &self.store.state().ui.code_preview;
        let export = &self.store.state().export;
        let rect = Rect::new(
            area.x + 2.min(area.width / 8),
            area.y + 1.min(area.height / 8),
            area.width.saturating_sub(4.min(area.width / 4)),
            area.height.saturating_sub(2.min(area.height / 4)),
        );
        if rect.height < 4 || rect.width < 10 {
            return;
        }
        frame.render_widget(Clear, rect);
        let block = self.modal_block("Generated Code".to_string(), self.theme.focus_border);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let body_rows = inner.height.saturating_sub(1);
        let total = preview.code.lines().count().max(1);
        let number_width = total.to_string().len();
        let number_style = Style::default().fg(self.theme.line_number_fg);
        let lines: Vec<Line> = if preview.code.is_empty() {
            vec![Line::styled(
                "Nothing to generate yet.",
                Style::default().fg(self.theme.muted_fg),
            )]
        } else {
            preview
                .code
                .lines()
                .enumerate()
                .skip(preview.scroll)
                .take(body_rows as usize)
                .map(|(i, l)| {
                    Line::from(vec![
                        Span::styled(format!("{:>number_width$} ", i + 1), number_style),
                        Span::raw(l.to_string()),
                    ])
                })
                .collect()
        };
        frame.render_widget(
            Paragraph::new(lines),
            Rect::new(inner.x, inner.y, inner.width, body_rows),
        );

        let key_style = Style::default().fg(self.theme.button_fg);
        let mut spans = vec![
            Span::styled("[w]", key_style),
            Span::raw(format!(" write {}  ", export.file_name)),
        ];
        spans.extend(hint("[\u{2191}\u{2193}]", " scroll  ", key_style));
        spans.extend(hint("[Esc]", " close", key_style));
        let hint_row = Rect::new(inner.x, inner.bottom() - 1, inner.width, 1);
        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().fg(self.theme.muted_fg)),
            hint_row,
        );

        self.last_preview_rows = body_rows.max(1);
        self.block_clicks(rect);
    }

    pub(super) fn preview_page_height(&self) -> u16 {
        self.last_preview_rows.max(1)
    }

    /// Modal surfaces swallow clicks meant for what is underneath.
    fn block_clicks(&mut self, rect: Rect) {
        self.hits.push(
            Node::new(to_geom(rect), Sense::CLICK | Sense::SCROLL, NodeKind::SceneArea)
                .on_layer(MODAL_LAYER),
        );
    }
}
