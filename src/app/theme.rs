//! Colors for box chrome, the code editors and dialogs, overridable from
//! the settings file.

use ratatui::style::Color;

use crate::kernel::services::ports::ThemeSettings;
use crate::kernel::NoticeLevel;
use crate::models::BoxKind;
use crate::ui::editor::TokenKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiTheme {
    pub focus_border: Color,
    pub inactive_border: Color,
    pub file_fg: Color,
    pub class_fg: Color,
    pub method_fg: Color,
    pub selected_bg: Color,
    pub keyword_fg: Color,
    pub builtin_fg: Color,
    pub string_fg: Color,
    pub number_fg: Color,
    pub comment_fg: Color,
    pub line_number_fg: Color,
    pub error_fg: Color,
    pub info_fg: Color,
    pub muted_fg: Color,
    pub button_fg: Color,
}

impl Default for UiTheme {
    fn default() -> Self {
        Self {
            focus_border: Color::Cyan,
            inactive_border: Color::DarkGray,
            file_fg: Color::Yellow,
            class_fg: Color::LightBlue,
            method_fg: Color::LightGreen,
            selected_bg: Color::DarkGray,
            keyword_fg: Color::Magenta,
            builtin_fg: Color::Cyan,
            string_fg: Color::Rgb(0xCE, 0x91, 0x78),
            number_fg: Color::Rgb(0xB5, 0xCE, 0xA8),
            comment_fg: Color::Rgb(0x6A, 0x99, 0x55),
            line_number_fg: Color::DarkGray,
            error_fg: Color::Red,
            info_fg: Color::Green,
            muted_fg: Color::DarkGray,
            button_fg: Color::White,
        }
    }
}

impl UiTheme {
    pub fn from_settings(settings: &ThemeSettings) -> Self {
        let mut theme = Self::default();
        theme.apply_settings(settings);
        theme
    }

    /// Unknown or empty color names leave the current color in place.
    pub fn apply_settings(&mut self, settings: &ThemeSettings) {
        let slots: [(&mut Color, &Option<String>); 9] = [
            (&mut self.focus_border, &settings.focus_border),
            (&mut self.inactive_border, &settings.inactive_border),
            (&mut self.file_fg, &settings.file_fg),
            (&mut self.class_fg, &settings.class_fg),
            (&mut self.method_fg, &settings.method_fg),
            (&mut self.selected_bg, &settings.selected_bg),
            (&mut self.keyword_fg, &settings.keyword_fg),
            (&mut self.line_number_fg, &settings.line_number_fg),
            (&mut self.error_fg, &settings.error_fg),
        ];
        for (slot, value) in slots {
            match value.as_deref().map(parse_color) {
                Some(Some(color)) => *slot = color,
                Some(None) => {
                    tracing::warn!(value = ?value, "ignoring unknown theme color");
                }
                None => {}
            }
        }
    }

    pub fn kind_fg(&self, kind: BoxKind) -> Color {
        match kind {
            BoxKind::File => self.file_fg,
            BoxKind::Class => self.class_fg,
            BoxKind::Method => self.method_fg,
        }
    }

    pub fn token_fg(&self, kind: TokenKind) -> Color {
        match kind {
            TokenKind::Keyword => self.keyword_fg,
            TokenKind::Builtin => self.builtin_fg,
            TokenKind::String => self.string_fg,
            TokenKind::Number => self.number_fg,
            TokenKind::Comment => self.comment_fg,
        }
    }

    pub fn notice_fg(&self, level: NoticeLevel) -> Color {
        match level {
            NoticeLevel::Info => self.info_fg,
            NoticeLevel::Error => self.error_fg,
        }
    }

    /// Downgrades 24-bit colors when the terminal does not advertise them.
    pub fn adapt_to_terminal(&mut self) {
        let colorterm = std::env::var("COLORTERM")
            .unwrap_or_default()
            .to_ascii_lowercase();
        if colorterm.contains("truecolor") || colorterm.contains("24bit") {
            return;
        }
        for color in [
            &mut self.string_fg,
            &mut self.number_fg,
            &mut self.comment_fg,
        ] {
            *color = to_ansi256(*color);
        }
    }
}

pub fn parse_color(value: &str) -> Option<Color> {
    let v = value.trim();
    if let Some(hex) = v.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }

    let color = match v.to_ascii_lowercase().replace('-', "_").as_str() {
        "reset" | "default" => Color::Reset,
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "dark_gray" | "dark_grey" => Color::DarkGray,
        "light_red" => Color::LightRed,
        "light_green" => Color::LightGreen,
        "light_yellow" => Color::LightYellow,
        "light_blue" => Color::LightBlue,
        "light_magenta" => Color::LightMagenta,
        "light_cyan" => Color::LightCyan,
        "white" => Color::White,
        _ => return None,
    };
    Some(color)
}

fn to_ansi256(color: Color) -> Color {
    let Color::Rgb(r, g, b) = color else {
        return color;
    };
    let level = |c: u8| -> u8 {
        if c < 48 {
            0
        } else if c < 115 {
            1
        } else {
            (c - 35) / 40
        }
    };
    Color::Indexed(16 + 36 * level(r) + 6 * level(g) + level(b))
}

#[cfg(test)]
#[path = "../../tests/unit/app/theme.rs"]
mod tests;
