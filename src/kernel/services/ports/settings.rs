use serde::{Deserialize, Serialize};

use crate::kernel::state::DEFAULT_EXPORT_FILE_NAME;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_LAYOUT_SETTLE_MS: u64 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,
    /// Delay before a box's editor is built or re-laid out after a render.
    #[serde(default = "default_layout_settle_ms")]
    pub layout_settle_ms: u64,
    #[serde(default)]
    pub theme: ThemeSettings,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_export_file_name() -> String {
    DEFAULT_EXPORT_FILE_NAME.to_string()
}

fn default_layout_settle_ms() -> u64 {
    DEFAULT_LAYOUT_SETTLE_MS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_border: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive_border: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_fg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_fg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_fg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_bg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_fg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number_fg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_fg: Option<String>,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            focus_border: Some("cyan".to_string()),
            inactive_border: Some("dark_gray".to_string()),
            file_fg: Some("yellow".to_string()),
            class_fg: Some("light_blue".to_string()),
            method_fg: Some("light_green".to_string()),
            selected_bg: Some("dark_gray".to_string()),
            keyword_fg: Some("magenta".to_string()),
            line_number_fg: Some("dark_gray".to_string()),
            error_fg: Some("red".to_string()),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            export_file_name: default_export_file_name(),
            layout_settle_ms: DEFAULT_LAYOUT_SETTLE_MS,
            theme: ThemeSettings::default(),
        }
    }
}
