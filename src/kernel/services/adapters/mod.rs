//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod http;
pub mod paths;
pub mod runtime;
pub mod settings;

pub use http::HttpProjectApi;
pub use paths::{ensure_log_dir, get_log_dir};
pub use runtime::{AppMessage, AsyncRuntime};
pub use settings::{ensure_settings_file, get_settings_path, load_settings, load_settings_from};
