//! boxcode - a terminal box editor for Python projects.
//!
//! Modules:
//! - models: the box tree and its wire hierarchy
//! - kernel: headless state/action/effect core, code generation, services
//! - ui: scene projection, layout scheduling, embedded code editors
//! - app: the terminal workbench (`tui` feature)

#[cfg(feature = "tui")]
pub mod app;
pub mod kernel;
pub mod logging;
pub mod models;
#[cfg(feature = "tui")]
pub mod tui;
pub mod ui;
