pub mod clipboard;
pub mod terminal_guard;
