//! Embedded code editors, one per expanded box.

mod code_editor;
mod library;
mod registry;
mod syntax;

pub use code_editor::{CodeEditor, CodeEditorFactory};
pub use library::{EditorLibrary, Token, TokenKind};
pub use registry::EditorRegistry;

use crate::models::BoxId;
use crate::ui::geom::Rect;

pub const PYTHON: &str = "python";

/// Where a widget is mounted: the content area of its owning box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContainerRef {
    pub owner: BoxId,
    pub area: Rect,
}

impl ContainerRef {
    pub fn new(owner: BoxId, area: Rect) -> Self {
        Self { owner, area }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorOptions {
    pub theme: String,
    pub line_numbers: bool,
    pub folding: bool,
    pub minimap: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            line_numbers: true,
            folding: true,
            minimap: false,
        }
    }
}

pub trait EditorWidget {
    fn value(&self) -> String;
    fn set_value(&mut self, value: &str);
    fn layout(&mut self, area: Rect);
    fn dispose(&mut self);
}

/// Builds widgets once the editor library is available.
pub trait EditorFactory {
    type Widget: EditorWidget;

    fn create(
        &self,
        container: ContainerRef,
        language: &str,
        initial_value: &str,
        options: &EditorOptions,
    ) -> Self::Widget;
}
