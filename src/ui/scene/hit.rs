use std::ops::{BitOr, BitOrAssign};

use crate::models::{BoxId, BoxKind};
use unicode_width::UnicodeWidthStr;

use crate::ui::geom::{Pos, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Sense(u16);

impl Sense {
    pub const NONE: Self = Self(0);
    pub const CLICK: Self = Self(1 << 0);
    pub const SCROLL: Self = Self(1 << 1);

    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl BitOr for Sense {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Sense {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderButton {
    AddChild,
    Copy,
    Delete,
}

impl HeaderButton {
    pub fn label(self, kind: BoxKind) -> &'static str {
        match (self, kind) {
            (HeaderButton::AddChild, BoxKind::File) => "[+class]",
            (HeaderButton::AddChild, _) => "[+method]",
            (HeaderButton::Copy, _) => "[copy]",
            (HeaderButton::Delete, _) => "[del]",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolbarAction {
    AddFile,
    Save,
    Load,
    Generate,
}

impl ToolbarAction {
    pub const ALL: [ToolbarAction; 4] = [
        ToolbarAction::AddFile,
        ToolbarAction::Save,
        ToolbarAction::Load,
        ToolbarAction::Generate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ToolbarAction::AddFile => "[Add File]",
            ToolbarAction::Save => "[Save]",
            ToolbarAction::Load => "[Load]",
            ToolbarAction::Generate => "[Generate]",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Toolbar { action: ToolbarAction },
    BoxHeader { id: BoxId },
    BoxTitle { id: BoxId },
    HeaderButton { id: BoxId, button: HeaderButton },
    EditorArea { id: BoxId },
    SceneArea,
    PickerItem { index: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    pub rect: Rect,
    pub layer: u8,
    pub z: u32,
    pub sense: Sense,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(rect: Rect, sense: Sense, kind: NodeKind) -> Self {
        Self {
            rect,
            layer: 0,
            z: 0,
            sense,
            kind,
        }
    }

    pub fn on_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }

    pub fn contains(&self, p: Pos) -> bool {
        self.rect.contains(p)
    }
}

/// Clickable regions of the last frame.
#[derive(Clone, Debug, Default)]
pub struct HitTree {
    nodes: Vec<Node>,
}

impl HitTree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn push(&mut self, mut node: Node) {
        // Default z-order: insertion order within the same layer.
        if node.z == 0 {
            node.z = self.nodes.len() as u32;
        }
        self.nodes.push(node);
    }

    pub fn hit_test(&self, p: Pos) -> Option<&Node> {
        self.nodes
            .iter()
            .filter(|n| n.contains(p))
            .max_by(|a, b| (a.layer, a.z).cmp(&(b.layer, b.z)))
    }

    pub fn hit_test_with_sense(&self, p: Pos, required: Sense) -> Option<&Node> {
        self.nodes
            .iter()
            .filter(|n| n.sense.contains(required) && n.contains(p))
            .max_by(|a, b| (a.layer, a.z).cmp(&(b.layer, b.z)))
    }
}

/// Right-aligned action buttons of a box header, right to left.
pub fn header_buttons(header: Rect, kind: BoxKind) -> Vec<(HeaderButton, Rect)> {
    let mut buttons = vec![HeaderButton::Delete, HeaderButton::Copy];
    if kind.can_have_children() {
        buttons.push(HeaderButton::AddChild);
    }

    let mut right = header.right();
    let mut out = Vec::with_capacity(buttons.len());
    for button in buttons {
        let width = button.label(kind).len() as u16;
        if right < header.x + width {
            break;
        }
        let x = right - width;
        out.push((button, Rect::new(x, header.y, width, 1)));
        right = x.saturating_sub(1);
    }
    out
}

/// Cells of the title drawn after the `"{arrow} {kind} "` prefix, clipped
/// before `text_end`.
pub fn header_title_rect(header: Rect, kind: BoxKind, title: &str, text_end: u16) -> Option<Rect> {
    let x = header.x + 2 + kind.as_str().len() as u16 + 1;
    let end = x.saturating_add(title.width() as u16).min(text_end);
    (end > x).then(|| Rect::new(x, header.y, end - x, 1))
}

/// Left-aligned toolbar buttons separated by one space.
pub fn toolbar_buttons(bar: Rect) -> Vec<(ToolbarAction, Rect)> {
    let mut x = bar.x;
    let mut out = Vec::with_capacity(ToolbarAction::ALL.len());
    for action in ToolbarAction::ALL {
        let width = action.label().len() as u16;
        if x + width > bar.right() {
            break;
        }
        out.push((action, Rect::new(x, bar.y, width, 1)));
        x += width + 1;
    }
    out
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/scene/hit.rs"]
mod tests;
