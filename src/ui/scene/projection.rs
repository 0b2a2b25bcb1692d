use rustc_hash::FxHashMap;

use crate::models::{BoxId, BoxKind, BoxTree};

pub const HEADER_HEIGHT: u16 = 1;
pub const EDITOR_HEIGHT: u16 = 8;
pub const INDENT_WIDTH: u16 = 2;

/// Retained view of one box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoxView {
    pub id: BoxId,
    pub title: String,
    pub kind: BoxKind,
    pub expanded: bool,
    pub depth: usize,
    pub children: Vec<BoxId>,
}

impl BoxView {
    /// Collapsing only shrinks the content area; the view stays.
    pub fn content_height(&self) -> u16 {
        if self.expanded {
            EDITOR_HEIGHT
        } else {
            0
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneDiff {
    pub entered: Vec<BoxId>,
    pub updated: Vec<BoxId>,
    pub exited: Vec<BoxId>,
}

impl SceneDiff {
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.updated.is_empty() && self.exited.is_empty()
    }
}

/// Vertical placement of a box, in virtual rows from the top of the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxSlot {
    pub id: BoxId,
    pub depth: usize,
    pub top: u32,
    pub content_height: u16,
}

impl BoxSlot {
    pub fn content_top(&self) -> u32 {
        self.top + HEADER_HEIGHT as u32
    }

    pub fn indent(&self) -> u16 {
        (self.depth as u16).saturating_mul(INDENT_WIDTH)
    }
}

#[derive(Debug, Default)]
pub struct BoxScene {
    views: FxHashMap<BoxId, BoxView>,
    order: Vec<BoxId>,
}

impl BoxScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles the retained views with the store, keyed by box id.
    pub fn project(&mut self, tree: &BoxTree) -> SceneDiff {
        let mut desired = FxHashMap::default();
        let mut order = Vec::with_capacity(tree.len());
        descend(tree, tree.roots(), 0, &mut desired, &mut order);

        let mut diff = SceneDiff::default();
        for id in &order {
            match (self.views.get(id), desired.get(id)) {
                (None, Some(_)) => diff.entered.push(*id),
                (Some(old), Some(new)) if old != new => diff.updated.push(*id),
                _ => {}
            }
        }
        diff.exited = self
            .views
            .keys()
            .filter(|id| !desired.contains_key(*id))
            .copied()
            .collect();
        diff.exited.sort();

        self.views = desired;
        self.order = order;
        diff
    }

    pub fn view(&self, id: BoxId) -> Option<&BoxView> {
        self.views.get(&id)
    }

    /// Views in drawing order (parents before their children).
    pub fn order(&self) -> &[BoxId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn layout(&self) -> Vec<BoxSlot> {
        let mut top = 0u32;
        let mut slots = Vec::with_capacity(self.order.len());
        for id in &self.order {
            let Some(view) = self.views.get(id) else {
                continue;
            };
            let content_height = view.content_height();
            slots.push(BoxSlot {
                id: *id,
                depth: view.depth,
                top,
                content_height,
            });
            top += HEADER_HEIGHT as u32 + content_height as u32;
        }
        slots
    }

    pub fn total_height(&self) -> u32 {
        self.order
            .iter()
            .filter_map(|id| self.views.get(id))
            .map(|view| HEADER_HEIGHT as u32 + view.content_height() as u32)
            .sum()
    }
}

fn descend(
    tree: &BoxTree,
    ids: &[BoxId],
    depth: usize,
    desired: &mut FxHashMap<BoxId, BoxView>,
    order: &mut Vec<BoxId>,
) {
    for id in ids {
        let Some(record) = tree.get(*id) else {
            continue;
        };
        let children = if record.kind.can_have_children() {
            tree.children(*id).to_vec()
        } else {
            Vec::new()
        };
        desired.insert(
            *id,
            BoxView {
                id: *id,
                title: record.title.clone(),
                kind: record.kind,
                expanded: record.expanded,
                depth,
                children: children.clone(),
            },
        );
        order.push(*id);
        descend(tree, &children, depth + 1, desired, order);
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/scene/projection.rs"]
mod tests;
