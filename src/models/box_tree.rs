//! Box tree model: an ordered forest of file/class/method boxes.
//!
//! Records live in a flat map addressed by [`BoxId`]; store order and the
//! parent -> children order are kept in side indexes so descendant lookups
//! never rescan the whole store.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoxId(pub u64);

impl BoxId {
    pub const fn raw(v: u64) -> Self {
        Self(v)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxKind {
    File,
    Class,
    Method,
}

impl BoxKind {
    /// The only kind a box of this kind may be nested under.
    pub fn parent_kind(self) -> Option<BoxKind> {
        match self {
            BoxKind::File => None,
            BoxKind::Class => Some(BoxKind::File),
            BoxKind::Method => Some(BoxKind::Class),
        }
    }

    pub fn child_kind(self) -> Option<BoxKind> {
        match self {
            BoxKind::File => Some(BoxKind::Class),
            BoxKind::Class => Some(BoxKind::Method),
            BoxKind::Method => None,
        }
    }

    pub fn can_have_children(self) -> bool {
        self.child_kind().is_some()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BoxKind::File => "file",
            BoxKind::Class => "class",
            BoxKind::Method => "method",
        }
    }
}

impl fmt::Display for BoxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Initial code for a freshly added box.
pub fn placeholder_code(kind: BoxKind, title: &str) -> String {
    match kind {
        BoxKind::File => format!("# File: {title}\n"),
        BoxKind::Class => format!("class {title}:\n    pass\n"),
        BoxKind::Method => {
            let params = if title == "__init__" { "self, " } else { "self" };
            format!("def {title}({params}):\n    pass\n")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoxTreeError {
    EmptyTitle,
    UnknownBox(BoxId),
    LeafParent(BoxKind),
    InvalidParent {
        kind: BoxKind,
        parent: Option<BoxKind>,
    },
}

impl fmt::Display for BoxTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxTreeError::EmptyTitle => write!(f, "title is empty"),
            BoxTreeError::UnknownBox(id) => write!(f, "no box with id {id}"),
            BoxTreeError::LeafParent(kind) => write!(f, "a {kind} box cannot have children"),
            BoxTreeError::InvalidParent { kind, parent: None } => {
                write!(f, "a {kind} box needs a parent")
            }
            BoxTreeError::InvalidParent {
                kind,
                parent: Some(parent),
            } => write!(f, "a {kind} box cannot be placed under a {parent} box"),
        }
    }
}

impl std::error::Error for BoxTreeError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxRecord {
    pub id: BoxId,
    pub title: String,
    pub kind: BoxKind,
    pub code: String,
    pub expanded: bool,
    pub parent: Option<BoxId>,
}

#[derive(Debug, Clone)]
pub struct BoxTree {
    records: FxHashMap<BoxId, BoxRecord>,
    order: Vec<BoxId>,
    roots: Vec<BoxId>,
    children: FxHashMap<BoxId, Vec<BoxId>>,
    next_id: u64,
}

impl Default for BoxTree {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxTree {
    pub fn new() -> Self {
        Self {
            records: FxHashMap::default(),
            order: Vec::new(),
            roots: Vec::new(),
            children: FxHashMap::default(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: BoxId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn get(&self, id: BoxId) -> Option<&BoxRecord> {
        self.records.get(&id)
    }

    /// Boxes in store (creation) order.
    pub fn iter(&self) -> impl Iterator<Item = &BoxRecord> + '_ {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    pub fn ids(&self) -> Vec<BoxId> {
        self.order.clone()
    }

    pub fn roots(&self) -> &[BoxId] {
        &self.roots
    }

    pub fn children(&self, id: BoxId) -> &[BoxId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parent(&self, id: BoxId) -> Option<BoxId> {
        self.records.get(&id).and_then(|r| r.parent)
    }

    pub fn depth(&self, id: BoxId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    /// All transitive descendants of `id`, depth-first, excluding `id` itself.
    pub fn descendants(&self, id: BoxId) -> Vec<BoxId> {
        let mut out = Vec::new();
        let mut stack: Vec<BoxId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Every box with its depth, parents before children, siblings in order.
    pub fn preorder(&self) -> Vec<(BoxId, usize)> {
        let mut out = Vec::with_capacity(self.order.len());
        let mut stack: Vec<(BoxId, usize)> = self.roots.iter().rev().map(|id| (*id, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            out.push((id, depth));
            stack.extend(self.children(id).iter().rev().map(|c| (*c, depth + 1)));
        }
        out
    }

    pub fn add_file(&mut self, title: &str) -> Result<BoxId, BoxTreeError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BoxTreeError::EmptyTitle);
        }
        self.insert(
            BoxKind::File,
            title.to_string(),
            placeholder_code(BoxKind::File, title),
            None,
        )
    }

    /// Adds a class under a file or a method under a class, and expands the
    /// parent so the new child is visible.
    pub fn add_child(&mut self, parent: BoxId, title: &str) -> Result<BoxId, BoxTreeError> {
        let parent_kind = self
            .records
            .get(&parent)
            .ok_or(BoxTreeError::UnknownBox(parent))?
            .kind;
        let kind = parent_kind
            .child_kind()
            .ok_or(BoxTreeError::LeafParent(parent_kind))?;

        let title = title.trim();
        if title.is_empty() {
            return Err(BoxTreeError::EmptyTitle);
        }

        let id = self.insert(
            kind,
            title.to_string(),
            placeholder_code(kind, title),
            Some(parent),
        )?;
        if let Some(parent) = self.records.get_mut(&parent) {
            parent.expanded = true;
        }
        Ok(id)
    }

    pub(crate) fn insert(
        &mut self,
        kind: BoxKind,
        title: String,
        code: String,
        parent: Option<BoxId>,
    ) -> Result<BoxId, BoxTreeError> {
        let parent_kind = match parent {
            Some(p) => Some(self.records.get(&p).ok_or(BoxTreeError::UnknownBox(p))?.kind),
            None => None,
        };
        if kind.parent_kind() != parent_kind {
            return Err(BoxTreeError::InvalidParent {
                kind,
                parent: parent_kind,
            });
        }

        let id = BoxId(self.next_id);
        self.next_id += 1;

        self.records.insert(
            id,
            BoxRecord {
                id,
                title,
                kind,
                code,
                expanded: false,
                parent,
            },
        );
        self.order.push(id);
        match parent {
            Some(p) => self.children.entry(p).or_default().push(id),
            None => self.roots.push(id),
        }
        Ok(id)
    }

    /// Removes `id` and all of its descendants. Returns the removed ids, the
    /// box itself first.
    pub fn remove_subtree(&mut self, id: BoxId) -> Result<Vec<BoxId>, BoxTreeError> {
        let parent = self
            .records
            .get(&id)
            .ok_or(BoxTreeError::UnknownBox(id))?
            .parent;

        let mut removed = vec![id];
        removed.extend(self.descendants(id));
        let removed_set: FxHashSet<BoxId> = removed.iter().copied().collect();

        for rid in &removed {
            self.records.remove(rid);
            self.children.remove(rid);
        }
        self.order.retain(|b| !removed_set.contains(b));
        match parent {
            Some(p) => {
                if let Some(siblings) = self.children.get_mut(&p) {
                    siblings.retain(|b| *b != id);
                }
            }
            None => self.roots.retain(|b| *b != id),
        }

        Ok(removed)
    }

    /// Returns whether the title changed; empty or identical titles are ignored.
    pub fn rename(&mut self, id: BoxId, title: &str) -> Result<bool, BoxTreeError> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(BoxTreeError::UnknownBox(id))?;
        let title = title.trim();
        if title.is_empty() || title == record.title {
            return Ok(false);
        }
        record.title = title.to_string();
        Ok(true)
    }

    /// Flips `expanded` and returns the new value.
    pub fn toggle_expanded(&mut self, id: BoxId) -> Result<bool, BoxTreeError> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(BoxTreeError::UnknownBox(id))?;
        record.expanded = !record.expanded;
        Ok(record.expanded)
    }

    pub fn set_code(&mut self, id: BoxId, code: String) -> Result<bool, BoxTreeError> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(BoxTreeError::UnknownBox(id))?;
        if record.code == code {
            return Ok(false);
        }
        record.code = code;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/box_tree.rs"]
mod tests;
