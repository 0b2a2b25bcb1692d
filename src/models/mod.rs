//! Data models: the box tree and its nested wire form.

pub mod box_tree;
pub mod hierarchy;

pub use box_tree::{placeholder_code, BoxId, BoxKind, BoxRecord, BoxTree, BoxTreeError};
pub use hierarchy::HierarchyNode;
