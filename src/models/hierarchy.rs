//! Nested project form used on the wire.

use super::box_tree::{BoxId, BoxKind, BoxTree, BoxTreeError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    #[serde(default)]
    pub id: u64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: BoxKind,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub children: Vec<HierarchyNode>,
}

impl BoxTree {
    pub fn to_hierarchy(&self) -> Vec<HierarchyNode> {
        self.roots()
            .iter()
            .filter_map(|id| self.hierarchy_node(*id))
            .collect()
    }

    fn hierarchy_node(&self, id: BoxId) -> Option<HierarchyNode> {
        let record = self.get(id)?;
        Some(HierarchyNode {
            id: record.id.get(),
            title: record.title.clone(),
            kind: record.kind,
            code: record.code.clone(),
            children: self
                .children(id)
                .iter()
                .filter_map(|child| self.hierarchy_node(*child))
                .collect(),
        })
    }

    /// Builds a fresh store from `nodes`: ids restart at 1 and are assigned
    /// depth-first, every box starts collapsed.
    pub fn from_hierarchy(nodes: &[HierarchyNode]) -> Result<BoxTree, BoxTreeError> {
        let mut tree = BoxTree::new();
        tree.extend_from_hierarchy(nodes, None)?;
        Ok(tree)
    }

    /// Discards the current boxes in favour of `nodes`. On error the store is
    /// left untouched. Returns the ids that were discarded.
    pub fn replace_with_hierarchy(
        &mut self,
        nodes: &[HierarchyNode],
    ) -> Result<Vec<BoxId>, BoxTreeError> {
        let fresh = BoxTree::from_hierarchy(nodes)?;
        let discarded = self.ids();
        *self = fresh;
        Ok(discarded)
    }

    fn extend_from_hierarchy(
        &mut self,
        nodes: &[HierarchyNode],
        parent: Option<BoxId>,
    ) -> Result<(), BoxTreeError> {
        for node in nodes {
            let id = self.insert(node.kind, node.title.clone(), node.code.clone(), parent)?;
            self.extend_from_hierarchy(&node.children, Some(id))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/hierarchy.rs"]
mod tests;
