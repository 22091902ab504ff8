//! Hierarchy builder: derives parent/child links from a flat, dotted-id keyed table.

use generational_arena::Index;
use tracing::{debug, instrument, warn};

use crate::domain::arena::{CriterionTree, NodeData};
use crate::domain::entities::CriterionRow;
use crate::domain::order::parent_id;

/// Outcome of linking a flat table.
#[derive(Debug)]
pub struct Hierarchy {
    pub tree: CriterionTree,
    /// Ids attached directly below the synthetic root, in input order
    pub roots: Vec<String>,
    /// Ids that occurred more than once; the later row wins the id lookup
    pub duplicates: Vec<String>,
}

/// Constructs criteria trees from flat rows.
///
/// Building never fails: a row whose parent id is missing becomes a root, and a
/// duplicate id is flagged rather than rejected.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    duplicates: Vec<String>,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "debug", skip_all, fields(rows = rows.len()))]
    pub fn build(&mut self, rows: &[CriterionRow]) -> Hierarchy {
        // Reset state for a fresh build
        self.duplicates.clear();

        let mut tree = CriterionTree::new();
        let handles = self.insert_rows(&mut tree, rows);
        let roots = self.link(&mut tree, &handles);

        if !self.duplicates.is_empty() {
            warn!(
                "duplicate criterion ids, later rows win: {}",
                self.duplicates.join(", ")
            );
        }
        debug!("built tree: {} criteria, {} roots", tree.len(), roots.len());

        Hierarchy {
            tree,
            roots,
            duplicates: std::mem::take(&mut self.duplicates),
        }
    }

    fn insert_rows(&mut self, tree: &mut CriterionTree, rows: &[CriterionRow]) -> Vec<Index> {
        rows.iter()
            .enumerate()
            .map(|(position, row)| {
                let (idx, shadowed) = tree.insert_node(NodeData::from_row(row, position));
                if shadowed.is_some() && !self.duplicates.contains(&row.id) {
                    self.duplicates.push(row.id.clone());
                }
                idx
            })
            .collect()
    }

    fn link(&self, tree: &mut CriterionTree, handles: &[Index]) -> Vec<String> {
        let mut roots = Vec::new();
        for &idx in handles {
            let id = match tree.get_node(idx) {
                Some(node) => node.data.id.clone(),
                None => continue,
            };
            let parent = parent_id(&id)
                .and_then(|pid| tree.find(pid))
                .filter(|&p| p != idx && !tree.is_root(p));
            match parent {
                Some(parent_idx) => tree.attach(idx, parent_idx),
                None => {
                    if parent_id(&id).is_some() {
                        debug!("orphan {}: parent missing, attaching to root", id);
                    }
                    tree.attach(idx, tree.root());
                    roots.push(id);
                }
            }
        }
        roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_links_children_in_input_order() {
        let rows = vec![
            CriterionRow::new("1", "A", 1.0),
            CriterionRow::new("1.2", "B", 0.5),
            CriterionRow::new("1.1", "C", 0.5),
        ];
        let hierarchy = HierarchyBuilder::new().build(&rows);
        let tree = &hierarchy.tree;
        let parent = tree.find("1").unwrap();
        let children: Vec<&str> = tree
            .get_node(parent)
            .unwrap()
            .children
            .iter()
            .map(|&c| tree.get_node(c).unwrap().data.id.as_str())
            .collect();
        assert_eq!(children, vec!["1.2", "1.1"]);
        assert_eq!(hierarchy.roots, vec!["1"]);
    }
}
