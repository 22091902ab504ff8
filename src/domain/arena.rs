use generational_arena::{Arena, Index};
use std::collections::HashMap;
use std::fmt;
use tracing::instrument;

use crate::domain::entities::CriterionRow;
use crate::domain::order::compare_ids;

/// Data payload for tree nodes representing criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    /// Dotted id, empty for the synthetic root
    pub id: String,
    pub name: String,
    /// Share within the parent, as a fraction
    pub weight: f64,
    /// Score in [0, 1], `None` while not evaluated
    pub score: Option<f64>,
    /// Position of the source row in the flat table, `None` for the synthetic root
    pub row: Option<usize>,
}

impl NodeData {
    pub fn from_row(row: &CriterionRow, position: usize) -> Self {
        Self {
            id: row.id.clone(),
            name: row.name.clone(),
            weight: row.weight,
            score: row.score,
            row: Some(position),
        }
    }

    fn synthetic_root() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            weight: 1.0,
            score: None,
            row: None,
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.row.is_none() {
            return write!(f, "(root)");
        }
        write!(f, "{} {}", self.id, self.name)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Criterion data for this node
    pub data: NodeData,
    /// Index of parent node in the arena, None for the synthetic root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena
    pub children: Vec<Index>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-based criteria tree.
///
/// Every tree owns one synthetic root; top-level criteria and orphans hang below it.
/// Nodes are addressed by generational `Index` handles and looked up by dotted id.
#[derive(Debug)]
pub struct CriterionTree {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the synthetic root node
    root: Index,
    /// Dotted id to node handle; a later duplicate id shadows the earlier one
    by_id: HashMap<String, Index>,
}

impl Default for CriterionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CriterionTree {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(TreeNode {
            data: NodeData::synthetic_root(),
            parent: None,
            children: Vec::new(),
        });
        Self {
            arena,
            root,
            by_id: HashMap::new(),
        }
    }

    /// Insert a detached node and register its id. Returns the shadowed handle when
    /// the id was already present.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData) -> (Index, Option<Index>) {
        let id = data.id.clone();
        let node_idx = self.arena.insert(TreeNode {
            data,
            parent: None,
            children: Vec::new(),
        });
        let shadowed = self.by_id.insert(id, node_idx);
        (node_idx, shadowed)
    }

    /// Append `child` to the children of `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, child: Index, parent: Index) {
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn is_root(&self, idx: Index) -> bool {
        idx == self.root
    }

    /// Look up a node by dotted id. The empty id resolves to the synthetic root.
    pub fn find(&self, id: &str) -> Option<Index> {
        if id.is_empty() {
            return Some(self.root);
        }
        self.by_id.get(id).copied()
    }

    pub fn parent_of(&self, idx: Index) -> Option<Index> {
        self.get_node(idx).and_then(|node| node.parent)
    }

    /// Number of criteria, the synthetic root excluded.
    pub fn len(&self) -> usize {
        self.arena.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of the nodes directly below the synthetic root.
    pub fn root_ids(&self) -> Vec<String> {
        self.get_node(self.root)
            .map(|root| {
                root.children
                    .iter()
                    .filter_map(|&c| self.get_node(c))
                    .map(|n| n.data.id.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sort every child list by natural id order. The sort is stable, so duplicate
    /// ids keep their input order.
    #[instrument(level = "trace", skip(self))]
    pub fn sort_children(&mut self) {
        let handles: Vec<Index> = self.arena.iter().map(|(idx, _)| idx).collect();
        for idx in handles {
            let mut children = match self.arena.get(idx) {
                Some(node) if node.children.len() > 1 => node.children.clone(),
                _ => continue,
            };
            children.sort_by(|&a, &b| {
                let a = self.arena.get(a).map(|n| n.data.id.as_str()).unwrap_or("");
                let b = self.arena.get(b).map(|n| n.data.id.as_str()).unwrap_or("");
                compare_ids(a, b)
            });
            if let Some(node) = self.arena.get_mut(idx) {
                node.children = children;
            }
        }
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Depth of `idx` below the synthetic root (the root itself is 0).
    pub fn depth_of(&self, idx: Index) -> usize {
        let mut depth = 0;
        let mut current = self.parent_of(idx);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent_of(parent);
        }
        depth
    }

    /// Longest root-to-leaf path length in edges; 0 for a tree without criteria.
    #[instrument(level = "debug", skip(self))]
    pub fn height(&self) -> usize {
        self.calculate_height(self.root)
    }

    fn calculate_height(&self, node_idx: Index) -> usize {
        self.get_node(node_idx)
            .map(|node| {
                node.children
                    .iter()
                    .map(|&child| 1 + self.calculate_height(child))
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }

    /// Collects the ids of all leaf criteria in depth-first order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_ids(&self) -> Vec<String> {
        self.iter()
            .filter(|(idx, node)| !self.is_root(*idx) && node.is_leaf())
            .map(|(_, node)| node.data.id.clone())
            .collect()
    }
}

/// Pre-order, left-to-right traversal starting at the synthetic root.
pub struct TreeIterator<'a> {
    tree: &'a CriterionTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a CriterionTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root()],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

/// Post-order traversal: every child is yielded before its parent, the synthetic
/// root last.
pub struct PostOrderIterator<'a> {
    tree: &'a CriterionTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a CriterionTree) -> Self {
        Self {
            tree,
            stack: vec![(tree.root(), false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
