use generational_arena::Index;
use termtree::Tree;

use crate::domain::arena::CriterionTree;
use crate::domain::chart::ROOT_LABEL;
use crate::domain::entities::format_percent;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

fn label(tree: &CriterionTree, idx: Index) -> String {
    let Some(node) = tree.get_node(idx) else {
        return String::new();
    };
    let score = node
        .data
        .score
        .map(format_percent)
        .unwrap_or_else(|| "-".to_string());
    if tree.is_root(idx) {
        return format!("{} [{}]", ROOT_LABEL, score);
    }
    format!(
        "{} {} ({}) [{}]",
        node.data.id,
        node.data.name,
        format_percent(node.data.weight),
        score
    )
}

impl TreeNodeConvert for CriterionTree {
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(tree: &CriterionTree, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = tree.get_node(node_idx) {
                for &child_idx in &node.children {
                    let mut child_tree = Tree::new(label(tree, child_idx));
                    build_tree(tree, child_idx, &mut child_tree);
                    parent_tree.push(child_tree);
                }
            }
        }

        let mut root = Tree::new(label(self, self.root()));
        build_tree(self, self.root(), &mut root);
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregate::ScoreAggregator;
    use crate::domain::builder::HierarchyBuilder;
    use crate::domain::entities::CriterionRow;

    #[test]
    fn test_tree_string_shows_weights_and_scores() {
        let rows = vec![
            CriterionRow::new("1", "Quality", 1.0),
            CriterionRow::new("1.1", "Tests", 1.0).with_score(0.5),
        ];
        let mut tree = HierarchyBuilder::new().build(&rows).tree;
        ScoreAggregator.aggregate_tree(&mut tree);

        let rendered = tree.to_tree_string().to_string();
        assert!(rendered.starts_with("Overall [50%]"));
        assert!(rendered.contains("1.1 Tests (100%) [50%]"));
    }
}
