//! Weighted post-order rollup of leaf scores into ancestor scores.

use std::collections::HashMap;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::CriterionTree;
use crate::domain::builder::HierarchyBuilder;
use crate::domain::entities::CriterionRow;
use crate::domain::order::compare_ids;

/// Recomputes internal scores from leaf scores.
///
/// A child counts toward its parent only when its own (recomputed) score is present
/// and finite; unscored children are left out of both the weighted sum and the
/// weight total. A parent without any counted weight scores 0.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScoreAggregator;

impl ScoreAggregator {
    /// Roll scores up through `tree` in place. Returns the synthetic root's score.
    #[instrument(level = "debug", skip_all)]
    pub fn aggregate_tree(&self, tree: &mut CriterionTree) -> Option<f64> {
        tree.sort_children();

        let order: Vec<Index> = tree.iter_postorder().map(|(idx, _)| idx).collect();
        let mut scores: HashMap<Index, Option<f64>> = HashMap::with_capacity(order.len());

        for idx in order {
            let Some(node) = tree.get_node(idx) else {
                continue;
            };
            let score = if node.is_leaf() {
                node.data.score.filter(|s| s.is_finite())
            } else {
                let counted = node.children.iter().filter_map(|&child| {
                    let score = scores.get(&child).copied().flatten()?;
                    let weight = tree.get_node(child).map(|c| c.data.weight)?;
                    Some((score, sanitize_weight(weight)))
                });
                Some(weighted_mean(counted))
            };
            scores.insert(idx, score);
            if let Some(node) = tree.get_node_mut(idx) {
                node.data.score = score;
            }
        }

        let root = tree.root();
        tree.get_node(root).and_then(|n| n.data.score)
    }

    /// Link `rows`, roll up every internal score and write it back to its row.
    ///
    /// Returns the rows sorted by natural id order.
    #[instrument(level = "debug", skip_all, fields(rows = rows.len()))]
    pub fn aggregate(&self, mut rows: Vec<CriterionRow>) -> Vec<CriterionRow> {
        let mut hierarchy = HierarchyBuilder::new().build(&rows);
        let overall = self.aggregate_tree(&mut hierarchy.tree);
        debug!("overall score: {:?}", overall);

        for (_, node) in hierarchy.tree.iter() {
            if node.is_leaf() {
                continue;
            }
            if let Some(row) = node.data.row.and_then(|pos| rows.get_mut(pos)) {
                row.score = node.data.score;
            }
        }

        rows.sort_by(|a, b| compare_ids(&a.id, &b.id));
        rows
    }
}

/// Rebuild the hierarchy from scratch and recompute every derived score.
pub fn recompute(rows: Vec<CriterionRow>) -> Vec<CriterionRow> {
    ScoreAggregator.aggregate(rows)
}

/// Weighted mean of `(score, weight)` pairs; 0 when the weights sum to zero or less.
pub fn weighted_mean(pairs: impl IntoIterator<Item = (f64, f64)>) -> f64 {
    let (sum, total) = pairs
        .into_iter()
        .fold((0.0, 0.0), |(sum, total), (score, weight)| {
            (sum + score * weight, total + weight)
        });
    if total > 0.0 {
        sum / total
    } else {
        0.0
    }
}

fn sanitize_weight(weight: f64) -> f64 {
    if weight.is_finite() {
        weight
    } else {
        0.0
    }
}
