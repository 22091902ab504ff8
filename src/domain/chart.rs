//! Interaction surface consumed by renderers: activation, focus, geometry, tooltips.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::aggregate::ScoreAggregator;
use crate::domain::arena::CriterionTree;
use crate::domain::builder::HierarchyBuilder;
use crate::domain::entities::CriterionRow;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::layout::{ArcGeometry, Fill, RadialLayout, RadialLayoutEngine};
use crate::domain::zoom::{label_visible, View, ZoomController, DEFAULT_TRANSITION};

/// Label shown in the center while the synthetic root is in focus.
pub const ROOT_LABEL: &str = "Overall";

/// Chart dimensions and interaction tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSettings {
    /// Outer radius in pixels
    pub radius: f64,
    /// Radius the focused node's inner edge maps to when zoomed in
    pub center_inset: f64,
    /// Minimum arc length (pixels at mean radius) for a label to be shown
    pub label_min_px: f64,
    pub transition: Duration,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            radius: 300.0,
            center_inset: 20.0,
            label_min_px: 10.0,
            transition: DEFAULT_TRANSITION,
        }
    }
}

/// Tooltip payload for one criterion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub name: String,
    pub id: String,
    pub score: Option<f64>,
    pub weight: f64,
    pub parent_name: Option<String>,
}

/// One projected segment of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameArc {
    pub id: String,
    pub name: String,
    pub depth: usize,
    pub geometry: ArcGeometry,
    pub fill: Fill,
    /// Inside the visible annulus with non-zero extent
    pub visible: bool,
    pub label_visible: bool,
}

/// Everything a renderer needs to draw one animation frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub view: View,
    pub animating: bool,
    /// Id of the focused criterion, empty for the synthetic root
    pub focus_id: String,
    pub center_label: String,
    pub center_score: Option<f64>,
    pub arcs: Vec<FrameArc>,
}

/// Scored tree, its layout and the zoom state.
///
/// The chart is rebuilt from rows after every edit; focus survives a rebuild when
/// the focused id still exists.
#[derive(Debug)]
pub struct Chart {
    tree: CriterionTree,
    layout: RadialLayout,
    zoom: ZoomController,
    settings: ChartSettings,
}

// Ancestors of the focus collapse into the center inset and are not drawn.
fn in_view(view: &View, geometry: &ArcGeometry) -> bool {
    const TOLERANCE: f64 = 1e-9;
    geometry.angular_width() > TOLERANCE
        && geometry.radius_outer - geometry.radius_inner > TOLERANCE
        && geometry.radius_inner >= view.inset - TOLERANCE
}

impl Chart {
    #[instrument(level = "debug", skip_all, fields(rows = rows.len()))]
    pub fn new(rows: &[CriterionRow], settings: ChartSettings) -> Self {
        let (tree, layout) = Self::derive(rows, &settings);
        let zoom = ZoomController::new(
            tree.root(),
            settings.radius,
            settings.center_inset,
            settings.transition,
        );
        Self {
            tree,
            layout,
            zoom,
            settings,
        }
    }

    fn derive(rows: &[CriterionRow], settings: &ChartSettings) -> (CriterionTree, RadialLayout) {
        let mut tree = HierarchyBuilder::new().build(rows).tree;
        ScoreAggregator.aggregate_tree(&mut tree);
        let layout = RadialLayoutEngine::new(settings.radius).layout(&tree);
        (tree, layout)
    }

    /// Replace the tree with one derived from `rows`, keeping the focus if its id
    /// still exists. A kept focus that became a leaf falls back to its parent, as
    /// `activate` would. The view snaps instead of animating.
    pub fn rebuild(&mut self, rows: &[CriterionRow]) {
        let focus_id = self.current_focus().to_string();
        let (tree, layout) = Self::derive(rows, &self.settings);
        self.tree = tree;
        self.layout = layout;
        self.zoom = ZoomController::new(
            self.tree.root(),
            self.settings.radius,
            self.settings.center_inset,
            self.settings.transition,
        );
        let kept = self.tree.find(&focus_id).and_then(|idx| {
            let node = self.tree.get_node(idx)?;
            if node.is_leaf() {
                node.parent
            } else {
                Some(idx)
            }
        });
        if let Some(idx) = kept {
            self.zoom.snap_to(&self.tree, &self.layout, idx);
        }
        debug!("rebuilt chart, focus {:?}", self.current_focus());
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    pub fn tree(&self) -> &CriterionTree {
        &self.tree
    }

    pub fn layout(&self) -> &RadialLayout {
        &self.layout
    }

    /// Rolled-up score over all top-level criteria.
    pub fn overall_score(&self) -> Option<f64> {
        self.tree
            .get_node(self.tree.root())
            .and_then(|n| n.data.score)
    }

    /// Activate the criterion `id`. Returns the id in focus afterwards.
    pub fn activate(&mut self, id: &str, now: Instant) -> DomainResult<&str> {
        let idx = self
            .tree
            .find(id)
            .ok_or_else(|| DomainError::UnknownId(id.to_string()))?;
        self.zoom.activate(&self.tree, &self.layout, idx, now);
        Ok(self.current_focus())
    }

    /// Click on the center indicator.
    pub fn activate_center(&mut self, now: Instant) -> &str {
        self.zoom.activate_center(&self.tree, &self.layout, now);
        self.current_focus()
    }

    /// Id in focus, empty for the synthetic root.
    pub fn current_focus(&self) -> &str {
        self.tree
            .get_node(self.zoom.focus())
            .map(|n| n.data.id.as_str())
            .unwrap_or("")
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.zoom.is_animating(now)
    }

    pub fn zoom(&self) -> &ZoomController {
        &self.zoom
    }

    /// Geometry at rest (synthetic root in focus).
    pub fn layout_of(&self, id: &str) -> Option<ArcGeometry> {
        self.tree.find(id).and_then(|idx| self.layout.geometry(idx))
    }

    pub fn tooltip_data_for(&self, id: &str) -> Option<Tooltip> {
        let idx = self.tree.find(id).filter(|&i| !self.tree.is_root(i))?;
        let node = self.tree.get_node(idx)?;
        let parent_name = node
            .parent
            .filter(|&p| !self.tree.is_root(p))
            .and_then(|p| self.tree.get_node(p))
            .map(|p| p.data.name.clone());
        Some(Tooltip {
            name: node.data.name.clone(),
            id: node.data.id.clone(),
            score: node.data.score,
            weight: node.data.weight,
            parent_name,
        })
    }

    /// Sample the view at `now` and project every criterion through it.
    pub fn frame(&mut self, now: Instant) -> Frame {
        let animating = self.zoom.is_animating(now);
        let view = self.zoom.tick(now);
        let focus = self.zoom.focus();

        let arcs = self
            .tree
            .iter()
            .filter(|(idx, _)| !self.tree.is_root(*idx))
            .filter_map(|(idx, node)| {
                let layout = self.layout.get(idx)?;
                let geometry = view.project(&layout.partition);
                let visible = in_view(&view, &geometry);
                Some(FrameArc {
                    id: node.data.id.clone(),
                    name: node.data.name.clone(),
                    depth: layout.depth,
                    geometry,
                    fill: layout.fill,
                    visible,
                    label_visible: visible
                        && label_visible(&geometry, self.settings.label_min_px),
                })
            })
            .collect();

        let (center_label, center_score) = match self.tree.get_node(focus) {
            Some(node) if !self.tree.is_root(focus) => (node.data.name.clone(), node.data.score),
            _ => (ROOT_LABEL.to_string(), self.overall_score()),
        };

        Frame {
            view,
            animating,
            focus_id: self.current_focus().to_string(),
            center_label,
            center_score,
            arcs,
        }
    }
}
