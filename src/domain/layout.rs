//! Radial partition layout: angular spans from weights, area-equalized rings, score colors.

use std::collections::HashMap;
use std::f64::consts::TAU;
use std::fmt;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::CriterionTree;

/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear blend from `self` (t = 0) to `other` (t = 1).
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub const RAMP_LOW: Rgb = Rgb::new(0xd7, 0x30, 0x27);
pub const RAMP_MID: Rgb = Rgb::new(0xfe, 0xe0, 0x8b);
pub const RAMP_HIGH: Rgb = Rgb::new(0x1a, 0x98, 0x50);
/// Neutral gray. The ramp's blue channel never exceeds 0x8b, so this is off the ramp.
pub const UNSCORED_FILL: Rgb = Rgb::new(0xcc, 0xcc, 0xcc);

/// Fill of a chart segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Point on the red-yellow-green ramp
    Ramp(Rgb),
    /// Not yet evaluated
    Unscored,
}

impl Fill {
    pub fn rgb(self) -> Rgb {
        match self {
            Fill::Ramp(rgb) => rgb,
            Fill::Unscored => UNSCORED_FILL,
        }
    }
}

/// Map a score through the diverging ramp; absent scores get the neutral fill.
pub fn score_fill(score: Option<f64>) -> Fill {
    match score.filter(|s| s.is_finite()) {
        Some(s) => Fill::Ramp(ramp(s)),
        None => Fill::Unscored,
    }
}

fn ramp(score: f64) -> Rgb {
    let t = score.clamp(0.0, 1.0);
    if t <= 0.5 {
        RAMP_LOW.lerp(RAMP_MID, t * 2.0)
    } else {
        RAMP_MID.lerp(RAMP_HIGH, (t - 0.5) * 2.0)
    }
}

/// Normalized partition cell: angles in radians, radial band in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partition {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

/// Pixel geometry of one ring segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    pub angle_start: f64,
    pub angle_end: f64,
    pub radius_inner: f64,
    pub radius_outer: f64,
}

impl ArcGeometry {
    pub fn angular_width(&self) -> f64 {
        self.angle_end - self.angle_start
    }

    pub fn mean_radius(&self) -> f64 {
        (self.radius_inner + self.radius_outer) / 2.0
    }

    /// Arc length at the mean radius, the space available for a label.
    pub fn label_room(&self) -> f64 {
        self.angular_width() * self.mean_radius()
    }

    pub fn mid_angle(&self) -> f64 {
        (self.angle_start + self.angle_end) / 2.0
    }
}

/// Layout attributes of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    /// Product of weights along the path from the synthetic root
    pub absolute_weight: f64,
    /// Own layout value: absolute weight for leaves, 0 otherwise
    pub value: f64,
    /// Sum of leaf values in the subtree
    pub subtree_value: f64,
    pub depth: usize,
    pub partition: Partition,
    pub fill: Fill,
}

/// Layout of a whole tree, keyed by node handle.
#[derive(Debug, Clone)]
pub struct RadialLayout {
    nodes: HashMap<Index, NodeLayout>,
    radius: f64,
    height: usize,
}

impl RadialLayout {
    pub fn get(&self, idx: Index) -> Option<&NodeLayout> {
        self.nodes.get(&idx)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Number of rings below the synthetic root.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Geometry at rest, i.e. with the synthetic root in focus.
    pub fn geometry(&self, idx: Index) -> Option<ArcGeometry> {
        self.get(idx).map(|node| {
            let p = node.partition;
            ArcGeometry {
                angle_start: p.x0,
                angle_end: p.x1,
                radius_inner: self.radius * p.y0.sqrt(),
                radius_outer: self.radius * p.y1.sqrt(),
            }
        })
    }
}

/// Computes the radial partition of a scored tree.
#[derive(Debug, Clone, Copy)]
pub struct RadialLayoutEngine {
    radius: f64,
}

impl RadialLayoutEngine {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    #[instrument(level = "debug", skip_all, fields(criteria = tree.len()))]
    pub fn layout(&self, tree: &CriterionTree) -> RadialLayout {
        let height = tree.height();
        let rings = (height + 1) as f64;
        let root = tree.root();

        // Top-down: absolute weights, depths and leaf values.
        let mut nodes: HashMap<Index, NodeLayout> = HashMap::with_capacity(tree.len() + 1);
        for (idx, node) in tree.iter() {
            let (absolute_weight, depth) = match node.parent.and_then(|p| nodes.get(&p)) {
                Some(parent) => (
                    parent.absolute_weight * sanitize_weight(node.data.weight),
                    parent.depth + 1,
                ),
                None => (1.0, 0),
            };
            let value = if node.is_leaf() && idx != root {
                absolute_weight
            } else {
                0.0
            };
            nodes.insert(
                idx,
                NodeLayout {
                    absolute_weight,
                    value,
                    subtree_value: value,
                    depth,
                    partition: Partition {
                        x0: 0.0,
                        x1: 0.0,
                        y0: depth as f64 / rings,
                        y1: (depth + 1) as f64 / rings,
                    },
                    fill: score_fill(node.data.score),
                },
            );
        }

        // Bottom-up: subtree sums.
        for (idx, node) in tree.iter_postorder() {
            let sum: f64 = node
                .children
                .iter()
                .filter_map(|c| nodes.get(c))
                .map(|c| c.subtree_value)
                .sum();
            if let Some(entry) = nodes.get_mut(&idx) {
                entry.subtree_value += sum;
            }
        }

        // Top-down again: split each span among the children.
        if let Some(entry) = nodes.get_mut(&root) {
            entry.partition.x0 = 0.0;
            entry.partition.x1 = TAU;
        }
        for (idx, node) in tree.iter() {
            let Some(parent) = nodes.get(&idx) else {
                continue;
            };
            let (x0, x1, total) = (parent.partition.x0, parent.partition.x1, parent.subtree_value);
            let span = x1 - x0;
            let mut cursor = x0;
            for child in &node.children {
                if let Some(entry) = nodes.get_mut(child) {
                    let width = if total > 0.0 {
                        entry.subtree_value / total * span
                    } else {
                        0.0
                    };
                    entry.partition.x0 = cursor;
                    entry.partition.x1 = (cursor + width).min(TAU);
                    cursor += width;
                }
            }
        }

        debug!("layout: {} nodes in {} rings", nodes.len(), height);
        RadialLayout {
            nodes,
            radius: self.radius,
            height,
        }
    }
}

fn sanitize_weight(weight: f64) -> f64 {
    if weight.is_finite() {
        weight
    } else {
        0.0
    }
}
