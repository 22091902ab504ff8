//! Domain layer: criteria model, scoring and chart geometry
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod aggregate;
pub mod arena;
pub mod builder;
pub mod chart;
pub mod display;
pub mod entities;
pub mod error;
pub mod layout;
pub mod maturity;
pub mod order;
pub mod zoom;

pub use aggregate::{recompute, ScoreAggregator};
pub use arena::{CriterionTree, NodeData, TreeNode};
pub use builder::{Hierarchy, HierarchyBuilder};
pub use chart::{Chart, ChartSettings, Frame, FrameArc, Tooltip};
pub use display::TreeNodeConvert;
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use layout::{ArcGeometry, Fill, RadialLayout, RadialLayoutEngine, Rgb};
pub use order::compare_ids;
pub use zoom::{Transition, View, ZoomController};
