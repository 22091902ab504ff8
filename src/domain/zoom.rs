//! Zoom state machine: focus changes drive animated view transitions.
//!
//! A [`View`] maps normalized partition coordinates to pixels. Focusing a node
//! stretches its angular span to the full circle and its radial band from a small
//! center inset out to the chart radius. Moving between views is a [`Transition`]
//! sampled per frame; a new activation replaces the running transition, starting
//! from wherever the old one currently is.

use std::f64::consts::TAU;
use std::time::{Duration, Instant};

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::CriterionTree;
use crate::domain::layout::{ArcGeometry, Partition, RadialLayout};

const EPSILON: f64 = 1e-12;

/// Default transition length.
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(750);

/// Angular and radial domains currently mapped onto the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    /// Angular domain start, radians
    pub x0: f64,
    /// Angular domain end, radians
    pub x1: f64,
    /// Radial domain start, normalized
    pub y0: f64,
    /// Radial domain end, normalized
    pub y1: f64,
    /// Pixel radius the radial domain start maps to
    pub inset: f64,
    /// Pixel radius the radial domain end maps to
    pub radius: f64,
}

impl View {
    /// The whole tree, synthetic root in focus.
    pub fn rest(radius: f64) -> Self {
        Self {
            x0: 0.0,
            x1: TAU,
            y0: 0.0,
            y1: 1.0,
            inset: 0.0,
            radius,
        }
    }

    /// View with `partition` in focus. The synthetic root needs no inset.
    pub fn focused(partition: &Partition, is_root: bool, inset: f64, radius: f64) -> Self {
        Self {
            x0: partition.x0,
            x1: partition.x1,
            y0: partition.y0,
            y1: 1.0,
            inset: if is_root { 0.0 } else { inset },
            radius,
        }
    }

    /// Project a normalized angle into `[0, 2π]`.
    pub fn angle(&self, x: f64) -> f64 {
        let span = self.x1 - self.x0;
        if span.abs() <= EPSILON {
            return if x > self.x0 { TAU } else { 0.0 };
        }
        ((x - self.x0) / span * TAU).clamp(0.0, TAU)
    }

    /// Project a normalized radial position through the square-root scale.
    pub fn radius_at(&self, y: f64) -> f64 {
        let s0 = self.y0.max(0.0).sqrt();
        let s1 = self.y1.max(0.0).sqrt();
        let span = s1 - s0;
        if span.abs() <= EPSILON {
            return if y > self.y0 { self.radius } else { self.inset };
        }
        let t = (y.max(0.0).sqrt() - s0) / span;
        (self.inset + (self.radius - self.inset) * t).max(0.0)
    }

    pub fn project(&self, partition: &Partition) -> ArcGeometry {
        ArcGeometry {
            angle_start: self.angle(partition.x0),
            angle_end: self.angle(partition.x1),
            radius_inner: self.radius_at(partition.y0),
            radius_outer: self.radius_at(partition.y1),
        }
    }

    pub fn lerp(&self, other: &View, t: f64) -> View {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        View {
            x0: mix(self.x0, other.x0),
            x1: mix(self.x1, other.x1),
            y0: mix(self.y0, other.y0),
            y1: mix(self.y1, other.y1),
            inset: mix(self.inset, other.inset),
            radius: mix(self.radius, other.radius),
        }
    }
}

/// Cubic in-out easing on `[0, 1]`.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// True when the arc has room for a label at its mean radius.
pub fn label_visible(geometry: &ArcGeometry, min_px: f64) -> bool {
    geometry.label_room() > min_px
}

/// One running animation between two views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: View,
    pub to: View,
    pub started_at: Instant,
    pub duration: Duration,
}

impl Transition {
    pub fn new(from: View, to: View, started_at: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started_at,
            duration,
        }
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn sample(&self, now: Instant) -> View {
        self.from.lerp(&self.to, ease_cubic_in_out(self.progress(now)))
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Focus state machine for one laid-out tree.
#[derive(Debug, Clone)]
pub struct ZoomController {
    focus: Index,
    target: View,
    transition: Option<Transition>,
    inset: f64,
    radius: f64,
    duration: Duration,
}

impl ZoomController {
    /// Start with the synthetic root `root` in focus and no animation.
    pub fn new(root: Index, radius: f64, inset: f64, duration: Duration) -> Self {
        Self {
            focus: root,
            target: View::rest(radius),
            transition: None,
            inset,
            radius,
            duration,
        }
    }

    pub fn focus(&self) -> Index {
        self.focus
    }

    /// View the running transition is heading to, or the settled view.
    pub fn target(&self) -> View {
        self.target
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.transition.is_some_and(|t| !t.is_finished(now))
    }

    /// Current view without advancing state.
    pub fn view_at(&self, now: Instant) -> View {
        match &self.transition {
            Some(transition) => transition.sample(now),
            None => self.target,
        }
    }

    /// Sample the view for a frame and drop the transition once it has finished.
    pub fn tick(&mut self, now: Instant) -> View {
        let view = self.view_at(now);
        if self.transition.is_some_and(|t| t.is_finished(now)) {
            self.transition = None;
        }
        view
    }

    /// Activate `node`: internal nodes zoom in, leaves back out to their parent.
    ///
    /// Returns the focus after the activation.
    #[instrument(level = "debug", skip(self, tree, layout))]
    pub fn activate(
        &mut self,
        tree: &CriterionTree,
        layout: &RadialLayout,
        node: Index,
        now: Instant,
    ) -> Index {
        let next = match tree.get_node(node) {
            Some(n) if !n.is_leaf() => node,
            Some(n) => n.parent.unwrap_or_else(|| tree.root()),
            None => return self.focus,
        };
        self.focus_on(tree, layout, next, now)
    }

    /// Click on the center indicator: walk one level up, staying at the root.
    #[instrument(level = "debug", skip(self, tree, layout))]
    pub fn activate_center(
        &mut self,
        tree: &CriterionTree,
        layout: &RadialLayout,
        now: Instant,
    ) -> Index {
        let next = tree.parent_of(self.focus).unwrap_or_else(|| tree.root());
        self.focus_on(tree, layout, next, now)
    }

    /// Jump to `node` without animating, e.g. after the tree was rebuilt.
    pub fn snap_to(&mut self, tree: &CriterionTree, layout: &RadialLayout, node: Index) {
        if let Some(node_layout) = layout.get(node) {
            self.focus = node;
            self.target = View::focused(
                &node_layout.partition,
                tree.is_root(node),
                self.inset,
                self.radius,
            );
            self.transition = None;
        }
    }

    fn focus_on(
        &mut self,
        tree: &CriterionTree,
        layout: &RadialLayout,
        next: Index,
        now: Instant,
    ) -> Index {
        if next == self.focus {
            return self.focus;
        }
        let Some(node_layout) = layout.get(next) else {
            return self.focus;
        };
        let to = View::focused(
            &node_layout.partition,
            tree.is_root(next),
            self.inset,
            self.radius,
        );
        let from = self.view_at(now);
        if self.is_animating(now) {
            debug!("retargeting running transition");
        }
        self.transition = Some(Transition::new(from, to, now, self.duration));
        self.target = to;
        self.focus = next;
        next
    }
}
