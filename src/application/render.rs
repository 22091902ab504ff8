//! SVG rendering of one chart frame.

use std::f64::consts::{PI, TAU};

use itertools::Itertools;

use crate::domain::{format_percent, ArcGeometry, Frame, FrameArc};

const MARGIN: f64 = 10.0;
const FULL_CIRCLE_TOLERANCE: f64 = 1e-9;

/// Point on the circle of radius `r` at `angle`, measured clockwise from 12 o'clock.
fn polar(r: f64, angle: f64) -> (f64, f64) {
    (r * angle.sin(), -r * angle.cos())
}

fn sector_path(a0: f64, a1: f64, r0: f64, r1: f64) -> String {
    let large = if a1 - a0 > PI { 1 } else { 0 };
    let (x0, y0) = polar(r1, a0);
    let (x1, y1) = polar(r1, a1);
    if r0 <= 0.0 {
        return format!(
            "M0,0L{:.3},{:.3}A{:.3},{:.3} 0 {} 1 {:.3},{:.3}Z",
            x0, y0, r1, r1, large, x1, y1
        );
    }
    let (x2, y2) = polar(r0, a1);
    let (x3, y3) = polar(r0, a0);
    format!(
        "M{:.3},{:.3}A{:.3},{:.3} 0 {} 1 {:.3},{:.3}L{:.3},{:.3}A{:.3},{:.3} 0 {} 0 {:.3},{:.3}Z",
        x0, y0, r1, r1, large, x1, y1, x2, y2, r0, r0, large, x3, y3
    )
}

/// SVG path data for an annular sector. A full ring is drawn as two halves since a
/// single arc command cannot close on itself.
pub fn arc_path(geometry: &ArcGeometry) -> String {
    let (a0, a1) = (geometry.angle_start, geometry.angle_end);
    let (r0, r1) = (geometry.radius_inner, geometry.radius_outer);
    if a1 - a0 >= TAU - FULL_CIRCLE_TOLERANCE {
        let mid = a0 + (a1 - a0) / 2.0;
        return sector_path(a0, mid, r0, r1) + &sector_path(mid, a1, r0, r1);
    }
    sector_path(a0, a1, r0, r1)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_arc(arc: &FrameArc) -> String {
    format!(
        r##"<path data-id="{}" d="{}" fill="{}" stroke="#fff" stroke-width="1"><title>{} {}</title></path>"##,
        escape(&arc.id),
        arc_path(&arc.geometry),
        arc.fill.rgb(),
        escape(&arc.id),
        escape(&arc.name)
    )
}

fn render_label(arc: &FrameArc) -> String {
    let degrees = arc.geometry.mid_angle().to_degrees();
    let flip = if degrees < 180.0 { 0.0 } else { 180.0 };
    format!(
        r##"<text transform="rotate({:.3}) translate({:.3},0) rotate({})" dy="0.35em" text-anchor="middle" font-size="10" fill="#222">{}</text>"##,
        degrees - 90.0,
        arc.geometry.mean_radius(),
        flip,
        escape(&arc.name)
    )
}

/// Render `frame` as a standalone SVG document centered on the chart origin.
pub fn render_svg(frame: &Frame) -> String {
    let radius = frame.view.radius;
    let half = radius + MARGIN;
    let size = 2.0 * half;

    let arcs = frame
        .arcs
        .iter()
        .filter(|a| a.visible)
        .map(render_arc)
        .join("\n    ");
    let labels = frame
        .arcs
        .iter()
        .filter(|a| a.label_visible)
        .map(render_label)
        .join("\n    ");
    let score = frame
        .center_score
        .map(format_percent)
        .unwrap_or_else(|| "-".to_string());

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="{min} {min} {size} {size}" font-family="sans-serif">
  <g class="arcs">
    {arcs}
  </g>
  <g class="labels" pointer-events="none">
    {labels}
  </g>
  <g class="center" data-focus="{focus}">
    <text text-anchor="middle" dy="-0.2em" font-size="12" font-weight="600" fill="#222">{label}</text>
    <text text-anchor="middle" dy="1.1em" font-size="11" fill="#555">{score}</text>
  </g>
</svg>
"##,
        size = size,
        min = -half,
        arcs = arcs,
        labels = labels,
        focus = escape(&frame.focus_id),
        label = escape(&frame.center_label),
        score = score,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_ring_is_split_in_two_arcs() {
        let geometry = ArcGeometry {
            angle_start: 0.0,
            angle_end: TAU,
            radius_inner: 10.0,
            radius_outer: 20.0,
        };
        assert_eq!(arc_path(&geometry).matches('M').count(), 2);
    }

    #[test]
    fn test_wedge_from_center_has_no_inner_arc() {
        let geometry = ArcGeometry {
            angle_start: 0.0,
            angle_end: PI / 2.0,
            radius_inner: 0.0,
            radius_outer: 20.0,
        };
        let path = arc_path(&geometry);
        assert!(path.starts_with("M0,0L0.000,-20.000"));
        assert_eq!(path.matches('A').count(), 1);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }
}
