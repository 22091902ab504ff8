//! Tests for focus changes and view transitions

use std::time::{Duration, Instant};

use maturity_sunburst::application::sample_snapshot;
use maturity_sunburst::domain::zoom::ease_cubic_in_out;
use maturity_sunburst::domain::{Chart, ChartSettings, CriterionRow, View};

fn sample_chart() -> Chart {
    Chart::new(&sample_snapshot().data, ChartSettings::default())
}

const HALF: Duration = Duration::from_millis(375);
const SETTLED: Duration = Duration::from_millis(800);

#[test]
fn given_internal_node_when_activated_then_it_takes_focus() {
    let mut chart = sample_chart();
    let now = Instant::now();

    let focus = chart.activate("1.1", now).unwrap().to_string();

    assert_eq!(focus, "1.1");
    assert!(chart.is_animating(now + HALF));
    assert!(!chart.is_animating(now + SETTLED));
}

#[test]
fn given_leaf_when_activated_then_parent_takes_focus() {
    let mut chart = sample_chart();

    let focus = chart.activate("1.1.1", Instant::now()).unwrap();

    assert_eq!(focus, "1.1");
}

#[test]
fn given_top_level_leaf_when_activated_then_root_takes_focus() {
    // Arrange
    let rows = vec![
        CriterionRow::new("1", "A", 0.5),
        CriterionRow::new("1.1", "A1", 1.0),
        CriterionRow::new("2", "B", 0.5),
    ];
    let mut chart = Chart::new(&rows, ChartSettings::default());
    let now = Instant::now();
    chart.activate("1", now).unwrap();

    // Act
    let focus = chart.activate("2", now + SETTLED).unwrap();

    // Assert
    assert_eq!(focus, "");
}

#[test]
fn given_root_focus_when_center_clicked_then_nothing_happens() {
    let mut chart = sample_chart();
    let now = Instant::now();

    let focus = chart.activate_center(now).to_string();

    assert_eq!(focus, "");
    assert!(chart.zoom().transition().is_none());
    assert!(!chart.is_animating(now));
}

#[test]
fn given_zoomed_in_when_center_clicked_then_walks_up_one_level() {
    let mut chart = sample_chart();
    let now = Instant::now();
    chart.activate("1.1", now).unwrap();

    assert_eq!(chart.activate_center(now + SETTLED), "1");
    assert_eq!(chart.activate_center(now + SETTLED * 2), "");
}

#[test]
fn given_running_transition_when_activating_then_retargets_from_current_view() {
    // Arrange
    let mut chart = sample_chart();
    let start = Instant::now();
    chart.activate("1", start).unwrap();
    let mid = start + HALF;
    let sampled: View = chart.zoom().view_at(mid);

    // Act
    chart.activate("2", mid).unwrap();

    // Assert
    let transition = chart.zoom().transition().expect("transition");
    assert_eq!(transition.from, sampled);
    assert_eq!(transition.started_at, mid);
    assert_eq!(transition.to, chart.zoom().target());
    assert_eq!(chart.current_focus(), "2");
    assert_ne!(sampled, View::rest(300.0));
}

#[test]
fn given_settled_zoom_when_sampling_then_view_matches_focused_partition() {
    let mut chart = sample_chart();
    let now = Instant::now();
    chart.activate("2", now).unwrap();

    let view = chart.zoom().view_at(now + SETTLED);

    let idx = chart.tree().find("2").unwrap();
    let partition = chart.layout().get(idx).unwrap().partition;
    assert!((view.x0 - partition.x0).abs() < 1e-9);
    assert!((view.x1 - partition.x1).abs() < 1e-9);
    assert!((view.y0 - partition.y0).abs() < 1e-9);
    assert!((view.inset - 20.0).abs() < 1e-9);
}

#[test]
fn given_unknown_id_when_activating_then_errors_and_keeps_focus() {
    let mut chart = sample_chart();

    assert!(chart.activate("9.9", Instant::now()).is_err());
    assert_eq!(chart.current_focus(), "");
}

#[test]
fn given_easing_when_sampled_then_symmetric_and_clamped() {
    assert_eq!(ease_cubic_in_out(0.0), 0.0);
    assert_eq!(ease_cubic_in_out(1.0), 1.0);
    assert!((ease_cubic_in_out(0.25) + ease_cubic_in_out(0.75) - 1.0).abs() < 1e-12);
}
