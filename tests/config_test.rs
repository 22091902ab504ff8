//! Integration tests for layered Settings loading.
//!
//! These tests pass explicit temp paths for the global config and never set
//! SUNBURST_* variables, so they are independent of the developer's machine.

use std::fs;
use std::time::Duration;

use tempfile::TempDir;

use maturity_sunburst::config::{local_config_path, Settings};

#[test]
fn given_global_and_local_config_when_loading_then_local_wins_per_field() {
    // Arrange
    let global_dir = TempDir::new().unwrap();
    let global_path = global_dir.path().join("sunburst.toml");
    fs::write(
        &global_path,
        "[chart]\nradius = 400.0\nlabel_min_px = 4.0\n",
    )
    .unwrap();
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "[chart]\nradius = 500.0\n",
    )
    .unwrap();

    // Act
    let settings = Settings::load_from(Some(&global_path), Some(project.path())).unwrap();

    // Assert
    assert_eq!(settings.chart.radius, 500.0);
    assert_eq!(settings.chart.label_min_px, 4.0);
    assert_eq!(settings.chart.center_inset, 20.0);
    assert_eq!(settings.chart.transition_ms, 750);
}

#[test]
fn given_missing_files_when_loading_then_defaults_apply() {
    let project = TempDir::new().unwrap();
    let absent = project.path().join("absent.toml");

    let settings = Settings::load_from(Some(&absent), Some(project.path())).unwrap();

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_default_file_with_tilde_when_loading_then_path_is_expanded() {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "default_file = \"~/assessments/current.json\"\n",
    )
    .unwrap();

    let settings = Settings::load_from(None, Some(project.path())).unwrap();

    let path = settings.default_file.expect("default file");
    assert!(!path.to_string_lossy().starts_with('~'));
    assert!(path.ends_with("assessments/current.json"));
}

#[test]
fn given_malformed_toml_when_loading_then_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), "[chart\nradius = ").unwrap();

    let err = Settings::load_from(None, Some(project.path())).unwrap_err();

    assert!(err.to_string().contains("config error"));
}

#[test]
fn given_negative_radius_when_loading_then_rejected() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), "[chart]\nradius = -1.0\n").unwrap();

    assert!(Settings::load_from(None, Some(project.path())).is_err());
}

#[test]
fn given_settings_when_converting_then_chart_settings_match() {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "[chart]\ntransition_ms = 250\ncenter_inset = 0.0\n",
    )
    .unwrap();

    let chart = Settings::load_from(None, Some(project.path()))
        .unwrap()
        .chart_settings();

    assert_eq!(chart.transition, Duration::from_millis(250));
    assert_eq!(chart.center_inset, 0.0);
    assert_eq!(chart.radius, 300.0);
}

#[test]
fn given_effective_settings_when_rendered_as_toml_then_reparses() {
    let settings = Settings::default();

    let text = settings.to_toml().unwrap();

    let back: Settings = toml::from_str(&text).unwrap();
    assert_eq!(back, settings);
}
