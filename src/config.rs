//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/sunburst/sunburst.toml`
//! 3. Local config: `<project_dir>/.sunburst.toml`
//! 4. Environment variables: `SUNBURST_*` prefix, `__` between sections

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::ChartSettings;

/// Chart geometry and animation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    /// Outer radius in pixels
    pub radius: f64,
    /// Radius of the center circle while zoomed in
    pub center_inset: f64,
    /// Minimum arc length (angular width times mean radius) for a label
    pub label_min_px: f64,
    /// Zoom transition duration in milliseconds
    pub transition_ms: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        let defaults = ChartSettings::default();
        Self {
            radius: defaults.radius,
            center_inset: defaults.center_inset,
            label_min_px: defaults.label_min_px,
            transition_ms: defaults.transition.as_millis() as u64,
        }
    }
}

/// Raw chart config for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawChartConfig {
    pub radius: Option<f64>,
    pub center_inset: Option<f64>,
    pub label_min_px: Option<f64>,
    pub transition_ms: Option<u64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub default_file: Option<PathBuf>,
    pub chart: RawChartConfig,
}

impl ChartConfig {
    fn merge(&self, overlay: &RawChartConfig) -> Self {
        Self {
            radius: overlay.radius.unwrap_or(self.radius),
            center_inset: overlay.center_inset.unwrap_or(self.center_inset),
            label_min_px: overlay.label_min_px.unwrap_or(self.label_min_px),
            transition_ms: overlay.transition_ms.unwrap_or(self.transition_ms),
        }
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ApplicationError::Config {
                message: format!("chart.radius must be positive, got {}", self.radius),
            });
        }
        if !(self.center_inset >= 0.0 && self.center_inset < self.radius) {
            return Err(ApplicationError::Config {
                message: format!(
                    "chart.center_inset must lie in [0, radius), got {}",
                    self.center_inset
                ),
            });
        }
        if !(self.label_min_px.is_finite() && self.label_min_px >= 0.0) {
            return Err(ApplicationError::Config {
                message: format!(
                    "chart.label_min_px must not be negative, got {}",
                    self.label_min_px
                ),
            });
        }
        Ok(())
    }
}

/// Unified configuration for sunburst.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    /// Snapshot used when a command is given no file
    pub default_file: Option<PathBuf>,
    /// Chart geometry and animation
    pub chart: ChartConfig,
}

/// Get the XDG config directory for sunburst.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sunburst").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("sunburst.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".sunburst.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(e) => {
            debug!("leaving {} unexpanded: {}", raw, e);
            path.to_path_buf()
        }
    }
}

impl Settings {
    /// Expand `~`, `$VAR` and `${VAR}` in path fields.
    fn expand_paths(&mut self) {
        self.default_file = self.default_file.take().map(|path| expand_path(&path));
    }

    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            default_file: overlay
                .default_file
                .clone()
                .or_else(|| self.default_file.clone()),
            chart: self.chart.merge(&overlay.chart),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), project_dir)
    }

    /// Load settings from an explicit global config path.
    pub fn load_from(
        global_path: Option<&Path>,
        project_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_path.filter(|p| p.exists()) {
            debug!("global config: {}", global_path.display());
            current = current.merge_with(&load_raw_settings(global_path)?);
        }

        if let Some(project) = project_dir {
            let local_path = local_config_path(project);
            if local_path.exists() {
                debug!("local config: {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.chart.validate()?;

        Ok(current)
    }

    /// Apply SUNBURST_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("SUNBURST")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("default_file") {
            settings.default_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_float("chart.radius") {
            settings.chart.radius = val;
        }
        if let Ok(val) = config.get_float("chart.center_inset") {
            settings.chart.center_inset = val;
        }
        if let Ok(val) = config.get_float("chart.label_min_px") {
            settings.chart.label_min_px = val;
        }
        if let Ok(val) = config.get::<u64>("chart.transition_ms") {
            settings.chart.transition_ms = val;
        }

        Ok(settings)
    }

    /// Chart settings handed to the domain layer.
    pub fn chart_settings(&self) -> ChartSettings {
        ChartSettings {
            radius: self.chart.radius,
            center_inset: self.chart.center_inset,
            label_min_px: self.chart.label_min_px,
            transition: Duration::from_millis(self.chart.transition_ms),
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# sunburst configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/sunburst/sunburst.toml
#   Local:  <project_dir>/.sunburst.toml
#   Env:    SUNBURST_* environment variables, e.g. SUNBURST_CHART__RADIUS=400

# Snapshot used when a command is given no file
# default_file = "~/assessments/current.json"

[chart]
# Outer radius in pixels
# radius = 300.0

# Radius of the center circle while zoomed in
# center_inset = 20.0

# Minimum arc length in pixels before a label is drawn
# label_min_px = 10.0

# Zoom transition duration in milliseconds
# transition_ms = 750
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
