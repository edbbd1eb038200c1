//! Render configuration.
//!
//! Tunables for decimation, sampling, hit-testing and auto-ranging, loadable
//! from YAML. Every field has a default so partial files are accepted.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunables consumed by bin derivation, path synthesis and hit-testing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Enable decimation of large series.
    #[serde(default = "default_optimize_draw")]
    pub optimize_draw: bool,

    /// Maximum retained points for line and area rendering.
    #[serde(default = "default_line_point_limit")]
    pub line_point_limit: usize,

    /// Maximum retained points for marker rendering.
    #[serde(default = "default_marker_point_limit")]
    pub marker_point_limit: usize,

    /// Lower bound on the number of samples taken from a function.
    #[serde(default = "default_min_function_samples")]
    pub min_function_samples: usize,

    /// Pixels added to the line width when sizing error caps.
    #[serde(default = "default_end_error_size")]
    pub end_error_size: f64,

    /// Squared pixel distance above which a line series falls back to segment search.
    #[serde(default = "default_path_snap_distance_sq")]
    pub path_snap_distance_sq: f64,

    /// Marker size (px) for spline knots.
    #[serde(default = "default_knot_size")]
    pub knot_size: f64,

    /// Fractional padding applied to graph dummy frames.
    #[serde(default = "default_frame_padding")]
    pub frame_padding: f64,

    /// Fractional padding applied to multi-graph frames.
    #[serde(default = "default_multigraph_padding")]
    pub multigraph_padding: f64,

    /// Headroom factor applied to function and spline y ranges.
    #[serde(default = "default_function_headroom")]
    pub function_headroom: f64,

    /// Minimum pause before a repeating time replay restarts, in milliseconds.
    #[serde(default = "default_min_repeat_sleep_ms")]
    pub min_repeat_sleep_ms: u64,

    /// Significant digits used when formatting tooltip numbers.
    #[serde(default = "default_stat_digits")]
    pub stat_digits: usize,
}

fn default_optimize_draw() -> bool {
    true
}
fn default_line_point_limit() -> usize {
    5000
}
fn default_marker_point_limit() -> usize {
    50_000
}
fn default_min_function_samples() -> usize {
    101
}
fn default_end_error_size() -> f64 {
    2.0
}
fn default_path_snap_distance_sq() -> f64 {
    100.0
}
fn default_knot_size() -> f64 {
    5.0
}
fn default_frame_padding() -> f64 {
    0.1
}
fn default_multigraph_padding() -> f64 {
    0.05
}
fn default_function_headroom() -> f64 {
    1.05
}
fn default_min_repeat_sleep_ms() -> u64 {
    5000
}
fn default_stat_digits() -> usize {
    4
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            optimize_draw: default_optimize_draw(),
            line_point_limit: default_line_point_limit(),
            marker_point_limit: default_marker_point_limit(),
            min_function_samples: default_min_function_samples(),
            end_error_size: default_end_error_size(),
            path_snap_distance_sq: default_path_snap_distance_sq(),
            knot_size: default_knot_size(),
            frame_padding: default_frame_padding(),
            multigraph_padding: default_multigraph_padding(),
            function_headroom: default_function_headroom(),
            min_repeat_sleep_ms: default_min_repeat_sleep_ms(),
            stat_digits: default_stat_digits(),
        }
    }
}

impl RenderConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            Error::Config(format!("line {line}: {e}"))
        })
    }

    /// Loads configuration, falling back to defaults on any failure.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                log::debug!("using default render config: {e}");
                Self::default()
            }
        }
    }

    /// Minimum repeat pause as a [`Duration`].
    #[must_use]
    pub fn min_repeat_sleep(&self) -> Duration {
        Duration::from_millis(self.min_repeat_sleep_ms)
    }
}
