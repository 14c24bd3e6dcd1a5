//! Tunable constants for the metric families.
//!
//! Stored as a JSON object on disk; every key is optional:
//! ```json
//! {
//!   "goal": { "width": 24.0, "height": 8.0, "grid_x": 6, "grid_y": 2 },
//!   "percentile_ratio": { "upper": 0.9, "lower": 0.4 },
//!   "timeline": { "second_half_from": 46, "half_offset": 2.0 }
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub goal: GoalFrame,
    pub percentile_ratio: PercentileRatio,
    pub timeline: TimelineConfig,
}

/// Physical goal face and the range of the raw shot coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalFrame {
    pub width: f64,
    pub height: f64,
    /// Raw data units spanning `width`.
    pub input_width: f64,
    /// Raw data units spanning `height`.
    pub input_height: f64,
    pub grid_x: usize,
    pub grid_y: usize,
}

impl Default for GoalFrame {
    fn default() -> Self {
        Self {
            width: 24.0,
            height: 8.0,
            input_width: 2.1,
            input_height: 0.7,
            grid_x: 6,
            grid_y: 2,
        }
    }
}

/// Quantiles compared by the percentile ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PercentileRatio {
    pub upper: f64,
    pub lower: f64,
}

impl Default for PercentileRatio {
    fn default() -> Self {
        Self {
            upper: 0.9,
            lower: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// First minute drawn on the second-half side of the break.
    pub second_half_from: u32,
    pub half_offset: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            second_half_from: 46,
            half_offset: 2.0,
        }
    }
}

impl MetricsConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{path}'"))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config '{path}'"))?;
        Ok(config)
    }

    /// Loads from `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
