//! Chart configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields the stock letter-frequency chart.

use std::path::{Path, PathBuf};

use barflow_protocol::{Color, Theme, Viewport};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::Margin;
use crate::transition::Ease;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Timing and colours of the enter / update / exit cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    /// Delay between ticks, re-armed after each tick fires.
    pub period_ms: u64,
    /// Length of the shared enter/exit transition.
    pub duration_ms: u64,
    /// Entering bars start this many pixels above their resting position.
    pub enter_offset: f64,
    /// Exiting bars sink by `exit_drop_factor * inner_height`.
    pub exit_drop_factor: f64,
    pub enter_from: Color,
    pub enter_to: Color,
    pub update_fill: Color,
    pub exit_from: Color,
    pub exit_to: Color,
    pub ease: Ease,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            period_ms: 10_500,
            duration_ms: 2_000,
            enter_offset: 200.0,
            exit_drop_factor: 1.5,
            enter_from: Color::WHITE,
            enter_to: Color::GREEN,
            update_fill: Color::BLACK,
            exit_from: Color::RED,
            exit_to: Color::WHITE,
            ease: Ease::CubicInOut,
        }
    }
}

/// What a click on a bar does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub duration_ms: u64,
    /// Corner radius of the square the bar collapses into; its side is twice this.
    pub radius: f64,
    /// Data value whose pixel row the square moves to.
    pub target_value: f64,
    pub stroke: Color,
    pub stroke_width: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            duration_ms: 900,
            radius: 10.0,
            target_value: 0.13,
            stroke: Color::PINK,
            stroke_width: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub container: Viewport,
    pub margin: Margin,
    /// Band padding as a fraction of the band step.
    pub band_padding: f64,
    /// Round the value domain outward to tick boundaries.
    pub nice: bool,
    pub tick_count: usize,
    /// Fill of the bars drawn before the first tick.
    pub base_fill: Color,
    pub theme: Theme,
    pub cycle: CycleConfig,
    pub interaction: InteractionConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            container: Viewport::default(),
            margin: Margin::default(),
            band_padding: 0.1,
            nice: true,
            tick_count: 10,
            base_fill: Color::BLACK,
            theme: Theme::Light,
            cycle: CycleConfig::default(),
            interaction: InteractionConfig::default(),
        }
    }
}

impl ChartConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: ChartConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));
        if self.cycle.period_ms == 0 {
            return invalid("cycle.period_ms must be positive");
        }
        if self.cycle.duration_ms == 0 || self.interaction.duration_ms == 0 {
            return invalid("transition durations must be positive");
        }
        if !(0.0..=1.0).contains(&self.band_padding) {
            return invalid("band_padding must be within [0, 1]");
        }
        let m = &self.margin;
        if [m.top, m.right, m.bottom, m.left]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return invalid("margins must be finite and non-negative");
        }
        if !(self.container.width > 0.0 && self.container.height > 0.0) {
            return invalid("container must have a positive size");
        }
        if self.tick_count == 0 {
            return invalid("tick_count must be positive");
        }
        Ok(())
    }
}
