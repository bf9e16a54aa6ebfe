//! Configuration types for topology layout and rendering.
//!
//! All types implement [`serde::Deserialize`] with per-section defaults, so a
//! TOML file only needs to name the values it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Force strengths and the cooling schedule of the simulation.
//! - [`CanvasConfig`] - Viewport size and layout center.
//! - [`StyleConfig`] - Stroke, icon and label styling, and the missing-icon policy.
//!
//! # Example
//!
//! ```
//! # use topograph::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [layout]
//!     charge_strength = -150.0
//!
//!     [canvas]
//!     width = 800
//!     height = 600
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.layout().charge_strength(), -150.0);
//! assert_eq!(config.layout().link_distance(), 100.0);
//! assert_eq!(config.center().x(), 400.0);
//! assert!(config.validate().is_ok());
//! ```

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use topograph_core::{
    color::Color,
    geometry::{Point, Size},
};

/// Configuration loading and validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    canvas: CanvasConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(layout: LayoutConfig, canvas: CanvasConfig, style: StyleConfig) -> Self {
        Self {
            layout,
            canvas,
            style,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Point the centering force pulls toward.
    ///
    /// An explicit `layout.center` wins; otherwise the middle of the canvas.
    pub fn center(&self) -> Point {
        self.layout
            .center()
            .unwrap_or_else(|| self.canvas.size().center())
    }

    /// Checks every section for values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        self.canvas.validate()?;
        self.style.validate()
    }
}

/// Force and cooling parameters of the layout simulation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Many-body strength; negative values repel.
    charge_strength: f32,
    /// Target length of every link.
    link_distance: f32,
    /// Explicit centering point; defaults to the canvas center.
    center: Option<[f32; 2]>,
    /// Starting temperature.
    alpha: f32,
    /// Temperature below which the run is considered settled.
    alpha_min: f32,
    /// Per-tick decay toward the target temperature; derived from `alpha_min` when unset.
    alpha_decay: Option<f32>,
    /// Temperature the run decays toward.
    alpha_target: f32,
    /// Fraction of velocity lost per tick.
    velocity_decay: f32,
    /// Target temperature held while at least one node is being dragged.
    drag_alpha_target: f32,
    /// Upper bound on ticks when settling without a host frame loop.
    max_ticks: usize,
    /// Seed for the jitter applied to coincident nodes.
    seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            charge_strength: -300.0,
            link_distance: 100.0,
            center: None,
            alpha: 1.0,
            alpha_min: 0.001,
            alpha_decay: None,
            alpha_target: 0.0,
            velocity_decay: 0.4,
            drag_alpha_target: 0.3,
            max_ticks: 10_000,
            seed: 0x70_70,
        }
    }
}

impl LayoutConfig {
    pub fn charge_strength(&self) -> f32 {
        self.charge_strength
    }

    pub fn link_distance(&self) -> f32 {
        self.link_distance
    }

    pub fn center(&self) -> Option<Point> {
        self.center.map(|[x, y]| Point::new(x, y))
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_min(&self) -> f32 {
        self.alpha_min
    }

    /// Decay per tick. Defaults to `1 - alpha_min^(1/300)`, which cools from
    /// 1.0 to `alpha_min` in about 300 ticks.
    pub fn alpha_decay(&self) -> f32 {
        self.alpha_decay
            .unwrap_or_else(|| 1.0 - self.alpha_min.powf(1.0 / 300.0))
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn velocity_decay(&self) -> f32 {
        self.velocity_decay
    }

    pub fn drag_alpha_target(&self) -> f32 {
        self.drag_alpha_target
    }

    pub fn max_ticks(&self) -> usize {
        self.max_ticks
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Set the many-body strength
    pub fn with_charge_strength(mut self, strength: f32) -> Self {
        self.charge_strength = strength;
        self
    }

    /// Set the target link length
    pub fn with_link_distance(mut self, distance: f32) -> Self {
        self.link_distance = distance;
        self
    }

    /// Set an explicit centering point
    pub fn with_center(mut self, center: Point) -> Self {
        self.center = Some([center.x(), center.y()]);
        self
    }

    /// Set the tick cap for headless settling
    pub fn with_max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Set the jitter seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.charge_strength.is_finite() {
            return Err(ConfigError::invalid("layout.charge_strength", "must be finite"));
        }
        if self.center().is_some_and(|center| !center.is_finite()) {
            return Err(ConfigError::invalid("layout.center", "must be finite"));
        }
        if !(self.link_distance.is_finite() && self.link_distance >= 0.0) {
            return Err(ConfigError::invalid(
                "layout.link_distance",
                "must be a non-negative number",
            ));
        }
        if !(self.alpha_min > 0.0 && self.alpha_min <= 1.0) {
            return Err(ConfigError::invalid("layout.alpha_min", "must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ConfigError::invalid("layout.alpha", "must be in [0, 1]"));
        }
        let decay = self.alpha_decay();
        if !(decay > 0.0 && decay <= 1.0) {
            return Err(ConfigError::invalid("layout.alpha_decay", "must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.alpha_target) {
            return Err(ConfigError::invalid("layout.alpha_target", "must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.drag_alpha_target) {
            return Err(ConfigError::invalid(
                "layout.drag_alpha_target",
                "must be in [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.velocity_decay) {
            return Err(ConfigError::invalid("layout.velocity_decay", "must be in [0, 1]"));
        }
        if self.max_ticks == 0 {
            return Err(ConfigError::invalid("layout.max_ticks", "must be positive"));
        }
        Ok(())
    }
}

/// Viewport of the rendered scene.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    width: f32,
    height: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

impl CanvasConfig {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::invalid(
                "canvas",
                format!("size must be positive, got {}x{}", self.width, self.height),
            ));
        }
        Ok(())
    }
}

/// What to draw for a node whose icon cannot be resolved.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingIconPolicy {
    /// Draw a placeholder sprite and keep going.
    #[default]
    Placeholder,
    /// Refuse to build the scene.
    Fail,
}

/// Visual styling of edges, icons and labels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: Option<String>,
    edge_color: String,
    edge_opacity: f32,
    dashed_width: f32,
    solid_width: f32,
    icon_size: f32,
    label_font_size: f32,
    label_color: String,
    label_offset: [f32; 2],
    missing_icon: MissingIconPolicy,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            edge_color: "#999".to_string(),
            edge_opacity: 0.6,
            dashed_width: 2.0,
            solid_width: 4.0,
            icon_size: 40.0,
            label_font_size: 12.0,
            label_color: "#333".to_string(),
            label_offset: [20.0, 5.0],
            missing_icon: MissingIconPolicy::Placeholder,
        }
    }
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Edge stroke color with the configured opacity applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn edge_color(&self) -> Result<Color, String> {
        Color::new(&self.edge_color)
            .map(|color| color.with_alpha(self.edge_opacity))
            .map_err(|err| format!("Invalid edge color in config: {err}"))
    }

    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn label_color(&self) -> Result<Color, String> {
        Color::new(&self.label_color).map_err(|err| format!("Invalid label color in config: {err}"))
    }

    pub fn dashed_width(&self) -> f32 {
        self.dashed_width
    }

    pub fn solid_width(&self) -> f32 {
        self.solid_width
    }

    /// Side length of the square icon sprites.
    pub fn icon_size(&self) -> f32 {
        self.icon_size
    }

    pub fn label_font_size(&self) -> f32 {
        self.label_font_size
    }

    /// Offset of a label's anchor from its node position.
    pub fn label_offset(&self) -> Point {
        Point::new(self.label_offset[0], self.label_offset[1])
    }

    pub fn missing_icon(&self) -> MissingIconPolicy {
        self.missing_icon
    }

    /// Sets the missing-icon policy (builder style).
    pub fn with_missing_icon(mut self, policy: MissingIconPolicy) -> Self {
        self.missing_icon = policy;
        self
    }

    /// Sets the background color string (builder style).
    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.background_color()
            .map_err(|err| ConfigError::invalid("style.background_color", err))?;
        self.edge_color()
            .map_err(|err| ConfigError::invalid("style.edge_color", err))?;
        self.label_color()
            .map_err(|err| ConfigError::invalid("style.label_color", err))?;
        if !(0.0..=1.0).contains(&self.edge_opacity) {
            return Err(ConfigError::invalid("style.edge_opacity", "must be in [0, 1]"));
        }
        if !(self.icon_size > 0.0) {
            return Err(ConfigError::invalid("style.icon_size", "must be positive"));
        }
        if !(self.dashed_width > 0.0 && self.solid_width > 0.0) {
            return Err(ConfigError::invalid("style", "stroke widths must be positive"));
        }
        Ok(())
    }
}
