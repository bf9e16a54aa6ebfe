//! Color handling for topology scenes
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Stroke, label and background colors all go through it
//! so that configuration strings are validated once, up front.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a CSS color string such as "#999", "rgb(255, 0, 0)" or "red".
    ///
    /// # Examples
    ///
    /// ```
    /// use topograph_core::color::Color;
    ///
    /// let edge = Color::new("#999").unwrap();
    /// let label = Color::new("#333").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Creates a new color with the specified alpha value.
    ///
    /// # Examples
    ///
    /// ```
    /// use topograph_core::color::Color;
    ///
    /// let faded = Color::new("#999").unwrap().with_alpha(0.6);
    /// assert!((faded.alpha() - 0.6).abs() < 0.001);
    /// ```
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha component of this color, between 0.0 and 1.0.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}
