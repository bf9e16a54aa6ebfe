//! Stroke definitions for edge lines.
//!
//! # Overview
//!
//! - [`StrokeDefinition`]: color, width and dash style of a line
//! - [`StrokeStyle`]: solid or dashed
//! - [`apply_stroke!`](crate::apply_stroke!): applies a stroke to any SVG element
//!
//! # SVG Attribute Mapping
//!
//! | Rust Property | SVG Attribute | Example Values |
//! |--------------|---------------|----------------|
//! | `color` | `stroke`, `stroke-opacity` | `"#999"`, `0.6` |
//! | `width` | `stroke-width` | `2.0`, `4.0` |
//! | `style` | `stroke-dasharray` | `"5,5"` |
//!
//! ```
//! use topograph_core::color::Color;
//! use topograph_core::draw::StrokeDefinition;
//! use svg::node::element as svg_element;
//!
//! let stroke = StrokeDefinition::dashed(Color::new("#999").unwrap(), 2.0);
//! let line = svg_element::Line::new().set("x1", 0).set("y1", 0);
//! let line = topograph_core::apply_stroke!(line, &stroke);
//! ```

use crate::color::Color;

/// Dash style of a stroke.
///
/// - `Solid`: no dasharray attribute
/// - `Dashed`: "5,5"
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeStyle {
    /// Solid continuous line (default)
    #[default]
    Solid,
    /// Equal 5px dashes and gaps
    Dashed,
}

impl StrokeStyle {
    /// Returns the SVG dasharray value for this style, or None for solid lines
    pub fn to_svg_value(self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("5,5"),
        }
    }
}

/// A stroke definition for rendering lines.
///
/// # Examples
///
/// ```
/// use topograph_core::color::Color;
/// use topograph_core::draw::{StrokeDefinition, StrokeStyle};
///
/// let solid = StrokeDefinition::solid(Color::new("#999").unwrap(), 4.0);
/// assert_eq!(solid.width(), 4.0);
/// assert_eq!(*solid.style(), StrokeStyle::Solid);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    /// Creates a solid stroke.
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    /// Creates a stroke dashed `5,5`.
    pub fn dashed(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Dashed,
        }
    }

    /// Returns the stroke color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the stroke width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the stroke style.
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }
}

/// Apply all stroke attributes to an SVG element.
///
/// Sets color, opacity and width, and the dash pattern when the style is not
/// solid.
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width());

        if let Some(dasharray) = $stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}
