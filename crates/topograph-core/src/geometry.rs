//! Geometric primitives for graph layout and rendering.
//!
//! This module provides the small set of geometric types the layout engine
//! and the scene renderer share.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in canvas space, also used as a vector for
//!   velocities and displacements
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Topograph uses a coordinate system consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner of the canvas at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward

/// A 2D point representing a position in canvas coordinate space.
///
/// Points use `f32` coordinates and provide the vector math the force
/// simulation needs. The same type doubles as a velocity.
///
/// # Examples
///
/// ```
/// # use topograph_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// assert_eq!(Point::new(3.0, 4.0).hypot(), 5.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Checks that neither coordinate is NaN or infinite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Squared length of the point taken as a vector.
    pub fn length_sq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Euclidean distance to another point.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topograph_core::geometry::Point;
    /// let a = Point::new(960.0, 540.0);
    /// let b = Point::new(1060.0, 540.0);
    /// assert_eq!(a.distance(b), 100.0);
    /// ```
    pub fn distance(self, other: Point) -> f32 {
        other.sub_point(self).hypot()
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Converts a point and size into a bounds rectangle
    ///
    /// The point is treated as the center of the bounds.
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_center(self, size)
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the point at the center of a rectangle of this size anchored at the origin
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Whether the point lies inside the bounds, edges included.
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topograph_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 30.0));
    /// let b = Bounds::new_from_top_left(Point::new(10.0, 40.0), Size::new(120.0, 80.0));
    ///
    /// let combined = a.merge(&b);
    /// assert_eq!(combined.min_y(), 0.0);
    /// assert_eq!(combined.max_x(), 130.0);
    /// assert_eq!(combined.max_y(), 120.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}
