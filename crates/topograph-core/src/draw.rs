//! Drawing primitives shared by scene renderers.
//!
//! Scene elements implement [`Drawable`] and emit SVG nodes into one or more
//! [`RenderLayer`]s. The layers are ordered when the final document is
//! assembled, so elements never need to be pushed in z-order.

mod layer;
mod stroke;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use stroke::{StrokeDefinition, StrokeStyle};

/// Trait for scene elements that can be rendered to SVG layers.
pub trait Drawable: std::fmt::Debug {
    /// Renders this element at its current position.
    ///
    /// Implementations add their SVG nodes to the appropriate layers of the
    /// returned [`LayeredOutput`].
    fn render_to_layers(&self) -> LayeredOutput;
}
