//! Scene primitives kept in sync with the simulation.
//!
//! A [`Scene`] is built once per topology and holds one [`EdgeLine`] per
//! edge, and one [`IconSprite`] and [`Label`] per node. After that only
//! positions change, through [`Scene::apply`].

use log::{debug, warn};
use svg::node::element as svg_element;

use topograph_core::{
    apply_stroke,
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition},
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

use crate::{
    config::{ConfigError, MissingIconPolicy, StyleConfig},
    error::TopographError,
    icons::{IconError, IconRef, IconSource},
    simulation::Snapshot,
    topology::{LinkStyle, Topology},
};

/// A straight line between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLine {
    source: usize,
    target: usize,
    from: Point,
    to: Point,
    stroke: StrokeDefinition,
}

impl EdgeLine {
    /// Index of the source node.
    pub fn source(&self) -> usize {
        self.source
    }

    /// Index of the target node.
    pub fn target(&self) -> usize {
        self.target
    }

    pub fn from(&self) -> Point {
        self.from
    }

    pub fn to(&self) -> Point {
        self.to
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }
}

impl Drawable for EdgeLine {
    fn render_to_layers(&self) -> LayeredOutput {
        let line = svg_element::Line::new()
            .set("x1", self.from.x())
            .set("y1", self.from.y())
            .set("x2", self.to.x())
            .set("y2", self.to.y());
        let line = apply_stroke!(line, &self.stroke);

        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Edges, Box::new(line));
        output
    }
}

/// A fixed-size icon centered on its node.
///
/// Without an icon reference the sprite draws a placeholder box instead.
#[derive(Debug, Clone, PartialEq)]
pub struct IconSprite {
    id: Id,
    center: Point,
    size: Size,
    icon: Option<IconRef>,
}

impl IconSprite {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// The resolved icon, or `None` for a placeholder.
    pub fn icon(&self) -> Option<&IconRef> {
        self.icon.as_ref()
    }

    pub fn is_placeholder(&self) -> bool {
        self.icon.is_none()
    }

    pub fn bounds(&self) -> Bounds {
        self.center.to_bounds(self.size)
    }
}

impl Drawable for IconSprite {
    fn render_to_layers(&self) -> LayeredOutput {
        let bounds = self.bounds();
        let mut output = LayeredOutput::new();

        match &self.icon {
            Some(icon) => {
                let image = svg_element::Image::new()
                    .set("href", icon.href())
                    .set("x", bounds.min_x())
                    .set("y", bounds.min_y())
                    .set("width", self.size.width())
                    .set("height", self.size.height())
                    .set("data-node", self.id.to_string());
                output.add_to_layer(RenderLayer::Icons, Box::new(image));
            }
            None => {
                let rect = svg_element::Rectangle::new()
                    .set("class", "placeholder")
                    .set("x", bounds.min_x())
                    .set("y", bounds.min_y())
                    .set("width", self.size.width())
                    .set("height", self.size.height())
                    .set("fill", "#eee")
                    .set("stroke", "#999")
                    .set("data-node", self.id.to_string());
                output.add_to_layer(RenderLayer::Icons, Box::new(rect));
            }
        }

        output
    }
}

/// A node title drawn at a fixed offset from the node.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: String,
    anchor: Point,
    offset: Point,
    font_size: f32,
    color: Color,
}

impl Label {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Where the text starts: the node position plus the label offset.
    pub fn position(&self) -> Point {
        self.anchor.add_point(self.offset)
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl Drawable for Label {
    fn render_to_layers(&self) -> LayeredOutput {
        let position = self.position();
        let text = svg_element::Text::new(self.text.as_str())
            .set("x", position.x())
            .set("y", position.y())
            .set("font-size", self.font_size)
            .set("fill", &self.color);

        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Labels, Box::new(text));
        output
    }
}

/// All primitives of one topology.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    edges: Vec<EdgeLine>,
    icons: Vec<IconSprite>,
    labels: Vec<Label>,
}

impl Scene {
    /// Builds the primitives for `topology` at the positions in `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`IconError::Missing`] when a node has no icon and the style's
    /// missing-icon policy is [`MissingIconPolicy::Fail`], and a
    /// [`ConfigError`] for unparseable style colors.
    pub fn new(
        topology: &Topology,
        icons: &impl IconSource,
        style: &StyleConfig,
        snapshot: &Snapshot,
    ) -> Result<Self, TopographError> {
        let edge_color = style
            .edge_color()
            .map_err(|reason| ConfigError::invalid("style.edge_color", reason))?;
        let label_color = style
            .label_color()
            .map_err(|reason| ConfigError::invalid("style.label_color", reason))?;

        let position = |index: usize| snapshot.position(index).unwrap_or_default();

        let edges = topology
            .links()
            .iter()
            .map(|link| EdgeLine {
                source: link.source,
                target: link.target,
                from: position(link.source),
                to: position(link.target),
                stroke: edge_stroke(link.style, edge_color, style),
            })
            .collect();

        let icon_size = Size::new(style.icon_size(), style.icon_size());
        let mut sprites = Vec::with_capacity(topology.node_count());
        let mut labels = Vec::with_capacity(topology.node_count());

        for (i, node) in topology.nodes().iter().enumerate() {
            let icon = icons.resolve(node.id());
            if icon.is_none() {
                match style.missing_icon() {
                    MissingIconPolicy::Fail => return Err(IconError::Missing(node.id()).into()),
                    MissingIconPolicy::Placeholder => {
                        warn!(node:% = node.id(); "No icon for node, drawing placeholder");
                    }
                }
            }

            sprites.push(IconSprite {
                id: node.id(),
                center: position(i),
                size: icon_size,
                icon,
            });
            labels.push(Label {
                text: node.title().to_string(),
                anchor: position(i),
                offset: style.label_offset(),
                font_size: style.label_font_size(),
                color: label_color,
            });
        }

        debug!(
            edges = topology.links().len(),
            sprites = sprites.len();
            "Scene built"
        );

        Ok(Self {
            edges,
            icons: sprites,
            labels,
        })
    }

    /// Moves every primitive to the positions in `snapshot`.
    ///
    /// Edge endpoints are read from the same snapshot as the sprites, so they
    /// always meet their nodes.
    pub fn apply(&mut self, snapshot: &Snapshot) {
        for edge in &mut self.edges {
            if let Some(from) = snapshot.position(edge.source) {
                edge.from = from;
            }
            if let Some(to) = snapshot.position(edge.target) {
                edge.to = to;
            }
        }

        for (i, (sprite, label)) in self.icons.iter_mut().zip(&mut self.labels).enumerate() {
            if let Some(position) = snapshot.position(i) {
                sprite.center = position;
                label.anchor = position;
            }
        }
    }

    pub fn edges(&self) -> &[EdgeLine] {
        &self.edges
    }

    pub fn icons(&self) -> &[IconSprite] {
        &self.icons
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// The node whose sprite contains `point`.
    ///
    /// Sprites drawn later sit on top, so they are tested first.
    pub fn node_at(&self, point: Point) -> Option<Id> {
        self.icons
            .iter()
            .rev()
            .find(|sprite| sprite.bounds().contains(point))
            .map(IconSprite::id)
    }

    /// Smallest box containing every sprite, or `None` for an empty scene.
    pub fn bounds(&self) -> Option<Bounds> {
        self.icons
            .iter()
            .map(IconSprite::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}

impl Drawable for Scene {
    fn render_to_layers(&self) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        for edge in &self.edges {
            output.merge(edge.render_to_layers());
        }
        for sprite in &self.icons {
            output.merge(sprite.render_to_layers());
        }
        for label in &self.labels {
            output.merge(label.render_to_layers());
        }
        output
    }
}

/// Stroke for an edge, keyed only off its style.
fn edge_stroke(style: LinkStyle, color: Color, config: &StyleConfig) -> StrokeDefinition {
    match style {
        LinkStyle::Dashed => StrokeDefinition::dashed(color, config.dashed_width()),
        LinkStyle::Solid => StrokeDefinition::solid(color, config.solid_width()),
    }
}
