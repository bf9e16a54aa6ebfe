//! Layer-based rendering for SVG output.
//!
//! Scene elements say which layer their nodes belong to; [`LayeredOutput`]
//! collects them and emits one `<g>` group per non-empty layer, bottom to
//! top. Edges therefore always sit under icons, and labels on top of both.
//!
//! # Example
//!
//! ```
//! # use topograph_core::draw::{RenderLayer, LayeredOutput};
//! # use svg::node::element::{Line, Text};
//! let mut output = LayeredOutput::new();
//! output.add_to_layer(RenderLayer::Labels, Box::new(Text::new("Router")));
//! output.add_to_layer(RenderLayer::Edges, Box::new(Line::new()));
//!
//! let groups = output.render();
//! assert_eq!(groups.len(), 2);
//! ```

use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Rendering layers, bottom to top in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Canvas background fill
    Background,
    /// Edge lines between nodes
    Edges,
    /// Node icon sprites and placeholders
    Icons,
    /// Text labels next to nodes
    Labels,
}

impl RenderLayer {
    /// Returns the name used for the `class` and `data-layer` attributes of the group.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Edges => "links",
            Self::Icons => "nodes",
            Self::Labels => "texts",
        }
    }
}

/// SVG nodes grouped by rendering layer.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    /// Creates a new empty `LayeredOutput`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single node to the specified layer.
    ///
    /// Nodes keep their insertion order within a layer.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Merges all layers from another `LayeredOutput` into this one.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    /// Returns `true` if there are no nodes in any layer.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of nodes in the given layer.
    pub fn layer_len(&self, layer: RenderLayer) -> usize {
        self.items.iter().filter(|(l, _)| *l == layer).count()
    }

    /// Renders all layers to SVG groups, consuming the output.
    ///
    /// Each non-empty layer becomes a `<g>` element tagged with the layer
    /// name. Empty layers are skipped.
    pub fn render(mut self) -> Vec<SvgNode> {
        if self.is_empty() {
            return Vec::new();
        }

        // Stable sort keeps insertion order inside each layer
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result = Vec::new();
        let mut current_layer = self.items[0].0;
        let mut current_group = layer_group(current_layer);

        for (layer, node) in self.items {
            if layer != current_layer {
                result.push(Box::new(current_group) as SvgNode);
                current_layer = layer;
                current_group = layer_group(layer);
            }

            current_group = current_group.add(node);
        }

        result.push(Box::new(current_group) as SvgNode);

        result
    }
}

fn layer_group(layer: RenderLayer) -> svg_element::Group {
    svg_element::Group::new()
        .set("class", layer.name())
        .set("data-layer", layer.name())
}
