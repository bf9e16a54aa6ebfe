//! Topology model: the static node and edge lists fed to the layout engine.
//!
//! A [`Topology`] is validated when it is built. Every edge endpoint is
//! resolved from its raw id to a node index up front, so the simulation and
//! the renderer never see a dangling reference.

use std::str::FromStr;

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

use topograph_core::{geometry::Point, identifier::Id};

/// Errors raised while building or parsing a topology.
#[derive(Debug, Error, PartialEq)]
pub enum TopologyError {
    #[error("node #{index} has an empty id")]
    EmptyId { index: usize },

    #[error("duplicate node id `{0}`")]
    DuplicateNode(Id),

    #[error("edge #{edge} references unknown node `{id}`")]
    UnknownNode { edge: usize, id: Id },

    #[error("edge #{edge} connects node `{id}` to itself")]
    SelfLoop { edge: usize, id: Id },

    #[error("invalid topology file: {0}")]
    Parse(String),
}

/// Line style of an edge.
///
/// Edges without an explicit style are drawn solid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    Dashed,
    #[default]
    Solid,
}

impl FromStr for LinkStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dashed" => Ok(Self::Dashed),
            "solid" => Ok(Self::Solid),
            _ => Err(format!(
                "invalid link style `{s}`, valid values: dashed, solid"
            )),
        }
    }
}

/// A device in the topology.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    title: String,
    icon: Option<String>,
    position: Option<Point>,
}

impl Node {
    /// Creates a node without an inline icon or starting position.
    pub fn new(id: &str, title: impl Into<String>) -> Self {
        Self {
            id: Id::new(id),
            title: title.into(),
            icon: None,
            position: None,
        }
    }

    /// Sets the inline icon reference (builder style).
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Seeds the starting position used by the simulation (builder style).
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// Display label drawn next to the icon.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Inline icon reference, if the node carries one.
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }
}

/// A link between two devices, as authored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    source: Id,
    target: Id,
    style: LinkStyle,
}

impl Edge {
    pub fn new(source: &str, target: &str, style: LinkStyle) -> Self {
        Self {
            source: Id::new(source),
            target: Id::new(target),
            style,
        }
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn style(&self) -> LinkStyle {
        self.style
    }
}

/// An edge together with the indices of its resolved endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub style: LinkStyle,
}

/// A validated set of nodes and edges.
///
/// Node order is preserved; it is also the order of the simulation bodies and
/// of every position snapshot.
///
/// # Examples
///
/// ```
/// use topograph::topology::{Edge, LinkStyle, Node, Topology, TopologyError};
///
/// let topology = Topology::new(
///     vec![Node::new("A", "Router"), Node::new("B", "Internet")],
///     vec![Edge::new("A", "B", LinkStyle::Dashed)],
/// )
/// .unwrap();
/// assert_eq!(topology.node_count(), 2);
///
/// let broken = Topology::new(
///     vec![Node::new("A", "Router")],
///     vec![Edge::new("A", "Z", LinkStyle::Solid)],
/// );
/// assert!(matches!(broken, Err(TopologyError::UnknownNode { .. })));
/// ```
#[derive(Debug, Clone)]
pub struct Topology {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    links: Vec<Link>,
    index: IndexMap<Id, usize>,
}

impl Topology {
    /// Validates the node and edge lists and resolves every edge endpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] for empty or duplicate node ids, edges
    /// referencing unknown nodes, and self-loops.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, TopologyError> {
        let mut index = IndexMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if node.id.is_empty() {
                return Err(TopologyError::EmptyId { index: i });
            }
            if index.insert(node.id, i).is_some() {
                return Err(TopologyError::DuplicateNode(node.id));
            }
        }

        let links = edges
            .iter()
            .enumerate()
            .map(|(i, edge)| {
                let resolve = |id: Id| {
                    index
                        .get(&id)
                        .copied()
                        .ok_or(TopologyError::UnknownNode { edge: i, id })
                };
                let source = resolve(edge.source)?;
                let target = resolve(edge.target)?;
                if source == target {
                    return Err(TopologyError::SelfLoop {
                        edge: i,
                        id: edge.source,
                    });
                }
                Ok(Link {
                    source,
                    target,
                    style: edge.style,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(nodes = nodes.len(), edges = edges.len(); "Topology validated");

        Ok(Self {
            nodes,
            edges,
            links,
            index,
        })
    }

    /// Parses a topology from TOML.
    ///
    /// ```toml
    /// [[node]]
    /// id = "A"
    /// title = "Router"
    /// icon = "assets/icons/router.png"
    ///
    /// [[node]]
    /// id = "B"
    /// title = "Internet"
    ///
    /// [[edge]]
    /// source = "A"
    /// target = "B"
    /// style = "dashed"
    /// ```
    ///
    /// A missing `title` falls back to the id; a missing `style` means solid.
    /// `x` and `y` seed the starting position only when both are present.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Parse`] for malformed TOML, and any
    /// validation error from [`Topology::new`].
    pub fn from_toml_str(source: &str) -> Result<Self, TopologyError> {
        let file: TopologyFile =
            toml::from_str(source).map_err(|err| TopologyError::Parse(err.to_string()))?;

        let nodes = file
            .nodes
            .into_iter()
            .map(|record| {
                let title = record.title.unwrap_or_else(|| record.id.clone());
                let mut node = Node::new(&record.id, title);
                node.icon = record.icon;
                node.position = record.x.zip(record.y).map(|(x, y)| Point::new(x, y));
                node
            })
            .collect();

        let edges = file
            .edges
            .into_iter()
            .map(|record| Edge::new(&record.source, &record.target, record.style))
            .collect();

        Self::new(nodes, edges)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges with resolved endpoint indices, in authoring order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Index of the node with the given id.
    pub fn index_of(&self, id: Id) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    /// Number of links touching each node, indexed like [`Topology::nodes`].
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.nodes.len()];
        for link in &self.links {
            degrees[link.source] += 1;
            degrees[link.target] += 1;
        }
        degrees
    }
}

#[derive(Debug, Deserialize)]
struct TopologyFile {
    #[serde(default, rename = "node")]
    nodes: Vec<NodeRecord>,
    #[serde(default, rename = "edge")]
    edges: Vec<EdgeRecord>,
}

#[derive(Debug, Deserialize)]
struct NodeRecord {
    id: String,
    title: Option<String>,
    icon: Option<String>,
    x: Option<f32>,
    y: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    source: String,
    target: String,
    #[serde(default)]
    style: LinkStyle,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_nodes() -> Vec<Node> {
        vec![Node::new("A", "Router"), Node::new("B", "Internet")]
    }

    #[test]
    fn test_resolves_links() {
        let topology = Topology::new(
            vec![
                Node::new("A", "Router"),
                Node::new("G1", "Switch"),
                Node::new("D1", "PC"),
            ],
            vec![
                Edge::new("A", "G1", LinkStyle::Solid),
                Edge::new("G1", "D1", LinkStyle::Dashed),
            ],
        )
        .unwrap();

        assert_eq!(
            topology.links(),
            &[
                Link {
                    source: 0,
                    target: 1,
                    style: LinkStyle::Solid
                },
                Link {
                    source: 1,
                    target: 2,
                    style: LinkStyle::Dashed
                },
            ]
        );
        assert_eq!(topology.degrees(), vec![1, 2, 1]);
        assert_eq!(topology.index_of(Id::new("D1")), Some(2));
        assert_eq!(topology.node(Id::new("G1")).unwrap().title(), "Switch");
        assert!(topology.node(Id::new("missing")).is_none());
    }

    #[test]
    fn test_unknown_node_fails_fast() {
        let result = Topology::new(two_nodes(), vec![Edge::new("A", "C", LinkStyle::Solid)]);
        assert_eq!(
            result.unwrap_err(),
            TopologyError::UnknownNode {
                edge: 0,
                id: Id::new("C")
            }
        );
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let nodes = vec![Node::new("A", "Router"), Node::new("A", "Other")];
        let result = Topology::new(nodes, Vec::new());
        assert_eq!(result.unwrap_err(), TopologyError::DuplicateNode(Id::new("A")));
    }

    #[test]
    fn test_self_loop_rejected() {
        let result = Topology::new(two_nodes(), vec![Edge::new("B", "B", LinkStyle::Dashed)]);
        assert!(matches!(result, Err(TopologyError::SelfLoop { edge: 0, .. })));
    }

    #[test]
    fn test_empty_id_rejected() {
        let result = Topology::new(vec![Node::new("", "Nameless")], Vec::new());
        assert_eq!(result.unwrap_err(), TopologyError::EmptyId { index: 0 });
    }

    #[test]
    fn test_from_toml_str() {
        let source = r#"
            [[node]]
            id = "A"
            title = "Router"
            icon = "assets/icons/router.png"

            [[node]]
            id = "B"
            x = 10.0
            y = 20.0

            [[edge]]
            source = "A"
            target = "B"
            style = "dashed"

            [[edge]]
            source = "B"
            target = "A"
        "#;

        let topology = Topology::from_toml_str(source).unwrap();
        assert_eq!(topology.node_count(), 2);
        assert_eq!(topology.edge_count(), 2);

        let a = &topology.nodes()[0];
        assert_eq!(a.icon(), Some("assets/icons/router.png"));
        assert_eq!(a.position(), None);

        let b = &topology.nodes()[1];
        assert_eq!(b.title(), "B");
        assert_eq!(b.icon(), None);
        assert_eq!(b.position(), Some(Point::new(10.0, 20.0)));

        assert_eq!(topology.edges()[0].style(), LinkStyle::Dashed);
        assert_eq!(topology.edges()[1].style(), LinkStyle::Solid);
    }

    #[test]
    fn test_from_toml_str_rejects_bad_style() {
        let source = r#"
            [[node]]
            id = "A"

            [[node]]
            id = "B"

            [[edge]]
            source = "A"
            target = "B"
            style = "wavy"
        "#;

        assert!(matches!(
            Topology::from_toml_str(source),
            Err(TopologyError::Parse(_))
        ));
    }

    #[test]
    fn test_link_style_from_str() {
        assert_eq!("dashed".parse::<LinkStyle>().unwrap(), LinkStyle::Dashed);
        assert_eq!("solid".parse::<LinkStyle>().unwrap(), LinkStyle::Solid);
        assert!("dotted".parse::<LinkStyle>().is_err());
    }
}
