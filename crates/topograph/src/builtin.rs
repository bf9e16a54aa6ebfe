//! The builtin office network.
//!
//! A small office LAN: a router between the internet and a server, and two
//! switches feeding desktops and laptops. Uplinks between network gear are
//! solid; device connections are dashed. Titles are kept in Russian as the
//! network was first drawn.

use crate::topology::{Edge, LinkStyle, Node, Topology, TopologyError};

const NODES: &[(&str, &str, &str)] = &[
    ("A", "Роутер", "assets/icons/router.png"),
    ("B", "Интернет", "assets/icons/internet.png"),
    ("C", "Сервер", "assets/icons/server.png"),
    ("D1", "ПК", "assets/icons/desktop.png"),
    ("D2", "ПК", "assets/icons/desktop.png"),
    ("D3", "ПК", "assets/icons/desktop.png"),
    ("E1", "Ноутбук", "assets/icons/laptop.jpg"),
    ("E2", "Ноутбук", "assets/icons/laptop.jpg"),
    ("E3", "Ноутбук", "assets/icons/laptop.jpg"),
    ("G1", "Switch", "assets/icons/switch.png"),
    ("G2", "Switch", "assets/icons/switch.png"),
];

const EDGES: &[(&str, &str, LinkStyle)] = &[
    ("A", "B", LinkStyle::Dashed),
    ("A", "C", LinkStyle::Dashed),
    ("A", "G1", LinkStyle::Solid),
    ("G1", "G2", LinkStyle::Solid),
    ("G1", "D1", LinkStyle::Dashed),
    ("G1", "D2", LinkStyle::Dashed),
    ("G1", "D3", LinkStyle::Dashed),
    ("G2", "E1", LinkStyle::Dashed),
    ("G2", "E2", LinkStyle::Dashed),
    ("G2", "E3", LinkStyle::Dashed),
];

/// Builds the 11-node, 10-edge office network with inline icon references.
///
/// # Errors
///
/// Never fails in practice; the result is a [`Result`] because every
/// topology goes through the same validation.
pub fn office_network() -> Result<Topology, TopologyError> {
    let nodes = NODES
        .iter()
        .map(|(id, title, icon)| Node::new(id, *title).with_icon(*icon))
        .collect();
    let edges = EDGES
        .iter()
        .map(|(source, target, style)| Edge::new(source, target, *style))
        .collect();

    Topology::new(nodes, edges)
}
