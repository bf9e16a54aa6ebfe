//! Topograph - force-directed layout and rendering for network topologies.
//!
//! A topology of devices and links is laid out by a small physics
//! simulation, drawn as edge lines, icon sprites and labels, and exported as
//! a standalone SVG. The [`render::Viewer`] keeps the drawing in sync with
//! the simulation frame by frame and lets a host drag nodes around.

pub mod builtin;
pub mod config;
pub mod export;
pub mod icons;
pub mod render;
pub mod simulation;
pub mod topology;

mod error;

pub use topograph_core::{color, draw, geometry, identifier};

pub use error::TopographError;

use std::path::Path;

use log::{debug, info, trace};

use config::AppConfig;
use icons::IconSource;
use render::Viewer;
use topology::Topology;

/// Builder for parsing, laying out and rendering topologies.
///
/// # Examples
///
/// ```rust
/// use topograph::{TopographBuilder, config::AppConfig, icons::InlineIcons};
///
/// let source = r#"
///     [[node]]
///     id = "A"
///     title = "Router"
///     icon = "assets/icons/router.png"
///
///     [[node]]
///     id = "B"
///     title = "Internet"
///     icon = "assets/icons/internet.png"
///
///     [[edge]]
///     source = "A"
///     target = "B"
///     style = "dashed"
/// "#;
///
/// let builder = TopographBuilder::new(AppConfig::default());
/// let topology = builder.parse(source).expect("Failed to parse");
///
/// let icons = InlineIcons::from_topology(&topology);
/// let svg = builder.render_svg(topology, &icons).expect("Failed to render");
/// assert!(svg.contains("stroke-dasharray"));
/// ```
#[derive(Debug, Default)]
pub struct TopographBuilder {
    config: AppConfig,
}

impl TopographBuilder {
    /// Create a new builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a TOML topology.
    ///
    /// # Errors
    ///
    /// Returns `TopographError::Topology` for malformed TOML, duplicate ids,
    /// dangling edges and self-loops.
    pub fn parse(&self, source: &str) -> Result<Topology, TopographError> {
        info!("Parsing topology");

        let topology = Topology::from_toml_str(source)?;

        debug!(
            nodes = topology.node_count(),
            edges = topology.edge_count();
            "Topology parsed successfully"
        );
        trace!(topology:?; "Parsed topology");

        Ok(topology)
    }

    /// Create an interactive viewer for `topology`.
    ///
    /// # Errors
    ///
    /// Returns `TopographError` for invalid configuration or missing icons
    /// under the fail policy.
    pub fn viewer(
        &self,
        topology: Topology,
        icons: &impl IconSource,
    ) -> Result<Viewer, TopographError> {
        Viewer::new(topology, icons, &self.config)
    }

    /// Settle the layout of `topology` and render it to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns `TopographError` for invalid configuration or missing icons
    /// under the fail policy.
    pub fn render_svg(
        &self,
        topology: Topology,
        icons: &impl IconSource,
    ) -> Result<String, TopographError> {
        let mut viewer = self.viewer(topology, icons)?;

        info!("Settling layout");
        let snapshot = viewer.settle()?;
        info!(ticks = snapshot.tick(), alpha = snapshot.alpha(); "Layout settled");

        let svg = viewer.to_svg()?;
        viewer.close();

        info!("SVG rendered successfully");
        Ok(svg)
    }

    /// Settle the layout of `topology` and write it to an SVG file.
    ///
    /// # Errors
    ///
    /// Returns `TopographError` for invalid configuration, missing icons
    /// under the fail policy and export failures.
    pub fn export_svg(
        &self,
        topology: Topology,
        icons: &impl IconSource,
        path: impl AsRef<Path>,
    ) -> Result<(), TopographError> {
        let mut viewer = self.viewer(topology, icons)?;

        info!("Settling layout");
        let snapshot = viewer.settle()?;
        info!(ticks = snapshot.tick(), alpha = snapshot.alpha(); "Layout settled");

        viewer.write_svg(path)?;
        viewer.close();
        Ok(())
    }
}
