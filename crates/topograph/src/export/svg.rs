//! Standalone SVG export of a [`Scene`].

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use log::{debug, error, info};
use svg::{Document, node::element as svg_element};

use topograph_core::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer},
    geometry::Size,
};

use crate::{
    config::{AppConfig, ConfigError},
    export,
    render::Scene,
};

/// Renders scenes into fixed-size SVG documents.
///
/// # Examples
///
/// ```
/// # use topograph::export::svg::SvgExporter;
/// # use topograph::geometry::Size;
/// let exporter = SvgExporter::new(Size::new(800.0, 600.0));
/// assert_eq!(exporter.size(), Size::new(800.0, 600.0));
/// ```
#[derive(Debug, Clone)]
pub struct SvgExporter {
    size: Size,
    background: Option<Color>,
}

impl SvgExporter {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            background: None,
        }
    }

    /// Fills the canvas with `color` beneath everything else.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Canvas size and background from the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the background color cannot be parsed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let exporter = Self::new(config.canvas().size());
        let background = config
            .style()
            .background_color()
            .map_err(|reason| ConfigError::invalid("style.background_color", reason))?;

        Ok(match background {
            Some(color) => exporter.with_background(color),
            None => exporter,
        })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Builds the document: the viewport, an optional background and one
    /// group per layer.
    pub fn document(&self, scene: &Scene) -> Document {
        let mut output = LayeredOutput::new();

        if let Some(color) = &self.background {
            let background = svg_element::Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", self.size.width())
                .set("height", self.size.height())
                .set("fill", color);
            output.add_to_layer(RenderLayer::Background, Box::new(background));
        }
        output.merge(scene.render_to_layers());

        let document = Document::new()
            .set("width", self.size.width())
            .set("height", self.size.height())
            .set(
                "viewBox",
                format!("0 0 {} {}", self.size.width(), self.size.height()),
            );

        let document = output
            .render()
            .into_iter()
            .fold(document, |document, group| document.add(group));

        debug!(
            edges = scene.edges().len(),
            icons = scene.icons().len();
            "SVG document rendered"
        );
        document
    }

    /// Renders `scene` to an SVG string.
    pub fn to_string(&self, scene: &Scene) -> String {
        self.document(scene).to_string()
    }

    /// Renders `scene` and writes it to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Io`] if the file cannot be created or written.
    pub fn write(&self, scene: &Scene, path: impl AsRef<Path>) -> Result<(), export::Error> {
        let path = path.as_ref();
        let document = self.document(scene);

        info!(path:? = path; "Creating SVG file");
        let file = File::create(path).map_err(|err| {
            error!(path:? = path, err:err; "Failed to create SVG file");
            err
        })?;

        let mut writer = BufWriter::new(file);
        write!(writer, "{document}")
            .and_then(|()| writer.flush())
            .map_err(|err| {
                error!(path:? = path, err:err; "Failed to write SVG content");
                err
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use topograph_core::geometry::Point;

    use crate::{
        config::StyleConfig,
        icons::InlineIcons,
        simulation::Simulation,
        topology::{Edge, LinkStyle, Node, Topology},
    };

    use super::*;

    fn scene() -> Scene {
        let topology = Topology::new(
            vec![
                Node::new("A", "Router")
                    .with_icon("router.png")
                    .with_position(Point::new(900.0, 500.0)),
                Node::new("B", "Internet")
                    .with_icon("cloud.png")
                    .with_position(Point::new(1000.0, 500.0)),
            ],
            vec![Edge::new("A", "B", LinkStyle::Dashed)],
        )
        .unwrap();
        let simulation = Simulation::new(&topology, &Default::default());
        Scene::new(
            &topology,
            &InlineIcons::from_topology(&topology),
            &StyleConfig::default(),
            &simulation.snapshot(),
        )
        .unwrap()
    }

    #[test]
    fn test_document_layers_in_order() {
        let svg = SvgExporter::new(Size::new(1920.0, 1080.0)).to_string(&scene());

        assert!(svg.contains("width=\"1920\""));
        assert!(svg.contains("viewBox=\"0 0 1920 1080\""));

        let links = svg.find("data-layer=\"links\"").unwrap();
        let nodes = svg.find("data-layer=\"nodes\"").unwrap();
        let texts = svg.find("data-layer=\"texts\"").unwrap();
        assert!(links < nodes && nodes < texts);
        assert!(!svg.contains("data-layer=\"background\""));
    }

    #[test]
    fn test_background_from_config() {
        let config: AppConfig = toml::from_str("[style]\nbackground_color = \"white\"\n").unwrap();
        let svg = SvgExporter::from_config(&config)
            .unwrap()
            .to_string(&scene());

        let background = svg.find("data-layer=\"background\"").unwrap();
        assert!(background < svg.find("data-layer=\"links\"").unwrap());
    }

    #[test]
    fn test_bad_background_rejected() {
        let config: AppConfig = toml::from_str("[style]\nbackground_color = \"nope\"\n").unwrap();
        assert!(SvgExporter::from_config(&config).is_err());
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topology.svg");

        SvgExporter::new(Size::new(1920.0, 1080.0))
            .write(&scene(), &path)
            .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<svg"));
        assert!(written.contains("href=\"router.png\""));
    }

    #[test]
    fn test_write_to_missing_dir_fails() {
        let result = SvgExporter::new(Size::new(10.0, 10.0))
            .write(&scene(), "/nonexistent/dir/out.svg");
        assert!(matches!(result, Err(export::Error::Io(_))));
    }
}
