//! Icon sources.
//!
//! A node's icon is an image reference (a path or URL) that the exported SVG
//! points at. Icons are never fetched or embedded.
//!
//! References come from an [`IconSource`]: the inline `icon` fields of a
//! topology ([`InlineIcons`]), an external id → href map loaded from JSON or
//! TOML ([`IconMap`]), or two sources chained with [`Layered`].
//!
//! # Example
//!
//! ```
//! # use topograph::icons::{IconMap, IconSource, InlineIcons, Layered};
//! # use topograph::topology::{Node, Topology};
//! # use topograph::identifier::Id;
//! let topology = Topology::new(
//!     vec![
//!         Node::new("A", "Router").with_icon("inline/router.png"),
//!         Node::new("B", "Internet").with_icon("inline/cloud.png"),
//!     ],
//!     vec![],
//! )
//! .unwrap();
//!
//! let overrides = IconMap::from_json_str(r#"{ "A": "theme/router.svg" }"#).unwrap();
//! let icons = Layered::new(overrides, InlineIcons::from_topology(&topology));
//!
//! assert_eq!(icons.resolve(Id::new("A")).unwrap().href(), "theme/router.svg");
//! assert_eq!(icons.resolve(Id::new("B")).unwrap().href(), "inline/cloud.png");
//! assert!(icons.resolve(Id::new("C")).is_none());
//! ```

use std::{
    collections::HashMap,
    fmt, fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, error};
use thiserror::Error;

use topograph_core::identifier::Id;

use crate::topology::Topology;

/// Errors raised while loading or resolving icons.
#[derive(Debug, Error)]
pub enum IconError {
    #[error("no icon for node `{0}`")]
    Missing(Id),

    #[error("failed to read icon map `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid icon map: {0}")]
    Parse(String),

    #[error("unsupported icon map format `{0}`, expected .json or .toml")]
    UnsupportedFormat(String),
}

/// A reference to an icon image, used verbatim as the sprite `href`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconRef(String);

impl IconRef {
    pub fn new(href: impl Into<String>) -> Self {
        Self(href.into())
    }

    pub fn href(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IconRef {
    fn from(href: &str) -> Self {
        Self::new(href)
    }
}

/// Looks up the icon for a node.
pub trait IconSource {
    /// Returns the icon for `id`, or `None` if this source has none.
    fn resolve(&self, id: Id) -> Option<IconRef>;
}

impl<T: IconSource + ?Sized> IconSource for &T {
    fn resolve(&self, id: Id) -> Option<IconRef> {
        (**self).resolve(id)
    }
}

impl<T: IconSource + ?Sized> IconSource for Box<T> {
    fn resolve(&self, id: Id) -> Option<IconRef> {
        (**self).resolve(id)
    }
}

/// A source that never resolves anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIcons;

impl IconSource for NoIcons {
    fn resolve(&self, _id: Id) -> Option<IconRef> {
        None
    }
}

/// Icons taken from the nodes' own `icon` fields.
#[derive(Debug, Default, Clone)]
pub struct InlineIcons {
    icons: HashMap<Id, IconRef>,
}

impl InlineIcons {
    pub fn from_topology(topology: &Topology) -> Self {
        let icons = topology
            .nodes()
            .iter()
            .filter_map(|node| node.icon().map(|href| (node.id(), IconRef::new(href))))
            .collect();
        Self { icons }
    }
}

impl IconSource for InlineIcons {
    fn resolve(&self, id: Id) -> Option<IconRef> {
        self.icons.get(&id).cloned()
    }
}

/// An external node id → icon reference map.
///
/// Both file formats are a single flat table:
///
/// ```json
/// { "A": "assets/icons/router.png", "B": "assets/icons/cloud.png" }
/// ```
///
/// ```toml
/// A = "assets/icons/router.png"
/// B = "assets/icons/cloud.png"
/// ```
#[derive(Debug, Default, Clone)]
pub struct IconMap {
    icons: IndexMap<Id, IconRef>,
}

impl IconMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the icon for `id`.
    pub fn insert(&mut self, id: Id, icon: IconRef) -> Option<IconRef> {
        self.icons.insert(id, icon)
    }

    /// # Errors
    ///
    /// Returns [`IconError::Parse`] if `source` is not a flat JSON object of strings.
    pub fn from_json_str(source: &str) -> Result<Self, IconError> {
        let entries: IndexMap<String, String> =
            serde_json::from_str(source).map_err(|err| IconError::Parse(err.to_string()))?;
        Ok(Self::from_entries(entries))
    }

    /// # Errors
    ///
    /// Returns [`IconError::Parse`] if `source` is not a flat TOML table of strings.
    pub fn from_toml_str(source: &str) -> Result<Self, IconError> {
        let entries: IndexMap<String, String> =
            toml::from_str(source).map_err(|err| IconError::Parse(err.to_string()))?;
        Ok(Self::from_entries(entries))
    }

    /// Loads a map from disk, choosing the format by file extension.
    ///
    /// # Errors
    ///
    /// Returns [`IconError::UnsupportedFormat`] for extensions other than
    /// `.json` and `.toml`, [`IconError::Io`] if the file cannot be read, and
    /// [`IconError::Parse`] for malformed content.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IconError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let parse: fn(&str) -> Result<Self, IconError> = match extension.as_str() {
            "json" => Self::from_json_str,
            "toml" => Self::from_toml_str,
            _ => return Err(IconError::UnsupportedFormat(path.display().to_string())),
        };

        let source = fs::read_to_string(path).map_err(|err| {
            error!(path:? = path, err:err; "Failed to read icon map");
            IconError::Io {
                path: path.to_path_buf(),
                source: err,
            }
        })?;

        let map = parse(&source)?;
        debug!(path:? = path, icons = map.len(); "Icon map loaded");
        Ok(map)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    fn from_entries(entries: IndexMap<String, String>) -> Self {
        let icons = entries
            .into_iter()
            .map(|(id, href)| (Id::new(&id), IconRef::new(href)))
            .collect();
        Self { icons }
    }
}

impl IconSource for IconMap {
    fn resolve(&self, id: Id) -> Option<IconRef> {
        self.icons.get(&id).cloned()
    }
}

/// Two sources chained together; `primary` wins when both have an icon.
#[derive(Debug, Default, Clone)]
pub struct Layered<A, B> {
    primary: A,
    fallback: B,
}

impl<A, B> Layered<A, B> {
    pub fn new(primary: A, fallback: B) -> Self {
        Self { primary, fallback }
    }
}

impl<A: IconSource, B: IconSource> IconSource for Layered<A, B> {
    fn resolve(&self, id: Id) -> Option<IconRef> {
        self.primary
            .resolve(id)
            .or_else(|| self.fallback.resolve(id))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::topology::Node;

    use super::*;

    #[test]
    fn test_inline_icons() {
        let topology = Topology::new(
            vec![
                Node::new("A", "Router").with_icon("router.png"),
                Node::new("B", "Internet"),
            ],
            Vec::new(),
        )
        .unwrap();

        let icons = InlineIcons::from_topology(&topology);
        assert_eq!(icons.resolve(Id::new("A")), Some(IconRef::from("router.png")));
        assert_eq!(icons.resolve(Id::new("B")), None);
    }

    #[test]
    fn test_icon_map_from_json_and_toml() {
        let json = IconMap::from_json_str(r#"{"A": "a.png", "B": "b.png"}"#).unwrap();
        assert_eq!(json.len(), 2);
        assert_eq!(json.resolve(Id::new("B")).unwrap().href(), "b.png");

        let toml = IconMap::from_toml_str("A = \"a.svg\"\n").unwrap();
        assert_eq!(toml.resolve(Id::new("A")).unwrap().href(), "a.svg");
    }

    #[test]
    fn test_icon_map_keeps_file_order() {
        let map = IconMap::from_json_str(r#"{"G2": "b.png", "A": "a.png", "D1": "c.png"}"#).unwrap();
        let ids: Vec<Id> = map.icons.keys().copied().collect();
        assert_eq!(ids, [Id::new("G2"), Id::new("A"), Id::new("D1")]);

        let map = IconMap::from_toml_str("z = \"z.png\"\nb = \"b.png\"\n").unwrap();
        let ids: Vec<Id> = map.icons.keys().copied().collect();
        assert_eq!(ids, [Id::new("z"), Id::new("b")]);
    }

    #[test]
    fn test_icon_map_rejects_malformed() {
        assert!(matches!(
            IconMap::from_json_str(r#"{"A": 1}"#),
            Err(IconError::Parse(_))
        ));
        assert!(matches!(
            IconMap::from_toml_str("[nested]\nA = \"a\"\n"),
            Err(IconError::Parse(_))
        ));
    }

    #[test]
    fn test_icon_map_load_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"G1": "switch.png"}}"#).unwrap();

        let map = IconMap::load(file.path()).unwrap();
        assert_eq!(map.resolve(Id::new("G1")).unwrap().href(), "switch.png");
    }

    #[test]
    fn test_icon_map_load_errors() {
        assert!(matches!(
            IconMap::load("icons.yaml"),
            Err(IconError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            IconMap::load("/nonexistent/icons.json"),
            Err(IconError::Io { .. })
        ));
    }

    #[test]
    fn test_layered_prefers_primary() {
        let mut primary = IconMap::new();
        primary.insert(Id::new("A"), IconRef::from("primary.png"));
        let mut fallback = IconMap::new();
        fallback.insert(Id::new("A"), IconRef::from("fallback.png"));
        fallback.insert(Id::new("B"), IconRef::from("only.png"));

        let icons = Layered::new(&primary, &fallback);
        assert_eq!(icons.resolve(Id::new("A")).unwrap().href(), "primary.png");
        assert_eq!(icons.resolve(Id::new("B")).unwrap().href(), "only.png");
        assert_eq!(NoIcons.resolve(Id::new("A")), None);
    }
}
