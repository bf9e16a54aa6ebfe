//! Error adapter for converting TopographError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use topograph::{
    TopographError, config::ConfigError, icons::IconError, topology::TopologyError,
};

/// Adapter that renders a [`TopographError`] with a stable code and, where
/// one exists, a hint on how to fix the input.
pub struct ErrorAdapter<'a>(pub &'a TopographError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TopographError::Io(_) => "topograph::io",
            TopographError::Topology(_) => "topograph::topology",
            TopographError::Icons(_) => "topograph::icons",
            TopographError::Interaction(_) => "topograph::interaction",
            TopographError::Config(_) => "topograph::config",
            TopographError::Export(_) => "topograph::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            TopographError::Topology(TopologyError::UnknownNode { .. }) => {
                "every edge `source` and `target` must match a node `id`"
            }
            TopographError::Topology(TopologyError::DuplicateNode(_)) => {
                "node ids must be unique"
            }
            TopographError::Topology(TopologyError::SelfLoop { .. }) => {
                "remove the edge or point it at another node"
            }
            TopographError::Icons(IconError::Missing(_)) => {
                "add the node to the icon map, or set `style.missing_icon = \"placeholder\"`"
            }
            TopographError::Icons(IconError::UnsupportedFormat(_)) => {
                "icon maps must be .json or .toml files"
            }
            TopographError::Config(ConfigError::MissingFile(_)) => {
                "check the --config path, or omit it to use the defaults"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use topograph::identifier::Id;

    use super::*;

    #[test]
    fn test_codes_and_help() {
        let err = TopographError::Topology(TopologyError::UnknownNode {
            edge: 0,
            id: Id::new("Z"),
        });
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "topograph::topology");
        assert!(adapter.help().unwrap().to_string().contains("source"));
        assert!(adapter.to_string().contains("unknown node `Z`"));
    }

    #[test]
    fn test_io_error_has_no_help() {
        let err = TopographError::Io(std::io::Error::other("disk on fire"));
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "topograph::io");
        assert!(adapter.help().is_none());
    }
}
