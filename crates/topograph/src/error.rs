//! Error types for topograph operations.
//!
//! Every concern has its own error enum; [`TopographError`] wraps them all so
//! callers can use `?` across the whole pipeline.

use std::io;

use thiserror::Error;

use crate::{
    config::ConfigError, export, icons::IconError, render::InteractionError,
    topology::TopologyError,
};

/// The main error type for topograph operations.
#[derive(Debug, Error)]
pub enum TopographError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("Icon error: {0}")]
    Icons(#[from] IconError),

    #[error("Interaction error: {0}")]
    Interaction(#[from] InteractionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Export error: {0}")]
    Export(#[from] export::Error),
}
