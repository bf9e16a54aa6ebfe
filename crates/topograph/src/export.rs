//! Scene export.

pub mod svg;

use std::io;

use thiserror::Error;

/// Errors raised while writing an exported scene.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
