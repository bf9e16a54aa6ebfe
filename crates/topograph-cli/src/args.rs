//! Command-line argument definitions for the topograph CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input topology, icon map, output
//! path, configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the topograph renderer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input topology file (TOML); the builtin office network is used when omitted
    #[arg(help = "Path to the input topology file")]
    pub input: Option<String>,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Path to an icon map (JSON or TOML) overriding inline icons
    #[arg(long)]
    pub icons: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
