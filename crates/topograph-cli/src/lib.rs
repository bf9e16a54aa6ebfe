//! CLI logic for the topograph renderer.
//!
//! Loads the configuration, the topology and the optional icon map, settles
//! the layout and writes the SVG.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use topograph::{
    TopographBuilder, TopographError, builtin,
    icons::{IconMap, InlineIcons, Layered},
};

/// Run the topograph CLI application
///
/// Renders the input topology (or the builtin office network) and writes the
/// resulting SVG to the output file.
///
/// # Errors
///
/// Returns `TopographError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Topology parsing and validation errors
/// - Icon map errors
/// - SVG export errors
pub fn run(args: &Args) -> Result<(), TopographError> {
    info!(
        input_path:? = args.input,
        output_path = args.output;
        "Processing topology"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;
    let builder = TopographBuilder::new(app_config);

    let topology = match &args.input {
        Some(path) => {
            let source = fs::read_to_string(path)?;
            builder.parse(&source)?
        }
        None => {
            info!("No input file given, using the builtin office network");
            builtin::office_network()?
        }
    };

    // Icon map entries win over the nodes' own icons
    let inline = InlineIcons::from_topology(&topology);
    match &args.icons {
        Some(path) => {
            let overrides = IconMap::load(path)?;
            info!(icons = overrides.len(); "Icon map loaded");
            builder.export_svg(topology, &Layered::new(overrides, inline), &args.output)?;
        }
        None => builder.export_svg(topology, &inline, &args.output)?,
    }

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
