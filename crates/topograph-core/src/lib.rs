//! Topograph Core Types and Definitions
//!
//! This crate provides the foundational types shared by the topograph layout
//! engine and its renderers. It includes:
//!
//! - **Identifiers**: Interned node identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Points, sizes and bounding boxes ([`geometry`] module)
//! - **Draw**: Stroke definitions and layered SVG output ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod identifier;
