//! Interactive rendering: the scene primitives and the drag-aware viewer
//! that keeps them in sync with the simulation.

mod scene;
mod viewer;

pub use scene::{EdgeLine, IconSprite, Label, Scene};
pub use viewer::{DragState, InteractionError, Viewer};
