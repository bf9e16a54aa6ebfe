//! The interactive topology viewer.
//!
//! A [`Viewer`] ties a [`Simulation`] to its [`Scene`] and translates pointer
//! gestures into pins. The host calls [`Viewer::on_frame`] once per frame and
//! forwards drag events by node id.
//!
//! # Drag lifecycle
//!
//! Each node is either [`DragState::Idle`] or [`DragState::Dragging`]:
//!
//! - `drag_start` heats the layout up (if no other drag is active) and pins the
//!   node where it currently is.
//! - `drag_move` moves the pin to the pointer.
//! - `drag_end` lets the layout cool again once the last drag ends, and
//!   releases the pin.
//!
//! Out-of-order events are rejected with an [`InteractionError`] and leave
//! the viewer untouched.

use std::path::Path;

use log::{debug, info};
use thiserror::Error;

use topograph_core::{geometry::Point, identifier::Id};

use crate::{
    config::AppConfig,
    error::TopographError,
    export::svg::SvgExporter,
    icons::IconSource,
    simulation::{Simulation, Snapshot},
    topology::Topology,
};

use super::Scene;

/// Rejected pointer interactions.
#[derive(Debug, Error, PartialEq)]
pub enum InteractionError {
    #[error("unknown node `{0}`")]
    UnknownNode(Id),

    #[error("node `{0}` is already being dragged")]
    AlreadyDragging(Id),

    #[error("node `{0}` is not being dragged")]
    NotDragging(Id),

    #[error("pointer position for node `{0}` is not finite")]
    InvalidPosition(Id),

    #[error("viewer is closed")]
    Closed,
}

/// Drag state of a single node.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// A live, draggable view of one topology.
///
/// # Examples
///
/// ```
/// # use topograph::config::AppConfig;
/// # use topograph::geometry::Point;
/// # use topograph::icons::InlineIcons;
/// # use topograph::identifier::Id;
/// # use topograph::render::Viewer;
/// # use topograph::topology::{Edge, LinkStyle, Node, Topology};
/// let topology = Topology::new(
///     vec![Node::new("A", "Router"), Node::new("B", "Internet")],
///     vec![Edge::new("A", "B", LinkStyle::Dashed)],
/// )
/// .unwrap();
/// let icons = InlineIcons::from_topology(&topology);
/// let mut viewer = Viewer::new(topology, &icons, &AppConfig::default()).unwrap();
///
/// let router = Id::new("A");
/// viewer.drag_start(router).unwrap();
/// viewer.drag_move(router, Point::new(500.0, 500.0)).unwrap();
/// viewer.on_frame();
/// assert_eq!(viewer.position(router), Some(Point::new(500.0, 500.0)));
/// viewer.drag_end(router).unwrap();
/// ```
#[derive(Debug)]
pub struct Viewer {
    topology: Topology,
    simulation: Simulation,
    scene: Option<Scene>,
    exporter: SvgExporter,
    drags: Vec<DragState>,
    active_drags: usize,
    drag_alpha_target: f32,
}

impl Viewer {
    /// Validates `config`, starts the simulation and builds the scene.
    ///
    /// # Errors
    ///
    /// Returns a [`TopographError`] for invalid configuration or, under the
    /// fail policy, a node without an icon.
    pub fn new(
        topology: Topology,
        icons: &impl IconSource,
        config: &AppConfig,
    ) -> Result<Self, TopographError> {
        config.validate()?;

        let layout = config.layout().clone().with_center(config.center());
        let simulation = Simulation::new(&topology, &layout);
        let scene = Scene::new(&topology, icons, config.style(), &simulation.snapshot())?;
        let exporter = SvgExporter::from_config(config)?;

        info!(nodes = topology.node_count(); "Viewer created");

        Ok(Self {
            drags: vec![DragState::Idle; topology.node_count()],
            topology,
            simulation,
            scene: Some(scene),
            exporter,
            active_drags: 0,
            drag_alpha_target: layout.drag_alpha_target(),
        })
    }

    /// Per-frame callback: advances the simulation one tick and moves the
    /// scene to match.
    ///
    /// Returns `false` once the layout has settled or the viewer is closed.
    pub fn on_frame(&mut self) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };

        match self.simulation.step() {
            Some(snapshot) => {
                scene.apply(&snapshot);
                true
            }
            None => false,
        }
    }

    /// Runs the simulation headless until it settles and moves the scene to
    /// the final positions.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionError::Closed`] after [`Viewer::close`].
    pub fn settle(&mut self) -> Result<Snapshot, InteractionError> {
        let scene = self.scene.as_mut().ok_or(InteractionError::Closed)?;
        let snapshot = self.simulation.settle();
        scene.apply(&snapshot);
        Ok(snapshot)
    }

    /// Starts dragging `id`.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids, nodes already being dragged and closed viewers.
    pub fn drag_start(&mut self, id: Id) -> Result<(), InteractionError> {
        let index = self.index_of(id)?;
        if self.drags[index] == DragState::Dragging {
            return Err(InteractionError::AlreadyDragging(id));
        }

        if self.active_drags == 0 {
            self.simulation.reheat(self.drag_alpha_target);
        }
        if let Some(position) = self.simulation.position(index) {
            self.simulation.pin(index, position);
        }

        self.drags[index] = DragState::Dragging;
        self.active_drags += 1;
        debug!(node:% = id, active_drags = self.active_drags; "Drag started");
        Ok(())
    }

    /// Moves the pin of a dragged node to `point`. The node follows on the
    /// next frame.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids, idle nodes, non-finite points and closed viewers.
    pub fn drag_move(&mut self, id: Id, point: Point) -> Result<(), InteractionError> {
        let index = self.dragging_index(id)?;
        if !point.is_finite() {
            return Err(InteractionError::InvalidPosition(id));
        }

        self.simulation.pin(index, point);
        Ok(())
    }

    /// Stops dragging `id` and releases its pin.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids, idle nodes and closed viewers.
    pub fn drag_end(&mut self, id: Id) -> Result<(), InteractionError> {
        let index = self.dragging_index(id)?;

        self.active_drags -= 1;
        if self.active_drags == 0 {
            self.simulation.set_alpha_target(0.0);
        }
        self.simulation.unpin(index);

        self.drags[index] = DragState::Idle;
        debug!(node:% = id, active_drags = self.active_drags; "Drag ended");
        Ok(())
    }

    /// Drag state of `id`, or `None` for unknown ids.
    pub fn drag_state(&self, id: Id) -> Option<DragState> {
        self.topology.index_of(id).map(|index| self.drags[index])
    }

    /// Number of nodes currently being dragged.
    pub fn active_drags(&self) -> usize {
        self.active_drags
    }

    /// The node under `point`, for mapping pointer-down events to ids.
    pub fn node_at(&self, point: Point) -> Option<Id> {
        self.scene.as_ref().and_then(|scene| scene.node_at(point))
    }

    /// Current position of `id`.
    pub fn position(&self, id: Id) -> Option<Point> {
        self.topology
            .index_of(id)
            .and_then(|index| self.simulation.position(index))
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// The scene, or `None` once closed.
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Stops the simulation and releases the scene.
    ///
    /// Any further frame or drag call is a no-op or an error. Closing twice
    /// is harmless.
    pub fn close(&mut self) {
        if self.scene.take().is_some() {
            self.simulation.stop();
            self.drags.fill(DragState::Idle);
            self.active_drags = 0;
            info!("Viewer closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.scene.is_none()
    }

    /// Exports the scene as it is right now.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionError::Closed`] after [`Viewer::close`].
    pub fn to_svg(&self) -> Result<String, InteractionError> {
        let scene = self.scene.as_ref().ok_or(InteractionError::Closed)?;
        Ok(self.exporter.to_string(scene))
    }

    /// Exports the scene as it is right now to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionError::Closed`] after [`Viewer::close`], or an
    /// export error if the file cannot be written.
    pub fn write_svg(&self, path: impl AsRef<Path>) -> Result<(), TopographError> {
        let scene = self.scene.as_ref().ok_or(InteractionError::Closed)?;
        self.exporter.write(scene, path)?;
        Ok(())
    }

    fn index_of(&self, id: Id) -> Result<usize, InteractionError> {
        if self.is_closed() {
            return Err(InteractionError::Closed);
        }
        self.topology
            .index_of(id)
            .ok_or(InteractionError::UnknownNode(id))
    }

    fn dragging_index(&self, id: Id) -> Result<usize, InteractionError> {
        let index = self.index_of(id)?;
        if self.drags[index] != DragState::Dragging {
            return Err(InteractionError::NotDragging(id));
        }
        Ok(index)
    }
}
