//! Force-directed layout engine.
//!
//! A [`Simulation`] owns one physics body per topology node and advances all
//! of them together, one tick at a time. Each tick cools the temperature
//! (`alpha`) toward its target, applies the link, many-body and centering
//! forces, and integrates velocities into positions. The run settles once
//! `alpha` drops below `alpha_min`.
//!
//! Hosts drive the engine one tick per frame with [`Simulation::step`];
//! headless callers use [`Simulation::settle`].
//!
//! # Example
//!
//! ```
//! # use topograph::config::LayoutConfig;
//! # use topograph::simulation::Simulation;
//! # use topograph::topology::{Edge, LinkStyle, Node, Topology};
//! let topology = Topology::new(
//!     vec![Node::new("A", "Router"), Node::new("B", "Internet")],
//!     vec![Edge::new("A", "B", LinkStyle::Dashed)],
//! )
//! .unwrap();
//!
//! let mut simulation = Simulation::new(&topology, &LayoutConfig::default());
//! let snapshot = simulation.settle();
//! assert!(simulation.is_settled());
//!
//! let [a, b] = snapshot.positions() else { unreachable!() };
//! assert!((a.distance(*b) - 100.0).abs() < 15.0);
//! ```

mod forces;

use std::f32::consts::PI;

use log::{debug, info, trace, warn};
use rand::{SeedableRng, rngs::StdRng};

use topograph_core::geometry::{Point, Size};

use crate::{config::LayoutConfig, topology::Topology};

/// Radius scale of the initial phyllotaxis spiral.
const INITIAL_RADIUS: f32 = 10.0;

/// Physics state of a single node.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Body {
    position: Point,
    velocity: Point,
    pin: Option<Point>,
}

/// A link resolved to body indices, with its degree-derived weights.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spring {
    source: usize,
    target: usize,
    strength: f32,
    bias: f32,
}

/// Node positions after a tick, indexed like the topology's nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    tick: u64,
    alpha: f32,
    positions: Vec<Point>,
}

impl Snapshot {
    /// Number of ticks run when this snapshot was taken.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn position(&self, index: usize) -> Option<Point> {
        self.positions.get(index).copied()
    }
}

/// The layout simulation.
#[derive(Debug, Clone)]
pub struct Simulation {
    bodies: Vec<Body>,
    springs: Vec<Spring>,

    charge_strength: f32,
    link_distance: f32,
    center: Point,
    velocity_decay: f32,

    alpha: f32,
    alpha_min: f32,
    alpha_decay: f32,
    alpha_target: f32,

    max_ticks: usize,
    tick: u64,
    running: bool,
    rng: StdRng,
}

impl Simulation {
    /// Creates a running simulation for the given topology.
    ///
    /// Nodes with an authored position start there. The others are spread on
    /// a phyllotaxis spiral around the center, which keeps them apart without
    /// any randomness. Without an explicit `center` in the layout, the middle
    /// of the default canvas is used.
    pub fn new(topology: &Topology, layout: &LayoutConfig) -> Self {
        let center = layout
            .center()
            .unwrap_or_else(|| Size::new(1920.0, 1080.0).center());

        let bodies = topology
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, node)| Body {
                position: node
                    .position()
                    .unwrap_or_else(|| phyllotaxis(i).add_point(center)),
                velocity: Point::default(),
                pin: None,
            })
            .collect();

        let degrees = topology.degrees();
        let springs = topology
            .links()
            .iter()
            .map(|link| {
                let source_degree = degrees[link.source] as f32;
                let target_degree = degrees[link.target] as f32;
                Spring {
                    source: link.source,
                    target: link.target,
                    strength: 1.0 / source_degree.min(target_degree),
                    bias: source_degree / (source_degree + target_degree),
                }
            })
            .collect();

        info!(
            nodes = topology.node_count(),
            links = topology.links().len();
            "Simulation created"
        );

        Self {
            bodies,
            springs,
            charge_strength: layout.charge_strength(),
            link_distance: layout.link_distance(),
            center,
            velocity_decay: layout.velocity_decay(),
            alpha: layout.alpha(),
            alpha_min: layout.alpha_min(),
            alpha_decay: layout.alpha_decay(),
            alpha_target: layout.alpha_target(),
            max_ticks: layout.max_ticks(),
            tick: 0,
            running: true,
            rng: StdRng::seed_from_u64(layout.seed()),
        }
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    /// Sets the temperature the run decays toward. Does not restart a settled run.
    pub fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_settled(&self) -> bool {
        !self.running
    }

    /// Ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Marks the run as running. A no-op while already running.
    pub fn restart(&mut self) {
        if !self.running {
            debug!(tick = self.tick, alpha = self.alpha; "Simulation restarted");
            self.running = true;
        }
    }

    /// Halts the run; [`Simulation::step`] returns `None` until restarted.
    pub fn stop(&mut self) {
        if self.running {
            debug!(tick = self.tick; "Simulation stopped");
            self.running = false;
        }
    }

    /// Sets the target temperature and restarts the run.
    ///
    /// Calling it again while running only resets the target.
    pub fn reheat(&mut self, target: f32) {
        self.set_alpha_target(target);
        self.restart();
    }

    /// Pins a body at `point`. From the next tick on its position equals the pin.
    ///
    /// Returns `false` if `index` is out of range.
    pub fn pin(&mut self, index: usize, point: Point) -> bool {
        match self.bodies.get_mut(index) {
            Some(body) => {
                body.pin = Some(point);
                true
            }
            None => false,
        }
    }

    /// Releases a pin. Returns `false` if `index` is out of range.
    pub fn unpin(&mut self, index: usize) -> bool {
        match self.bodies.get_mut(index) {
            Some(body) => {
                body.pin = None;
                true
            }
            None => false,
        }
    }

    pub fn pinned(&self, index: usize) -> Option<Point> {
        self.bodies.get(index).and_then(|body| body.pin)
    }

    /// Current position of a body.
    pub fn position(&self, index: usize) -> Option<Point> {
        self.bodies.get(index).map(|body| body.position)
    }

    /// Positions as of the last tick.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            alpha: self.alpha,
            positions: self.bodies.iter().map(|body| body.position).collect(),
        }
    }

    /// Runs exactly one tick, whether or not the run is settled.
    pub fn tick(&mut self) -> Snapshot {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        forces::apply_links(
            &mut self.bodies,
            &self.springs,
            self.link_distance,
            self.alpha,
            &mut self.rng,
        );
        forces::apply_many_body(
            &mut self.bodies,
            self.charge_strength,
            self.alpha,
            &mut self.rng,
        );
        forces::apply_center(&mut self.bodies, self.center);
        forces::integrate(&mut self.bodies, self.velocity_decay);

        self.tick += 1;
        trace!(tick = self.tick, alpha = self.alpha; "Tick");

        self.snapshot()
    }

    /// Advances one tick while running.
    ///
    /// Returns `None` once the run has settled. The tick that brings `alpha`
    /// below `alpha_min` still yields its snapshot and then settles the run.
    pub fn step(&mut self) -> Option<Snapshot> {
        if !self.running {
            return None;
        }

        let snapshot = self.tick();
        if self.alpha < self.alpha_min {
            self.running = false;
            debug!(tick = self.tick, alpha = self.alpha; "Simulation settled");
        }
        Some(snapshot)
    }

    /// Iterator over [`Simulation::step`] snapshots.
    ///
    /// Never ends while `alpha_target` is at or above `alpha_min`.
    pub fn ticks(&mut self) -> Ticks<'_> {
        Ticks { simulation: self }
    }

    /// Steps until settled or `max_ticks` is reached, and returns the final
    /// positions.
    pub fn settle(&mut self) -> Snapshot {
        let mut steps = 0;
        while steps < self.max_ticks && self.step().is_some() {
            steps += 1;
        }

        if self.running {
            warn!(
                max_ticks = self.max_ticks,
                alpha = self.alpha;
                "Simulation did not settle within the tick limit"
            );
        } else {
            debug!(tick = self.tick, steps = steps; "Layout settled");
        }

        self.snapshot()
    }
}

/// Iterator returned by [`Simulation::ticks`].
#[derive(Debug)]
pub struct Ticks<'a> {
    simulation: &'a mut Simulation,
}

impl Iterator for Ticks<'_> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Self::Item> {
        self.simulation.step()
    }
}

/// Offset of the `index`-th body on the initial spiral.
fn phyllotaxis(index: usize) -> Point {
    let angle_step = PI * (3.0 - 5f32.sqrt());
    let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
    let angle = index as f32 * angle_step;
    Point::new(radius * angle.cos(), radius * angle.sin())
}

#[cfg(test)]
mod tests {
    use float_cmp::{approx_eq, assert_approx_eq};

    use crate::topology::{Edge, LinkStyle, Node};

    use super::*;

    fn pair() -> Topology {
        Topology::new(
            vec![Node::new("A", "Router"), Node::new("B", "Internet")],
            vec![Edge::new("A", "B", LinkStyle::Dashed)],
        )
        .unwrap()
    }

    fn star(leaves: usize) -> Topology {
        let mut nodes = vec![Node::new("hub", "Switch")];
        let mut edges = Vec::new();
        for i in 0..leaves {
            let id = format!("leaf{i}");
            nodes.push(Node::new(&id, "PC"));
            edges.push(Edge::new("hub", &id, LinkStyle::Solid));
        }
        Topology::new(nodes, edges).unwrap()
    }

    fn mean(positions: &[Point]) -> Point {
        let sum = positions
            .iter()
            .fold(Point::default(), |acc, p| acc.add_point(*p));
        sum.scale(1.0 / positions.len() as f32)
    }

    #[test]
    fn test_initial_spiral_is_distinct_and_centered() {
        let simulation = Simulation::new(&star(6), &LayoutConfig::default());
        let snapshot = simulation.snapshot();
        assert_eq!(snapshot.tick(), 0);

        let positions = snapshot.positions();
        assert_eq!(positions[0], Point::new(960.0, 540.0).add_point(phyllotaxis(0)));
        for (i, a) in positions.iter().enumerate() {
            assert!(a.distance(Point::new(960.0, 540.0)) < 40.0);
            for b in &positions[i + 1..] {
                assert!(a.distance(*b) > 1.0);
            }
        }
    }

    #[test]
    fn test_authored_position_is_kept() {
        let topology = Topology::new(
            vec![
                Node::new("A", "Router").with_position(Point::new(100.0, 200.0)),
                Node::new("B", "Internet"),
            ],
            Vec::new(),
        )
        .unwrap();

        let simulation = Simulation::new(&topology, &LayoutConfig::default());
        assert_eq!(simulation.position(0), Some(Point::new(100.0, 200.0)));
    }

    #[test]
    fn test_settles_after_about_300_ticks() {
        let mut simulation = Simulation::new(&pair(), &LayoutConfig::default());
        let steps = simulation.ticks().count();

        assert!((299..=302).contains(&steps), "settled after {steps} ticks");
        assert!(simulation.is_settled());
        assert!(simulation.alpha() < 0.001);
        assert_eq!(simulation.step(), None);
    }

    #[test]
    fn test_two_nodes_converge_near_link_distance() {
        let mut simulation = Simulation::new(&pair(), &LayoutConfig::default());
        let snapshot = simulation.settle();

        let distance = snapshot.positions()[0].distance(snapshot.positions()[1]);
        assert!(
            approx_eq!(f32, distance, 100.0, epsilon = 15.0),
            "distance = {distance}"
        );
    }

    #[test]
    fn test_center_force_keeps_mean_at_center() {
        let layout = LayoutConfig::default().with_center(Point::new(300.0, 200.0));
        let mut simulation = Simulation::new(&star(4), &layout);
        let snapshot = simulation.settle();

        let mean = mean(snapshot.positions());
        assert_approx_eq!(f32, mean.x(), 300.0, epsilon = 0.5);
        assert_approx_eq!(f32, mean.y(), 200.0, epsilon = 0.5);
    }

    #[test]
    fn test_pinned_body_sits_exactly_on_pin() {
        let mut simulation = Simulation::new(&star(3), &LayoutConfig::default());
        let pin = Point::new(500.0, 500.0);
        assert!(simulation.pin(1, pin));

        for _ in 0..20 {
            let snapshot = simulation.tick();
            assert_eq!(snapshot.position(1), Some(pin));
        }

        assert!(simulation.unpin(1));
        assert_eq!(simulation.pinned(1), None);
        assert!(!simulation.pin(99, pin));
    }

    #[test]
    fn test_restart_is_idempotent() {
        let mut simulation = Simulation::new(&pair(), &LayoutConfig::default());
        simulation.step();
        let alpha = simulation.alpha();

        simulation.restart();
        simulation.restart();
        assert!(simulation.is_running());
        assert_eq!(simulation.alpha(), alpha);
        assert_eq!(simulation.tick_count(), 1);
    }

    #[test]
    fn test_reheat_wakes_settled_run() {
        let mut simulation = Simulation::new(&pair(), &LayoutConfig::default());
        simulation.settle();
        assert!(simulation.is_settled());

        simulation.reheat(0.3);
        assert!(simulation.is_running());
        assert_eq!(simulation.alpha_target(), 0.3);

        // A target above alpha_min keeps the run hot indefinitely
        assert_eq!(simulation.ticks().take(1000).count(), 1000);
        assert!(simulation.alpha() > 0.25);

        simulation.set_alpha_target(0.0);
        simulation.settle();
        assert!(simulation.is_settled());
    }

    #[test]
    fn test_settle_respects_tick_cap() {
        let layout = LayoutConfig::default().with_max_ticks(10);
        let mut simulation = Simulation::new(&pair(), &layout);
        let snapshot = simulation.settle();

        assert_eq!(snapshot.tick(), 10);
        assert!(simulation.is_running());
    }

    #[test]
    fn test_stop_halts_stepping() {
        let mut simulation = Simulation::new(&pair(), &LayoutConfig::default());
        simulation.stop();
        assert_eq!(simulation.step(), None);
        assert_eq!(simulation.tick_count(), 0);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let run = || {
            let mut simulation = Simulation::new(&star(5), &LayoutConfig::default().with_seed(7));
            simulation.settle()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_empty_topology() {
        let topology = Topology::new(Vec::new(), Vec::new()).unwrap();
        let mut simulation = Simulation::new(&topology, &LayoutConfig::default());
        assert!(simulation.is_empty());

        let snapshot = simulation.settle();
        assert!(snapshot.positions().is_empty());
        assert!(simulation.is_settled());
    }

    #[test]
    fn test_coincident_nodes_separate() {
        let here = Point::new(50.0, 50.0);
        let topology = Topology::new(
            vec![
                Node::new("A", "PC").with_position(here),
                Node::new("B", "PC").with_position(here),
            ],
            Vec::new(),
        )
        .unwrap();

        let mut simulation = Simulation::new(&topology, &LayoutConfig::default());
        let snapshot = simulation.settle();
        let [a, b] = snapshot.positions() else {
            panic!("expected two positions");
        };
        assert!(a.is_finite() && b.is_finite());
        assert!(a.distance(*b) > 10.0);
    }
}
