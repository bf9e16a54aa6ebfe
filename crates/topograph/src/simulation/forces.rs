//! Force kernels applied once per tick.
//!
//! Forces only write velocities; [`integrate`] is the single place positions
//! change. The one exception is [`apply_center`], which translates positions
//! directly.

use rand::{Rng, rngs::StdRng};

use topograph_core::geometry::Point;

use super::{Body, Spring};

/// Tiny random offset used in place of an exactly zero component.
fn jiggle(rng: &mut StdRng) -> f32 {
    (rng.random::<f32>() - 0.5) * 1e-6
}

/// Replaces zero components of `delta` with a jiggle.
fn nonzero(delta: Point, rng: &mut StdRng) -> Point {
    let x = if delta.x() == 0.0 { jiggle(rng) } else { delta.x() };
    let y = if delta.y() == 0.0 { jiggle(rng) } else { delta.y() };
    Point::new(x, y)
}

/// Pulls or pushes the endpoints of each link toward `distance`.
///
/// The correction is split by `bias`, so the endpoint with more links moves
/// less. Links are processed in order and each sees the velocities left by
/// the previous ones.
pub(super) fn apply_links(
    bodies: &mut [Body],
    springs: &[Spring],
    distance: f32,
    alpha: f32,
    rng: &mut StdRng,
) {
    for spring in springs {
        let source = bodies[spring.source];
        let target = bodies[spring.target];

        let delta = nonzero(
            target
                .position
                .add_point(target.velocity)
                .sub_point(source.position.add_point(source.velocity)),
            rng,
        );
        let length = delta.hypot();
        let factor = (length - distance) / length * alpha * spring.strength;
        let correction = delta.scale(factor);

        let target = &mut bodies[spring.target];
        target.velocity = target
            .velocity
            .sub_point(correction.scale(spring.bias));

        let source = &mut bodies[spring.source];
        source.velocity = source
            .velocity
            .add_point(correction.scale(1.0 - spring.bias));
    }
}

/// Exact pairwise charge between every two bodies.
///
/// Negative strength repels. Squared distances below 1 are softened to their
/// square root so near-coincident bodies do not explode.
pub(super) fn apply_many_body(bodies: &mut [Body], strength: f32, alpha: f32, rng: &mut StdRng) {
    for i in 0..bodies.len() {
        let origin = bodies[i].position;
        let mut push = Point::default();

        for (j, other) in bodies.iter().enumerate() {
            if i == j {
                continue;
            }
            let delta = nonzero(other.position.sub_point(origin), rng);
            let mut length_sq = delta.length_sq();
            if length_sq < 1.0 {
                length_sq = length_sq.sqrt();
            }
            push = push.add_point(delta.scale(strength * alpha / length_sq));
        }

        bodies[i].velocity = bodies[i].velocity.add_point(push);
    }
}

/// Translates every body so their mean position equals `center`.
pub(super) fn apply_center(bodies: &mut [Body], center: Point) {
    if bodies.is_empty() {
        return;
    }

    let sum = bodies
        .iter()
        .fold(Point::default(), |acc, body| acc.add_point(body.position));
    let shift = center.sub_point(sum.scale(1.0 / bodies.len() as f32));

    for body in bodies.iter_mut() {
        body.position = body.position.add_point(shift);
    }
}

/// Applies velocity decay and moves free bodies. Pinned bodies snap to their
/// pin with zero velocity.
pub(super) fn integrate(bodies: &mut [Body], velocity_decay: f32) {
    let retain = 1.0 - velocity_decay;

    for body in bodies.iter_mut() {
        match body.pin {
            Some(pin) => {
                body.position = pin;
                body.velocity = Point::default();
            }
            None => {
                body.velocity = body.velocity.scale(retain);
                body.position = body.position.add_point(body.velocity);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use rand::SeedableRng;

    use super::*;

    fn body(x: f32, y: f32) -> Body {
        Body {
            position: Point::new(x, y),
            velocity: Point::default(),
            pin: None,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(1)
    }

    #[test]
    fn test_link_stretched_pulls_together() {
        let mut bodies = [body(0.0, 0.0), body(200.0, 0.0)];
        let springs = [Spring {
            source: 0,
            target: 1,
            strength: 1.0,
            bias: 0.5,
        }];

        apply_links(&mut bodies, &springs, 100.0, 1.0, &mut rng());

        // Half of the 100px excess goes to each end
        assert_approx_eq!(f32, bodies[0].velocity.x(), 50.0);
        assert_approx_eq!(f32, bodies[1].velocity.x(), -50.0);
        assert_eq!(bodies[0].velocity.y(), bodies[1].velocity.y() * -1.0);
    }

    #[test]
    fn test_link_bias_favours_low_degree_end() {
        let mut bodies = [body(0.0, 0.0), body(0.0, 50.0)];
        let springs = [Spring {
            source: 0,
            target: 1,
            strength: 1.0,
            bias: 0.75,
        }];

        apply_links(&mut bodies, &springs, 100.0, 1.0, &mut rng());

        // Compressed: ends are pushed apart, the target takes three quarters
        assert_approx_eq!(f32, bodies[1].velocity.y(), 37.5, epsilon = 1e-4);
        assert_approx_eq!(f32, bodies[0].velocity.y(), -12.5, epsilon = 1e-4);
    }

    #[test]
    fn test_many_body_repels_symmetrically() {
        let mut bodies = [body(0.0, 0.0), body(10.0, 0.0)];
        apply_many_body(&mut bodies, -300.0, 1.0, &mut rng());

        assert_approx_eq!(f32, bodies[0].velocity.x(), -30.0, epsilon = 1e-4);
        assert_approx_eq!(f32, bodies[1].velocity.x(), 30.0, epsilon = 1e-4);
    }

    #[test]
    fn test_many_body_coincident_stays_finite() {
        let mut bodies = [body(5.0, 5.0), body(5.0, 5.0)];
        apply_many_body(&mut bodies, -300.0, 1.0, &mut rng());

        for body in &bodies {
            assert!(body.velocity.is_finite());
            assert!(!body.velocity.is_zero());
        }
    }

    #[test]
    fn test_center_translates_mean() {
        let mut bodies = [body(0.0, 0.0), body(10.0, 20.0)];
        apply_center(&mut bodies, Point::new(100.0, 100.0));

        assert_eq!(bodies[0].position, Point::new(95.0, 90.0));
        assert_eq!(bodies[1].position, Point::new(105.0, 110.0));
    }

    #[test]
    fn test_integrate_decays_and_pins() {
        let mut bodies = [body(0.0, 0.0), body(0.0, 0.0)];
        bodies[0].velocity = Point::new(10.0, -10.0);
        bodies[1].velocity = Point::new(10.0, -10.0);
        bodies[1].pin = Some(Point::new(7.0, 7.0));

        integrate(&mut bodies, 0.4);

        assert_approx_eq!(f32, bodies[0].velocity.x(), 6.0);
        assert_approx_eq!(f32, bodies[0].position.y(), -6.0);
        assert_eq!(bodies[1].position, Point::new(7.0, 7.0));
        assert!(bodies[1].velocity.is_zero());
    }
}
