//! Steering rules.
//!
//! Separation, alignment and cohesion depend on the neighbour set; boundary
//! avoidance depends only on the agent's position and the screen bounds.
//! The four raw vectors are combined by fixed weights and the resulting
//! vector's angle becomes the new heading.

use super::vector::Vector2D;
use crate::core::{Agent, FlockConfig, ScreenBounds, Weights};

/// Everything a tick needs besides the agents themselves.
///
/// Built from the configuration once per frame, so a resize between frames
/// is picked up by the next dispatch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SteeringParams {
    pub perception_radius: f64,
    pub weights: Weights,
    pub bounds: ScreenBounds,
    /// Boundary-avoidance band along x and y
    pub turn_margin: (f64, f64),
}

impl From<&FlockConfig> for SteeringParams {
    fn from(cfg: &FlockConfig) -> Self {
        SteeringParams {
            perception_radius: cfg.perception_radius,
            weights: cfg.weights,
            bounds: cfg.bounds,
            turn_margin: cfg.turn_margin(),
        }
    }
}

/// Raw (unweighted) rule vectors for one agent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RuleVectors {
    pub separation: Vector2D,
    pub alignment: Vector2D,
    pub cohesion: Vector2D,
    pub boundary: Vector2D,
}

impl RuleVectors {
    pub fn combine(&self, w: &Weights) -> Vector2D {
        self.separation * w.separation
            + self.alignment * w.alignment
            + self.cohesion * w.cohesion
            + self.boundary * w.boundary
    }
}

/// Unit push away from any edge the agent is within the turn margin of.
/// At most one contribution per axis.
pub fn boundary_avoidance(target: &Agent, params: &SteeringParams) -> Vector2D {
    let (margin_x, margin_y) = params.turn_margin;
    let mut push = Vector2D::ZERO;

    if target.x < margin_x {
        push += Vector2D::new(1.0, 0.0);
    } else if target.x > params.bounds.width - margin_x {
        push += Vector2D::new(-1.0, 0.0);
    }
    if target.y < margin_y {
        push += Vector2D::new(0.0, 1.0);
    } else if target.y > params.bounds.height - margin_y {
        push += Vector2D::new(0.0, -1.0);
    }
    push
}

/// Accumulate the four rule vectors. Returns `None` for an empty neighbour set.
pub fn rule_vectors<'a, I>(target: &Agent, neighbors: I, params: &SteeringParams) -> Option<RuleVectors>
where
    I: IntoIterator<Item = &'a Agent>,
{
    let me = Vector2D::new(target.x, target.y);
    let mut separation = Vector2D::ZERO;
    let mut heading_sum = Vector2D::ZERO;
    let mut position_sum = Vector2D::ZERO;
    let mut count = 0usize;

    for other in neighbors {
        let pos = Vector2D::new(other.x, other.y);
        separation += me - pos;
        heading_sum += Vector2D::from_angle(other.direction);
        position_sum += pos;
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let n = count as f64;
    Some(RuleVectors {
        separation,
        alignment: heading_sum / n,
        cohesion: position_sum / n - me,
        boundary: boundary_avoidance(target, params),
    })
}

/// New heading for `target` given its neighbours.
///
/// With no neighbours the current heading is returned unchanged. When the
/// weighted contributions cancel exactly the heading is `atan2(0, 0) = 0`.
pub fn steer<'a, I>(target: &Agent, neighbors: I, params: &SteeringParams) -> f64
where
    I: IntoIterator<Item = &'a Agent>,
{
    match rule_vectors(target, neighbors, params) {
        Some(rules) => rules.combine(&params.weights).heading(),
        None => target.direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_4, PI, TAU};

    const EPS: f64 = 1e-9;

    fn params(weights: Weights, width: f64, height: f64, margin: f64) -> SteeringParams {
        SteeringParams {
            perception_radius: 100.0,
            weights,
            bounds: ScreenBounds::new(width, height),
            turn_margin: (margin, margin),
        }
    }

    fn triangle() -> Vec<Agent> {
        vec![
            Agent::new(0, 0.0, 0.0, 0.0, 1.0),
            Agent::new(1, 1.0, 0.0, 0.0, 1.0),
            Agent::new(2, 0.0, 1.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn hand_computed_triangle_without_boundary() {
        let pop = triangle();
        let p = params(Weights::uniform(), 100.0, 100.0, 0.0);

        // Agent 0: sep (-1,-1), align (1,0), coh (0.5,0.5) -> (0.5,-0.5)
        let rules = rule_vectors(&pop[0], &pop[1..], &p).unwrap();
        assert_eq!(rules.separation, Vector2D::new(-1.0, -1.0));
        assert_eq!(rules.alignment, Vector2D::new(1.0, 0.0));
        assert_eq!(rules.cohesion, Vector2D::new(0.5, 0.5));
        assert_eq!(rules.boundary, Vector2D::ZERO);
        let heading = steer(&pop[0], &pop[1..], &p);
        assert!((heading - (TAU - FRAC_PI_4)).abs() < EPS, "heading={}", heading);

        // Agent 1: sep (2,-1), align (1,0), coh (-1,0.5) -> (2,-0.5)
        let others = [pop[0], pop[2]];
        let heading = steer(&pop[1], &others, &p);
        let expected = (-0.5f64).atan2(2.0) + TAU;
        assert!((heading - expected).abs() < EPS);

        // Agent 2: sep (-1,2), align (1,0), coh (0.5,-1) -> (0.5,1)
        let others = [pop[0], pop[1]];
        let rules = rule_vectors(&pop[2], &others, &p).unwrap();
        assert_eq!(rules.separation, Vector2D::new(-1.0, 2.0));
        assert_eq!(rules.cohesion, Vector2D::new(0.5, -1.0));
        let heading = steer(&pop[2], &others, &p);
        let expected = 1.0f64.atan2(0.5);
        assert!((heading - expected).abs() < EPS);
    }

    #[test]
    fn hand_computed_triangle_with_boundary() {
        let pop = triangle();
        // Agent 0 sits in the bottom-left corner band: boundary (1,1)
        let p = params(Weights::uniform(), 100.0, 100.0, 10.0);
        let heading = steer(&pop[0], &pop[1..], &p);
        let expected = 0.5f64.atan2(1.5);
        assert!((heading - expected).abs() < EPS);
    }

    #[test]
    fn empty_neighbors_keep_heading() {
        let a = Agent::new(0, 50.0, 50.0, 2.5, 1.0);
        let p = params(Weights::default(), 100.0, 100.0, 30.0);
        assert_eq!(steer(&a, std::iter::empty(), &p), 2.5);
        assert!(rule_vectors(&a, std::iter::empty(), &p).is_none());
    }

    #[test]
    fn boundary_band_per_edge() {
        let p = params(Weights::default(), 300.0, 300.0, 100.0);
        let at = |x, y| boundary_avoidance(&Agent::new(0, x, y, 0.0, 1.0), &p);

        assert_eq!(at(150.0, 150.0), Vector2D::ZERO);
        assert_eq!(at(10.0, 150.0), Vector2D::new(1.0, 0.0));
        assert_eq!(at(290.0, 150.0), Vector2D::new(-1.0, 0.0));
        assert_eq!(at(150.0, 10.0), Vector2D::new(0.0, 1.0));
        assert_eq!(at(150.0, 290.0), Vector2D::new(0.0, -1.0));
        assert_eq!(at(-50.0, 400.0), Vector2D::new(1.0, -1.0));
    }

    #[test]
    fn boundary_only_heading() {
        // Pure boundary vector (1,0) points along heading 0
        let p = params(Weights::new(0.0, 0.0, 0.0, 1.0), 300.0, 300.0, 100.0);
        let target = Agent::new(0, 5.0, 150.0, 3.0, 1.0);
        assert_eq!(boundary_avoidance(&target, &p), Vector2D::new(1.0, 0.0));
        assert_eq!(boundary_avoidance(&target, &p).heading(), 0.0);

        // With every neighbour rule weighted out, only the boundary steers
        let other = Agent::new(1, 20.0, 170.0, 1.0, 1.0);
        assert_eq!(steer(&target, [&other], &p), 0.0);

        let top_left = Agent::new(2, 5.0, 5.0, 3.0, 1.0);
        assert!((steer(&top_left, [&other], &p) - FRAC_PI_4).abs() < EPS);
    }

    #[test]
    fn cancelling_contributions_give_zero_heading() {
        // Mirrored neighbours: separation and cohesion cancel exactly
        let target = Agent::new(0, 50.0, 50.0, 1.0, 1.0);
        let left = Agent::new(1, 40.0, 50.0, 0.0, 1.0);
        let right = Agent::new(2, 60.0, 50.0, PI, 1.0);
        let p = params(Weights::new(1.0, 0.0, 1.0, 1.0), 100.0, 100.0, 0.0);
        let rules = rule_vectors(&target, [&left, &right], &p).unwrap();
        assert!(rules.combine(&p.weights).length() < 1e-12);
        assert_eq!(steer(&target, [&left, &right], &p), 0.0);
    }

    #[test]
    fn params_follow_config() {
        let cfg = FlockConfig {
            turn_fraction: 0.5,
            ..FlockConfig::default().with_bounds(80.0, 40.0)
        };
        let p = SteeringParams::from(&cfg);
        assert_eq!(p.turn_margin, (40.0, 20.0));
        assert_eq!(p.perception_radius, cfg.perception_radius);
        assert_eq!(p.weights, cfg.weights);
    }
}
