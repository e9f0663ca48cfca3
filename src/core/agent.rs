use super::config::FlockConfig;
use super::error::{FlockError, Result};
use rand::Rng;
use std::collections::HashSet;
use std::f64::consts::TAU;

/// One boid.
///
/// `id` is the only key used to tell an agent apart from its neighbours.
/// Width and height are rendering hints and never enter the steering math.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Agent {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    /// Heading in radians, kept in `[0, 2π)`
    pub direction: f64,
    /// Pixels per tick
    pub speed: f64,
    pub width: u32,
    pub height: u32,
}

impl Agent {
    /// Identity carried by a slot that has never been written.
    pub const UNASSIGNED: u32 = u32::MAX;

    pub fn new(id: u32, x: f64, y: f64, direction: f64, speed: f64) -> Self {
        Agent {
            id,
            x,
            y,
            direction,
            speed,
            width: 0,
            height: 0,
        }
    }

    /// Place an agent at a random point of the visible area, pulled inward by
    /// the spawn margin, with a uniformly random heading.
    pub fn spawn<R: Rng + ?Sized>(id: u32, cfg: &FlockConfig, rng: &mut R) -> Self {
        Agent {
            id,
            x: spawn_coordinate(cfg.bounds.width, cfg.spawn_margin, rng),
            y: spawn_coordinate(cfg.bounds.height, cfg.spawn_margin, rng),
            direction: rng.gen_range(0.0..TAU),
            speed: cfg.speed,
            width: cfg.sprite_width,
            height: cfg.sprite_height,
        }
    }

    #[inline]
    pub fn squared_distance(&self, other: &Agent) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl Default for Agent {
    fn default() -> Self {
        Agent {
            id: Agent::UNASSIGNED,
            x: 0.0,
            y: 0.0,
            direction: 0.0,
            speed: 0.0,
            width: 0,
            height: 0,
        }
    }
}

fn spawn_coordinate<R: Rng + ?Sized>(extent: f64, margin: f64, rng: &mut R) -> f64 {
    // Screens narrower than two margins fall back to the full extent
    if extent > 2.0 * margin {
        margin + rng.gen::<f64>() * (extent - 2.0 * margin)
    } else {
        rng.gen::<f64>() * extent
    }
}

/// Spawn a full population. Identities coincide with indices.
pub fn spawn_population<R: Rng + ?Sized>(cfg: &FlockConfig, rng: &mut R) -> Vec<Agent> {
    (0..cfg.population as u32)
        .map(|id| Agent::spawn(id, cfg, rng))
        .collect()
}

/// Check that no two agents share an identity.
pub fn ensure_unique_ids(agents: &[Agent]) -> Result<()> {
    let mut seen = HashSet::with_capacity(agents.len());
    for agent in agents {
        if agent.id == Agent::UNASSIGNED {
            return Err(FlockError::invalid("agent carries the unassigned identity"));
        }
        if !seen.insert(agent.id) {
            return Err(FlockError::invalid(format!(
                "duplicate agent identity {}",
                agent.id
            )));
        }
    }
    Ok(())
}

/// Check that every agent can be stepped: finite position, positive finite
/// speed and a heading already in `[0, 2π)`.
pub fn ensure_valid_agents(agents: &[Agent]) -> Result<()> {
    for a in agents {
        if !(a.x.is_finite() && a.y.is_finite()) {
            return Err(FlockError::invalid(format!(
                "agent {} has a non-finite position ({}, {})",
                a.id, a.x, a.y
            )));
        }
        if !(a.speed.is_finite() && a.speed > 0.0) {
            return Err(FlockError::invalid(format!(
                "agent {} speed must be positive, got {}",
                a.id, a.speed
            )));
        }
        if !(0.0..TAU).contains(&a.direction) {
            return Err(FlockError::invalid(format!(
                "agent {} heading must lie in [0, 2π), got {}",
                a.id, a.direction
            )));
        }
    }
    Ok(())
}
