use super::error::{FlockError, Result};
use serde::{Deserialize, Serialize};

/// Relative weights of the four steering rules.
///
/// The raw rule vectors have very different natural magnitudes (separation
/// grows with pixel distances, alignment is at most a unit vector), so the
/// weights span several orders of magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub separation: f64,
    pub alignment: f64,
    pub cohesion: f64,
    pub boundary: f64,
}

impl Weights {
    pub fn new(separation: f64, alignment: f64, cohesion: f64, boundary: f64) -> Self {
        Weights {
            separation,
            alignment,
            cohesion,
            boundary,
        }
    }

    /// Every rule weighted equally at 1.0
    pub fn uniform() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            separation: 0.01,
            alignment: 20.0,
            cohesion: 0.01,
            boundary: 20.0,
        }
    }
}

/// Visible screen area, in the same units as agent coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenBounds {
    pub width: f64,
    pub height: f64,
}

impl ScreenBounds {
    pub fn new(width: f64, height: f64) -> Self {
        ScreenBounds { width, height }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }

    fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(FlockError::invalid(format!(
                "screen width must be positive, got {}",
                self.width
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(FlockError::invalid(format!(
                "screen height must be positive, got {}",
                self.height
            )));
        }
        Ok(())
    }
}

impl Default for ScreenBounds {
    fn default() -> Self {
        ScreenBounds {
            width: 1000.0,
            height: 1000.0,
        }
    }
}

/// Numeric parameters of a flocking run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockConfig {
    /// Number of agents, fixed for the lifetime of the run
    pub population: usize,
    /// Agents closer than this are neighbours. Zero disables flocking.
    pub perception_radius: f64,
    /// Pixels travelled per tick
    pub speed: f64,
    pub weights: Weights,
    pub bounds: ScreenBounds,
    /// Width of the boundary-avoidance band, as a fraction of each screen dimension
    pub turn_fraction: f64,
    /// Size of the worker pool (and number of index partitions per frame)
    pub workers: usize,
    /// Inward offset applied to spawn positions
    pub spawn_margin: f64,
    pub sprite_width: u32,
    pub sprite_height: u32,
    /// Number of pre-rotated sprite images the renderer holds
    pub rotation_frames: u32,
    /// Target frames per second for `run`; 0 runs unpaced
    pub frame_rate: u32,
}

impl Default for FlockConfig {
    fn default() -> Self {
        FlockConfig {
            population: 1600,
            perception_radius: 70.0,
            speed: 15.0,
            weights: Weights::default(),
            bounds: ScreenBounds::default(),
            turn_fraction: 1.0 / 3.0,
            workers: 8,
            spawn_margin: 20.0,
            sprite_width: 20,
            sprite_height: 20,
            rotation_frames: 360,
            frame_rate: 144,
        }
    }
}

impl FlockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: FlockConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_population(mut self, population: usize) -> Self {
        self.population = population;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_bounds(mut self, width: f64, height: f64) -> Self {
        self.bounds = ScreenBounds::new(width, height);
        self
    }

    pub fn with_perception_radius(mut self, radius: f64) -> Self {
        self.perception_radius = radius;
        self
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    /// Boundary-avoidance band on each axis, in screen units.
    pub fn turn_margin(&self) -> (f64, f64) {
        (
            self.bounds.width * self.turn_fraction,
            self.bounds.height * self.turn_fraction,
        )
    }

    /// Reject parameters the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.population == 0 {
            return Err(FlockError::invalid("population must be at least 1"));
        }
        if u32::try_from(self.population).is_err() {
            return Err(FlockError::invalid(format!(
                "population {} exceeds the agent identity range",
                self.population
            )));
        }
        if self.workers == 0 {
            return Err(FlockError::invalid("worker pool needs at least 1 thread"));
        }
        if !(self.perception_radius.is_finite() && self.perception_radius >= 0.0) {
            return Err(FlockError::invalid(format!(
                "perception radius must be finite and non-negative, got {}",
                self.perception_radius
            )));
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(FlockError::invalid(format!(
                "speed must be positive, got {}",
                self.speed
            )));
        }
        self.bounds.validate()?;
        if !(0.0..=1.0).contains(&self.turn_fraction) {
            return Err(FlockError::invalid(format!(
                "turn fraction must lie in [0, 1], got {}",
                self.turn_fraction
            )));
        }
        if !(self.spawn_margin.is_finite() && self.spawn_margin >= 0.0) {
            return Err(FlockError::invalid("spawn margin must be non-negative"));
        }
        if self.rotation_frames == 0 {
            return Err(FlockError::invalid("rotation frames must be at least 1"));
        }
        let w = &self.weights;
        if ![w.separation, w.alignment, w.cohesion, w.boundary]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(FlockError::invalid(format!("weights must be finite, got {:?}", w)));
        }
        Ok(())
    }
}
