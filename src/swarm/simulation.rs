//! Frame Driver
//!
//! Owns the two population buffers and the scheduler. Each frame reads the
//! current buffer, fills the scratch buffer in parallel, and swaps the two
//! once the barrier has released. The renderer only ever sees a buffer from
//! a completed frame.

use super::scheduler::{FrameReport, FrameScheduler};
use super::sprite::SpriteTable;
use super::steering::SteeringParams;
use super::vector::Vector2D;
use crate::core::agent::{ensure_unique_ids, ensure_valid_agents, spawn_population};
use crate::core::{Agent, FlockConfig, FlockError, Result, ScreenBounds};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Cloneable flag asking a running simulation to stop after the frame in flight.
///
/// Once raised the flag stays up until `resume` is called, so a stop issued
/// before `run` starts is still honoured.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Clear a previous stop so `run` may start again.
    pub fn resume(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Population-level snapshot of a completed frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlockMetrics {
    pub frame: u64,
    pub population: usize,
    /// Mean agent position
    pub centroid: Vector2D,
    /// Length of the mean unit heading: 1.0 when every agent flies the same way
    pub polarization: f64,
    /// Agents currently inside the screen bounds
    pub visible: usize,
}

pub struct FlockSimulation {
    config: FlockConfig,
    current: Vec<Agent>,
    scratch: Vec<Agent>,
    scheduler: FrameScheduler,
    sprites: SpriteTable,
    frame: u64,
    stop: StopHandle,
}

impl FlockSimulation {
    /// Spawn a random population from OS entropy.
    pub fn new(config: FlockConfig) -> Result<Self> {
        Self::with_rng(config, &mut StdRng::from_entropy())
    }

    /// Spawn a reproducible population.
    pub fn with_seed(config: FlockConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, &mut StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: FlockConfig, rng: &mut StdRng) -> Result<Self> {
        config.validate()?;
        info!(
            "🐦 [Flock] Spawning {} agents on a {}x{} screen...",
            config.population, config.bounds.width, config.bounds.height
        );
        let agents = spawn_population(&config, rng);
        Self::assemble(config, agents)
    }

    /// Run a caller-supplied population. `config.population` is taken from
    /// the number of agents.
    pub fn from_agents(mut config: FlockConfig, agents: Vec<Agent>) -> Result<Self> {
        config.population = agents.len();
        config.validate()?;
        ensure_unique_ids(&agents)?;
        ensure_valid_agents(&agents)?;
        Self::assemble(config, agents)
    }

    fn assemble(config: FlockConfig, agents: Vec<Agent>) -> Result<Self> {
        let scheduler = FrameScheduler::new(config.workers, agents.len())?;
        let sprites = SpriteTable::new(&agents, config.rotation_frames);
        Ok(FlockSimulation {
            scratch: vec![Agent::default(); agents.len()],
            current: agents,
            scheduler,
            sprites,
            frame: 0,
            stop: StopHandle::default(),
            config,
        })
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    /// Latest completed snapshot
    pub fn agents(&self) -> &[Agent] {
        &self.current
    }

    pub fn sprites(&self) -> &SpriteTable {
        &self.sprites
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// New screen size, applied from the next frame on.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        let mut next = self.config.clone();
        next.bounds = ScreenBounds::new(width, height);
        next.validate()?;
        info!("📐 [Flock] Screen resized to {}x{}", width, height);
        self.config = next;
        Ok(())
    }

    /// Advance every agent by one tick.
    ///
    /// If a worker fails the frame is skipped: the buffers are not swapped,
    /// the frame counter does not move, and the previous snapshot stays
    /// current.
    pub fn step_frame(&mut self) -> Result<FrameReport> {
        let params = SteeringParams::from(&self.config);
        let report = match self
            .scheduler
            .dispatch(&self.current, &mut self.scratch, &params)
        {
            Ok(report) => report,
            Err(e) => {
                warn!("⚠️ [Flock] Skipping frame {}: {}", self.frame + 1, e);
                return Err(e);
            }
        };

        std::mem::swap(&mut self.current, &mut self.scratch);
        let (sprites, current) = (&mut self.sprites, &self.current);
        self.scheduler.install(|| sprites.update(current));
        self.frame += 1;
        Ok(report)
    }

    /// Step up to `max_frames` frames (or until stopped when `None`), handing
    /// each completed snapshot to `on_frame`. Frames are paced to
    /// `config.frame_rate` when it is non-zero.
    ///
    /// Returns the number of frames completed by this call. Returns at once
    /// with 0 if the stop handle is already raised.
    pub fn run<F>(&mut self, max_frames: Option<u64>, mut on_frame: F) -> Result<u64>
    where
        F: FnMut(&[Agent], &SpriteTable),
    {
        let interval = match self.config.frame_rate {
            0 => None,
            fps => Some(Duration::from_secs_f64(1.0 / fps as f64)),
        };

        let mut done = 0u64;
        while max_frames.map_or(true, |max| done < max) && !self.stop.is_stopped() {
            let started = Instant::now();
            self.step_frame()?;
            done += 1;
            on_frame(&self.current, &self.sprites);

            if let Some(interval) = interval {
                if let Some(rest) = interval.checked_sub(started.elapsed()) {
                    std::thread::sleep(rest);
                }
            }
        }

        info!("🏁 [Flock] Run finished after {} frames", done);
        Ok(done)
    }

    pub fn metrics(&self) -> FlockMetrics {
        let n = self.current.len();
        let mut position_sum = Vector2D::ZERO;
        let mut heading_sum = Vector2D::ZERO;
        let mut visible = 0;

        for a in &self.current {
            position_sum += Vector2D::new(a.x, a.y);
            heading_sum += Vector2D::from_angle(a.direction);
            if self.config.bounds.contains(a.x, a.y) {
                visible += 1;
            }
        }

        let (centroid, polarization) = if n == 0 {
            (Vector2D::ZERO, 0.0)
        } else {
            (position_sum / n as f64, (heading_sum / n as f64).length())
        };

        FlockMetrics {
            frame: self.frame,
            population: n,
            centroid,
            polarization,
            visible,
        }
    }
}

impl std::fmt::Debug for FlockSimulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlockSimulation")
            .field("population", &self.current.len())
            .field("workers", &self.scheduler.workers())
            .field("frame", &self.frame)
            .finish()
    }
}

impl TryFrom<FlockConfig> for FlockSimulation {
    type Error = FlockError;

    fn try_from(config: FlockConfig) -> Result<Self> {
        FlockSimulation::new(config)
    }
}
