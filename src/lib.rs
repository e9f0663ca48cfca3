//! termflock core - Parallel Boids Flocking Engine
//!
//! Simulates a flock of agents on a bounded 2D screen. Every frame each agent
//! looks at its neighbours inside a perception radius, steers by separation,
//! alignment, cohesion and boundary avoidance, and advances at constant speed.
//! Frames are computed in parallel into a second buffer and published by swap.

pub mod core;
pub mod swarm;

// Re-export key types
pub use core::{Agent, FlockConfig, FlockError, Result, ScreenBounds, Weights};
pub use swarm::{FlockMetrics, FlockSimulation, FrameReport, FrameScheduler, StopHandle};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Initialize tracing for the library. Defaults to `info`.
pub fn setup_logging(level: Option<&str>) {
    let filter = level.unwrap_or("info");
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Python module initialization
#[cfg(feature = "python")]
#[pymodule]
fn termflock_core(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<swarm::py_api::PyFlock>()?;
    m.add_function(wrap_pyfunction!(swarm::py_api::py_setup_logging, m)?)?;
    Ok(())
}
