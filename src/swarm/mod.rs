//! Flocking Engine
//!
//! Brute-force neighbour search, the four steering rules, and a double-buffered
//! frame update spread over a fixed worker pool.

pub mod neighbors;
pub mod scheduler;
pub mod simulation;
pub mod sprite;
pub mod steering;
pub mod stepper;
pub mod vector;

#[cfg(feature = "python")]
pub mod py_api;

mod scale_test;

pub use neighbors::{neighbors, neighbors_into};
pub use scheduler::{partition, FrameReport, FrameScheduler};
pub use simulation::{FlockMetrics, FlockSimulation, StopHandle};
pub use sprite::{rotation_frame, SpriteTable, SpriteTrack};
pub use steering::{boundary_avoidance, steer, SteeringParams};
pub use stepper::step;
pub use vector::Vector2D;
