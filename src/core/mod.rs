//! Core types shared by the engine: agents, configuration and errors.

pub mod agent;
pub mod config;
pub mod error;

pub use agent::Agent;
pub use config::{FlockConfig, ScreenBounds, Weights};
pub use error::{FlockError, Result};
