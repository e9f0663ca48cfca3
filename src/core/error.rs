use thiserror::Error;

/// Errors raised by the flocking engine.
///
/// Configuration problems surface at construction time. Once a run has
/// started, the only fallible step is a frame dispatch.
#[derive(Debug, Error)]
pub enum FlockError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("population buffer has {found} agents, scheduler expects {expected}")]
    PopulationMismatch { expected: usize, found: usize },

    /// A worker task panicked. The whole frame is discarded.
    #[error("worker for partition {partition} failed: {message}")]
    WorkerFailure { partition: usize, message: String },

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FlockError>;

impl FlockError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        FlockError::InvalidConfiguration(msg.into())
    }
}
