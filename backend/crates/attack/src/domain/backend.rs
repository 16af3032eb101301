//! Simulation Backend Contract
//!
//! A backend executes a circuit description for a shot count and returns a
//! histogram of outcome bit-strings whose counts sum to the shot count.
//! Outcome strings put the highest lane leftmost.

use crate::domain::circuit::CircuitDescription;
use crate::domain::entities::Histogram;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("circuit needs {requested} qubits but the backend supports at most {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    #[error("shot count must be positive")]
    InvalidShots,

    #[error("unsupported circuit: {0}")]
    Unsupported(String),

    #[error("histogram totals {total} counts, expected {expected}")]
    InconsistentCounts { total: u64, expected: u32 },

    #[error("simulation worker failed: {0}")]
    Worker(String),
}

impl BackendError {
    /// Failures worth retrying with the same circuit
    pub fn is_transient(&self) -> bool {
        matches!(self, BackendError::Worker(_))
    }
}

/// Simulation backend
#[trait_variant::make(SimulationBackend: Send)]
pub trait LocalSimulationBackend {
    /// Execute `circuit` `shots` times and count the outcomes
    async fn run(&self, circuit: &CircuitDescription, shots: u32)
    -> Result<Histogram, BackendError>;
}

/// Exponential backoff for transient backend failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(200),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (zero-based)
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = self.multiplier.saturating_pow(retry);
        self.initial_backoff.saturating_mul(factor)
    }
}
