//! Quantum Brute-Force Attack Simulator
//!
//! Clean Architecture structure:
//! - `domain/` - Key, circuit model, cancellation signals, backend contract
//! - `application/` - Attack orchestrator, run registry, configuration
//! - `infra/` - Stabilizer simulator and the retrying backend wrapper
//! - `presentation/` - HTTP handlers, DTOs and router
//!
//! ## Attack Model
//! - The decoded key is a bit-string; each bit is one qubit lane (at most 29)
//! - Every attempt builds a fresh circuit; only the last one is simulated
//! - Cancellation is cooperative and polled between attempts

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AttackConfig, AttemptPolicy, FailurePolicy};
pub use application::run_attack::RunAttackUseCase;
pub use application::runs::RunRegistry;
pub use domain::backend::SimulationBackend;
pub use domain::value_objects::MAX_QUBITS;
pub use error::{AttackError, AttackResult};
pub use infra::retry::RetryingBackend;
pub use infra::stabilizer::StabilizerBackend;
pub use presentation::handlers::AttackAppState;
pub use presentation::router::{attack_router, attack_router_with_state};
