//! Attack Router

use crate::application::config::AttackConfig;
use crate::domain::backend::SimulationBackend;
use crate::presentation::handlers::{self, AttackAppState};
use axum::{
    Router,
    routing::{get, post},
};

/// Create the attack router for any simulation backend
pub fn attack_router<B>(backend: B, config: AttackConfig) -> Router
where
    B: SimulationBackend + Send + Sync + 'static,
{
    attack_router_with_state(AttackAppState::new(backend, config))
}

/// Create the attack router around existing state
///
/// Callers keep a clone of `state` to reach the registry, e.g. for purging.
pub fn attack_router_with_state<B>(state: AttackAppState<B>) -> Router
where
    B: SimulationBackend + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(handlers::root))
        .route("/cifrado", get(handlers::issue_key::<B>))
        .route("/cifrar-texto", post(handlers::encrypt_text))
        .route("/ataque", post(handlers::attack::<B>))
        .route("/cancel", get(handlers::cancel::<B>))
        .route("/ataques", post(handlers::start_run::<B>))
        .route("/ataques/{run_id}", get(handlers::run_status::<B>))
        .route("/ataques/{run_id}/cancel", post(handlers::cancel_run::<B>))
        .with_state(state)
}
