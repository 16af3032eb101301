//! HTTP Handlers

use crate::application::config::AttackConfig;
use crate::application::encrypt::{encrypt_text as encrypt, issue_key as issue};
use crate::application::run_attack::RunAttackUseCase;
use crate::application::runs::{RunRegistry, StartRunUseCase};
use crate::domain::backend::SimulationBackend;
use crate::domain::cancellation::CancelFlag;
use crate::domain::entities::AttackOutcome;
use crate::error::AttackError;
use crate::presentation::dto::{
    AttackResponse, CANCEL_ACK_MESSAGE, CancelledResponse, CiphertextRequest, CiphertextResponse,
    ErrorResponse, MessageResponse, ROOT_MESSAGE, RunAcceptedResponse, RunStatusResponse,
    TextRequest,
};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppResult;
use kernel::id::RunId;
use std::sync::Arc;

/// Shared state for attack handlers
pub struct AttackAppState<B>
where
    B: SimulationBackend + Send + Sync + 'static,
{
    pub backend: Arc<B>,
    pub config: Arc<AttackConfig>,
    /// Process-wide flag behind GET /cancel
    pub cancel_flag: CancelFlag,
    pub registry: RunRegistry,
}

impl<B> AttackAppState<B>
where
    B: SimulationBackend + Send + Sync + 'static,
{
    pub fn new(backend: B, config: AttackConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            config: Arc::new(config),
            cancel_flag: CancelFlag::new(),
            registry: RunRegistry::new(),
        }
    }
}

// Not derived: the backend sits behind an `Arc` and need not be `Clone`.
impl<B> Clone for AttackAppState<B>
where
    B: SimulationBackend + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            config: self.config.clone(),
            cancel_flag: self.cancel_flag.clone(),
            registry: self.registry.clone(),
        }
    }
}

/// GET /
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(ROOT_MESSAGE))
}

/// GET /cifrado
pub async fn issue_key<B>(State(state): State<AttackAppState<B>>) -> Json<CiphertextResponse>
where
    B: SimulationBackend + Send + Sync + 'static,
{
    Json(CiphertextResponse {
        ciphertext: issue(state.config.issued_key_bits),
    })
}

/// POST /cifrar-texto
pub async fn encrypt_text(Json(req): Json<TextRequest>) -> Json<CiphertextResponse> {
    Json(CiphertextResponse {
        ciphertext: encrypt(&req.text),
    })
}

/// POST /ataque
///
/// Runs to completion inside the request. Cancelled through GET /cancel.
pub async fn attack<B>(
    State(state): State<AttackAppState<B>>,
    Json(req): Json<CiphertextRequest>,
) -> Response
where
    B: SimulationBackend + Send + Sync + 'static,
{
    // A stale cancel from an earlier attack must not abort this one.
    state.cancel_flag.clear();

    let use_case = RunAttackUseCase::new(state.backend.clone(), state.config.clone());

    match use_case.execute(&req.ciphertext, &state.cancel_flag).await {
        Ok(AttackOutcome::Completed(report)) => Json(AttackResponse::from(&report)).into_response(),
        Ok(AttackOutcome::Cancelled(reason)) => {
            Json(CancelledResponse::from(&reason)).into_response()
        }
        // Simulation failures are reported in the body of a 200.
        Err(e @ AttackError::Backend(_)) => {
            tracing::error!(error = %e, "Quantum simulation failed");
            Json(ErrorResponse {
                error: e.to_string(),
            })
            .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// GET /cancel
pub async fn cancel<B>(State(state): State<AttackAppState<B>>) -> Json<MessageResponse>
where
    B: SimulationBackend + Send + Sync + 'static,
{
    state.cancel_flag.signal();
    tracing::info!("Cancellation requested");
    Json(MessageResponse::new(CANCEL_ACK_MESSAGE))
}

/// POST /ataques
pub async fn start_run<B>(
    State(state): State<AttackAppState<B>>,
    Json(req): Json<CiphertextRequest>,
) -> (StatusCode, Json<RunAcceptedResponse>)
where
    B: SimulationBackend + Send + Sync + 'static,
{
    let use_case = StartRunUseCase::new(
        state.backend.clone(),
        state.config.clone(),
        state.registry.clone(),
    );

    let run_id = use_case.start(req.ciphertext);

    (StatusCode::ACCEPTED, Json(RunAcceptedResponse { run_id }))
}

/// GET /ataques/{run_id}
pub async fn run_status<B>(
    State(state): State<AttackAppState<B>>,
    Path(run_id): Path<RunId>,
) -> AppResult<Json<RunStatusResponse>>
where
    B: SimulationBackend + Send + Sync + 'static,
{
    let run = state
        .registry
        .get(run_id)
        .ok_or(AttackError::RunNotFound(run_id))?;

    Ok(Json(RunStatusResponse::from(&run)))
}

/// POST /ataques/{run_id}/cancel
pub async fn cancel_run<B>(
    State(state): State<AttackAppState<B>>,
    Path(run_id): Path<RunId>,
) -> AppResult<Json<MessageResponse>>
where
    B: SimulationBackend + Send + Sync + 'static,
{
    state.registry.cancel(run_id)?;
    Ok(Json(MessageResponse::new(CANCEL_ACK_MESSAGE)))
}
