//! API DTOs (Data Transfer Objects)
//!
//! Field names and messages of the compatibility endpoints are part of the
//! wire contract and stay in Spanish.

use crate::domain::entities::{AttackReport, AttackRun, CancelReason, Histogram, RunStatus};
use crate::domain::services::{format_elapsed, format_timestamp};
use chrono::{DateTime, Utc};
use kernel::id::RunId;
use serde::{Deserialize, Serialize};

pub const ROOT_MESSAGE: &str = "API de Ataque Cuántico funcionando correctamente";
pub const CANCELLED_MESSAGE: &str = "Ataque cancelado por el usuario.";
pub const CANCEL_ACK_MESSAGE: &str = "El ataque cuántico ha sido cancelado.";

/// Request for POST /ataque and POST /ataques
#[derive(Debug, Clone, Deserialize)]
pub struct CiphertextRequest {
    pub ciphertext: String,
}

/// Request for POST /cifrar-texto
#[derive(Debug, Clone, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Response for GET /cifrado and POST /cifrar-texto
#[derive(Debug, Clone, Serialize)]
pub struct CiphertextResponse {
    pub ciphertext: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Cancellation acknowledgement of POST /ataque
///
/// `error` carries a simulation failure that preceded the cancellation.
#[derive(Debug, Clone, Serialize)]
pub struct CancelledResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&CancelReason> for CancelledResponse {
    fn from(reason: &CancelReason) -> Self {
        Self {
            message: CANCELLED_MESSAGE.to_string(),
            error: reason.failure().map(str::to_string),
        }
    }
}

/// Successful POST /ataque
#[derive(Debug, Clone, Serialize)]
pub struct AttackResponse {
    pub ciphertext: String,
    pub attack_results: Histogram,
    pub execution_time: String,
    pub start_time: String,
    pub end_time: String,
    pub decrypted_key: String,
}

impl From<&AttackReport> for AttackResponse {
    fn from(report: &AttackReport) -> Self {
        Self {
            ciphertext: report.ciphertext.clone(),
            attack_results: report.histogram.clone(),
            execution_time: format_elapsed(report.elapsed()),
            start_time: format_timestamp(&report.started_at),
            end_time: format_timestamp(&report.finished_at),
            decrypted_key: report.decrypted_key.clone(),
        }
    }
}

/// Response for POST /ataques
#[derive(Debug, Clone, Serialize)]
pub struct RunAcceptedResponse {
    pub run_id: RunId,
}

/// Response for GET /ataques/{run_id}
#[derive(Debug, Clone, Serialize)]
pub struct RunStatusResponse {
    pub run_id: RunId,
    pub status: &'static str,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AttackResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&AttackRun> for RunStatusResponse {
    fn from(run: &AttackRun) -> Self {
        let (result, message, error) = match &run.status {
            RunStatus::Running => (None, None, None),
            RunStatus::Completed(report) => (Some(AttackResponse::from(report.as_ref())), None, None),
            RunStatus::Cancelled(reason) => (
                None,
                Some(CANCELLED_MESSAGE.to_string()),
                reason.failure().map(str::to_string),
            ),
            RunStatus::Failed(error) => (None, None, Some(error.clone())),
        };

        Self {
            run_id: run.id,
            status: run.status.as_str(),
            created_at: run.created_at,
            finished_at: run.finished_at,
            result,
            message,
            error,
        }
    }
}
