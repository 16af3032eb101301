//! Attack Error Types
//!
//! Attack-specific failures. They map onto `kernel::error::kind::ErrorKind`
//! and convert into `AppError` for the run endpoints. The compatibility
//! endpoints render them as `{"error": ...}` bodies.

use crate::domain::backend::BackendError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::id::RunId;
use platform::codec::CodecError;
use thiserror::Error;

pub type AttackResult<T> = Result<T, AttackError>;

#[derive(Debug, Error)]
pub enum AttackError {
    /// Malformed transport payload (only surfaced under the `Reject` policy)
    #[error("Clave cifrada inválida: {0}")]
    Decode(#[from] CodecError),

    #[error("La clave cifrada está vacía")]
    EmptyKey,

    /// Key longer than the qubit budget
    #[error("El circuito cuántico no puede superar {max} qubits (la clave tiene {len} bits)")]
    SizeExceeded { len: usize, max: usize },

    #[error("Error en la simulación cuántica: {0}")]
    Backend(#[from] BackendError),

    #[error("Ejecución no encontrada: {0}")]
    RunNotFound(RunId),

    #[error("La ejecución {0} ya ha finalizado")]
    RunFinished(RunId),
}

impl AttackError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AttackError::Decode(_) => ErrorKind::BadRequest,
            AttackError::EmptyKey | AttackError::SizeExceeded { .. } => {
                ErrorKind::UnprocessableEntity
            }
            AttackError::Backend(_) => ErrorKind::BadGateway,
            AttackError::RunNotFound(_) => ErrorKind::NotFound,
            AttackError::RunFinished(_) => ErrorKind::Conflict,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn log(&self) {
        match self {
            AttackError::Backend(e) => {
                tracing::error!(error = %e, "Quantum simulation failed");
            }
            AttackError::SizeExceeded { len, max } => {
                tracing::warn!(len, max, "Key exceeds qubit budget");
            }
            _ => {
                tracing::debug!(error = %self, "Attack error");
            }
        }
    }
}

impl From<AttackError> for AppError {
    fn from(err: AttackError) -> Self {
        err.log();
        let kind = err.kind();
        let message = err.to_string();
        match err {
            AttackError::RunNotFound(_) => {
                AppError::new(kind, message).with_action("Start a new run with POST /ataques")
            }
            AttackError::Decode(source) => AppError::new(kind, message).with_source(source),
            AttackError::Backend(source) => AppError::new(kind, message).with_source(source),
            _ => AppError::new(kind, message),
        }
    }
}

impl IntoResponse for AttackError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
