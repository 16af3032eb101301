//! Domain Entities

use chrono::{DateTime, Local, TimeDelta, Utc};
use kernel::id::RunId;
use std::collections::BTreeMap;

/// Outcome bit-string → occurrence count
pub type Histogram = BTreeMap<String, u32>;

/// Result of an attack that ran to completion. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackReport {
    pub ciphertext: String,
    /// Decoded key, reported verbatim
    pub decrypted_key: String,
    pub histogram: Histogram,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub attempts: u64,
}

impl AttackReport {
    pub fn elapsed(&self) -> TimeDelta {
        self.finished_at - self.started_at
    }
}

/// Why an attack stopped without a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelReason {
    /// Cancelled during the attempt loop
    Requested,
    /// Cancelled while waiting after an undecodable payload
    AfterDecodeFailure,
    /// Cancelled while waiting after the backend failed
    AfterBackendFailure(String),
}

impl CancelReason {
    /// Failure that preceded the cancellation, if any
    pub fn failure(&self) -> Option<&str> {
        match self {
            CancelReason::AfterBackendFailure(msg) => Some(msg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttackOutcome {
    Completed(AttackReport),
    Cancelled(CancelReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed(Box<AttackReport>),
    Cancelled(CancelReason),
    Failed(String),
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::Completed(_) => "completed",
            RunStatus::Cancelled(_) => "cancelled",
            RunStatus::Failed(_) => "failed",
        }
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self, RunStatus::Running)
    }
}

impl<E: std::fmt::Display> From<Result<AttackOutcome, E>> for RunStatus {
    fn from(outcome: Result<AttackOutcome, E>) -> Self {
        match outcome {
            Ok(AttackOutcome::Completed(report)) => RunStatus::Completed(Box::new(report)),
            Ok(AttackOutcome::Cancelled(reason)) => RunStatus::Cancelled(reason),
            Err(e) => RunStatus::Failed(e.to_string()),
        }
    }
}

/// A registered, spawned attack
#[derive(Debug, Clone)]
pub struct AttackRun {
    pub id: RunId,
    pub status: RunStatus,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl AttackRun {
    pub fn new() -> Self {
        Self {
            id: RunId::new(),
            status: RunStatus::Running,
            created_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn finish(&mut self, status: RunStatus) {
        self.status = status;
        self.finished_at = Some(Utc::now());
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }
}

impl Default for AttackRun {
    fn default() -> Self {
        Self::new()
    }
}
