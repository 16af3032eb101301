//! Run Attack Use Case
//!
//! The attack orchestrator. One call walks
//! `VALIDATING → RUNNING → {CANCELLED, COMPLETED, SIZE_ERROR, STUCK}`:
//!
//! 1. Decode the payload. On failure either reject or wait for a cancel,
//!    depending on [`AttackConfig::decode_failure`].
//! 2. Validate the key against the qubit budget.
//! 3. Attempt loop: check the signal, build a fresh circuit, count the
//!    attempt, pause. Ends on cancel or when the attempt policy is exhausted.
//! 4. Submit the last circuit to the backend exactly once.
//! 5. Stamp the end time and build the report.
//!
//! Cancellation is cooperative: the signal is polled between attempts and
//! on every tick of the waiting loops, never preempted.

use crate::application::config::{AttackConfig, FailurePolicy};
use crate::domain::backend::{BackendError, SimulationBackend};
use crate::domain::cancellation::CancellationSignal;
use crate::domain::circuit::{CircuitDescription, build_attempt_circuit};
use crate::domain::entities::{AttackOutcome, AttackReport, CancelReason, Histogram};
use crate::domain::services::{format_elapsed, format_timestamp, histogram_total};
use crate::domain::value_objects::Key;
use crate::error::{AttackError, AttackResult};
use chrono::Local;
use platform::codec::CodecError;
use std::sync::Arc;

/// Run Attack Use Case
pub struct RunAttackUseCase<B>
where
    B: SimulationBackend,
{
    backend: Arc<B>,
    config: Arc<AttackConfig>,
}

impl<B> RunAttackUseCase<B>
where
    B: SimulationBackend,
{
    pub fn new(backend: Arc<B>, config: Arc<AttackConfig>) -> Self {
        Self { backend, config }
    }

    /// Attack the base64 `ciphertext`, polling `cancel` cooperatively
    ///
    /// ## Returns
    /// * `Ok(AttackOutcome::Completed)` - attempt cap reached and simulated
    /// * `Ok(AttackOutcome::Cancelled)` - the signal was observed
    /// * `Err(AttackError::SizeExceeded | EmptyKey)` - invalid key, nothing simulated
    /// * `Err(AttackError::Decode | Backend)` - only under `FailurePolicy::Reject`
    pub async fn execute<C>(&self, ciphertext: &str, cancel: &C) -> AttackResult<AttackOutcome>
    where
        C: CancellationSignal + ?Sized,
    {
        let text = match platform::codec::decode_text(ciphertext) {
            Ok(text) => text,
            Err(e) => return self.on_decode_failure(e, cancel).await,
        };

        let key = Key::parse(text)?;

        let started_at = Local::now();
        tracing::info!(
            bits = key.len(),
            start_time = %format_timestamp(&started_at),
            "Attack started"
        );

        let Some((circuit, attempts)) = self.attempt_loop(&key, cancel).await else {
            tracing::info!("Attack cancelled");
            return Ok(AttackOutcome::Cancelled(CancelReason::Requested));
        };

        tracing::info!(
            qubits = circuit.num_qubits(),
            gates = circuit.len(),
            shots = self.config.shots,
            "Running quantum simulation"
        );

        let histogram = match self.simulate(&circuit).await {
            Ok(histogram) => histogram,
            Err(e) => return self.on_backend_failure(e, cancel).await,
        };

        let finished_at = Local::now();
        let report = AttackReport {
            ciphertext: ciphertext.to_string(),
            decrypted_key: key.as_str().to_string(),
            histogram,
            started_at,
            finished_at,
            attempts,
        };

        tracing::info!(
            start_time = %format_timestamp(&report.started_at),
            end_time = %format_timestamp(&report.finished_at),
            elapsed = %format_elapsed(report.elapsed()),
            attempts,
            outcomes = report.histogram.len(),
            "Attack finished"
        );

        Ok(AttackOutcome::Completed(report))
    }

    /// Returns the last circuit and the attempt count, or `None` on cancel
    async fn attempt_loop<C>(&self, key: &Key, cancel: &C) -> Option<(CircuitDescription, u64)>
    where
        C: CancellationSignal + ?Sized,
    {
        let mut attempts: u64 = 0;

        loop {
            if cancel.is_cancelled() {
                return None;
            }

            let circuit = build_attempt_circuit(key);
            attempts += 1;
            tracing::debug!(attempt = attempts, "Attack attempt");

            tokio::time::sleep(self.config.attempt_delay).await;

            if self.config.attempt_policy.is_exhausted(attempts) {
                // A cancel that landed during the last pause still wins.
                if cancel.is_cancelled() {
                    return None;
                }
                return Some((circuit, attempts));
            }
        }
    }

    async fn simulate(&self, circuit: &CircuitDescription) -> Result<Histogram, BackendError> {
        let shots = self.config.shots;
        let histogram = self.backend.run(circuit, shots).await?;

        let total = histogram_total(&histogram);
        if total != u64::from(shots) {
            return Err(BackendError::InconsistentCounts {
                total,
                expected: shots,
            });
        }
        Ok(histogram)
    }

    async fn on_decode_failure<C>(
        &self,
        error: CodecError,
        cancel: &C,
    ) -> AttackResult<AttackOutcome>
    where
        C: CancellationSignal + ?Sized,
    {
        match self.config.decode_failure {
            FailurePolicy::Reject => Err(AttackError::Decode(error)),
            FailurePolicy::PollUntilCancelled => {
                tracing::warn!(error = %error, "Undecodable key, waiting for cancellation");
                self.wait_for_cancel(cancel, "decode").await;
                Ok(AttackOutcome::Cancelled(CancelReason::AfterDecodeFailure))
            }
        }
    }

    async fn on_backend_failure<C>(
        &self,
        error: BackendError,
        cancel: &C,
    ) -> AttackResult<AttackOutcome>
    where
        C: CancellationSignal + ?Sized,
    {
        match self.config.backend_failure {
            FailurePolicy::Reject => Err(AttackError::Backend(error)),
            FailurePolicy::PollUntilCancelled => {
                tracing::error!(error = %error, "Quantum simulation failed, waiting for cancellation");
                self.wait_for_cancel(cancel, "simulation").await;
                Ok(AttackOutcome::Cancelled(CancelReason::AfterBackendFailure(
                    error.to_string(),
                )))
            }
        }
    }

    /// Poll `cancel` every `poll_interval` until it is observed. No timeout.
    async fn wait_for_cancel<C>(&self, cancel: &C, stage: &'static str)
    where
        C: CancellationSignal + ?Sized,
    {
        let mut ticks: u64 = 0;
        while !cancel.is_cancelled() {
            tokio::time::sleep(self.config.poll_interval).await;
            ticks += 1;
            tracing::debug!(stage, tick = ticks, "Still waiting for cancellation");
        }
        tracing::info!(stage, ticks, "Attack cancelled while waiting");
    }
}
