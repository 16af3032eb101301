//! Run Registry and Start Run Use Case
//!
//! Each spawned attack gets its own id and its own cancellation token, so
//! cancelling one run never touches another. Finished runs stay queryable
//! until purged.

use crate::application::config::AttackConfig;
use crate::application::run_attack::RunAttackUseCase;
use crate::domain::backend::SimulationBackend;
use crate::domain::entities::{AttackRun, RunStatus};
use crate::error::{AttackError, AttackResult};
use chrono::Utc;
use dashmap::DashMap;
use kernel::id::RunId;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

struct RunEntry {
    run: AttackRun,
    token: CancellationToken,
}

/// In-memory registry of attack runs
///
/// Clones share the same registry. Every run token is a child of one root
/// token, so [`RunRegistry::cancel_all`] reaches every run at once.
#[derive(Clone, Default)]
pub struct RunRegistry {
    runs: Arc<DashMap<RunId, RunEntry>>,
    root: CancellationToken,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new running attack
    pub fn register(&self) -> (RunId, CancellationToken) {
        let run = AttackRun::new();
        let id = run.id;
        let token = self.root.child_token();
        self.runs.insert(
            id,
            RunEntry {
                run,
                token: token.clone(),
            },
        );
        (id, token)
    }

    /// Record the final status of a run
    pub fn finish(&self, id: RunId, status: RunStatus) {
        if let Some(mut entry) = self.runs.get_mut(&id) {
            entry.run.finish(status);
        }
    }

    pub fn get(&self, id: RunId) -> Option<AttackRun> {
        self.runs.get(&id).map(|entry| entry.run.clone())
    }

    /// Signal the token of one running attack
    ///
    /// ## Errors
    /// * `AttackError::RunNotFound` - unknown or purged id
    /// * `AttackError::RunFinished` - the run already ended
    pub fn cancel(&self, id: RunId) -> AttackResult<()> {
        let entry = self.runs.get(&id).ok_or(AttackError::RunNotFound(id))?;
        if entry.run.is_finished() {
            return Err(AttackError::RunFinished(id));
        }
        entry.token.cancel();
        tracing::info!(run_id = %id, "Run cancellation requested");
        Ok(())
    }

    /// Cancel every run, including runs registered afterwards
    pub fn cancel_all(&self) {
        self.root.cancel();
    }

    pub fn active_count(&self) -> usize {
        self.runs
            .iter()
            .filter(|entry| !entry.run.is_finished())
            .count()
    }

    /// Drop finished runs older than `retention`; returns how many were removed
    pub fn purge_finished(&self, retention: Duration) -> usize {
        let Some(cutoff) = chrono::Duration::from_std(retention)
            .ok()
            .and_then(|retention| Utc::now().checked_sub_signed(retention))
        else {
            return 0;
        };
        let before = self.runs.len();
        self.runs.retain(|_, entry| match entry.run.finished_at {
            Some(finished_at) => finished_at > cutoff,
            None => true,
        });
        before - self.runs.len()
    }
}

/// Start Run Use Case
pub struct StartRunUseCase<B>
where
    B: SimulationBackend,
{
    backend: Arc<B>,
    config: Arc<AttackConfig>,
    registry: RunRegistry,
}

impl<B> StartRunUseCase<B>
where
    B: SimulationBackend + Send + Sync + 'static,
{
    pub fn new(backend: Arc<B>, config: Arc<AttackConfig>, registry: RunRegistry) -> Self {
        Self {
            backend,
            config,
            registry,
        }
    }

    /// Register a run and spawn the attack; returns immediately
    pub fn start(&self, ciphertext: String) -> RunId {
        let (id, token) = self.registry.register();
        let use_case = RunAttackUseCase::new(self.backend.clone(), self.config.clone());
        let registry = self.registry.clone();

        let span = tracing::info_span!("attack_run", run_id = %id);
        let attack = tokio::spawn(
            async move { use_case.execute(&ciphertext, &token).await }.instrument(span.clone()),
        );

        // The attack runs in its own task so a panic still finishes the run.
        tokio::spawn(
            async move {
                let status = match attack.await {
                    Ok(outcome) => RunStatus::from(outcome),
                    Err(e) => {
                        tracing::error!(error = %e, "Run task aborted");
                        RunStatus::Failed(format!("La ejecución terminó inesperadamente: {e}"))
                    }
                };
                tracing::info!(status = status.as_str(), "Run finished");
                registry.finish(id, status);
            }
            .instrument(span),
        );

        tracing::info!(run_id = %id, "Run started");
        id
    }
}
