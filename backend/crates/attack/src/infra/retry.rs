//! Retrying Backend
//!
//! Wraps any backend and retries transient failures with exponential
//! backoff. Without a policy it is a plain pass-through.

use crate::domain::backend::{BackendError, RetryPolicy, SimulationBackend};
use crate::domain::circuit::CircuitDescription;
use crate::domain::entities::Histogram;

#[derive(Debug, Clone)]
pub struct RetryingBackend<B> {
    inner: B,
    policy: Option<RetryPolicy>,
}

impl<B> RetryingBackend<B> {
    pub fn new(inner: B, policy: Option<RetryPolicy>) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

impl<B> SimulationBackend for RetryingBackend<B>
where
    B: SimulationBackend + Sync,
{
    async fn run(
        &self,
        circuit: &CircuitDescription,
        shots: u32,
    ) -> Result<Histogram, BackendError> {
        let Some(policy) = self.policy else {
            return self.inner.run(circuit, shots).await;
        };

        let mut retry = 0;
        loop {
            match self.inner.run(circuit, shots).await {
                Err(e) if e.is_transient() && retry < policy.max_retries => {
                    let backoff = policy.backoff_for(retry);
                    tracing::warn!(
                        error = %e,
                        retry = retry + 1,
                        backoff_ms = backoff.as_millis() as u64,
                        "Transient simulation failure, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    retry += 1;
                }
                result => return result,
            }
        }
    }
}
