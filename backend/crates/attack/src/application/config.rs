//! Application Configuration
//!
//! Configuration for the attack orchestrator and run registry.

use crate::domain::backend::RetryPolicy;
use crate::domain::value_objects::{DEFAULT_SHOTS, MAX_QUBITS};
use platform::config::{ConfigError, EnvReader};
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;

/// Attempt cap of the fixed-count variant of the service
pub const DEFAULT_ATTEMPTS: NonZeroU32 = NonZeroU32::new(5).unwrap();

/// How many attempts the attack loop makes before simulating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPolicy {
    /// Loop until cancelled; never reaches the backend
    Unbounded,
    /// Stop after `n` attempts and simulate the last circuit
    FixedCount(NonZeroU32),
}

impl AttemptPolicy {
    pub fn fixed(attempts: u32) -> Option<Self> {
        NonZeroU32::new(attempts).map(Self::FixedCount)
    }

    pub fn is_exhausted(&self, attempts: u64) -> bool {
        match self {
            AttemptPolicy::Unbounded => false,
            AttemptPolicy::FixedCount(cap) => attempts >= u64::from(cap.get()),
        }
    }
}

impl FromStr for AttemptPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("unbounded") {
            return Ok(AttemptPolicy::Unbounded);
        }
        let n: u32 = s
            .parse()
            .map_err(|_| "expected `unbounded` or a positive integer".to_string())?;
        AttemptPolicy::fixed(n).ok_or_else(|| "attempt cap must be at least 1".to_string())
    }
}

/// What the orchestrator does after a decode or backend failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Keep polling the cancellation signal; only a cancel ends the request
    #[default]
    PollUntilCancelled,
    /// Return the error to the caller right away
    Reject,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "poll" => Ok(FailurePolicy::PollUntilCancelled),
            "reject" => Ok(FailurePolicy::Reject),
            _ => Err("expected `poll` or `reject`".to_string()),
        }
    }
}

/// Attack application configuration
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Measurements per simulated circuit
    pub shots: u32,
    pub attempt_policy: AttemptPolicy,
    /// Pause after each attempt
    pub attempt_delay: Duration,
    /// Tick of the wait-for-cancel loops
    pub poll_interval: Duration,
    pub decode_failure: FailurePolicy,
    pub backend_failure: FailurePolicy,
    /// Opt-in backoff retries for transient backend failures
    pub retry: Option<RetryPolicy>,
    /// How long finished runs stay queryable
    pub run_retention: Duration,
    /// Fixed sampler seed for reproducible histograms
    pub simulator_seed: Option<u64>,
    /// Length of keys issued by `GET /cifrado`
    pub issued_key_bits: usize,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            attempt_policy: AttemptPolicy::FixedCount(DEFAULT_ATTEMPTS),
            attempt_delay: Duration::from_millis(50),
            poll_interval: Duration::from_millis(500),
            decode_failure: FailurePolicy::PollUntilCancelled,
            backend_failure: FailurePolicy::PollUntilCancelled,
            retry: None,
            run_retention: Duration::from_secs(600),
            simulator_seed: None,
            issued_key_bits: MAX_QUBITS,
        }
    }
}

impl AttackConfig {
    /// Development preset: failures are reported instead of waited on
    pub fn development() -> Self {
        Self {
            decode_failure: FailurePolicy::Reject,
            backend_failure: FailurePolicy::Reject,
            ..Self::default()
        }
    }

    /// Apply `ATTACK_*`, `RUN_RETENTION_SECS` and `SIM_SEED` overrides
    pub fn with_overrides<F>(mut self, env: &EnvReader<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(shots) = env.parse::<u32>("ATTACK_SHOTS")? {
            if shots == 0 {
                return Err(ConfigError::new("ATTACK_SHOTS", "0", "must be positive"));
            }
            self.shots = shots;
        }
        if let Some(policy) = env.parse::<AttemptPolicy>("ATTACK_MAX_ATTEMPTS")? {
            self.attempt_policy = policy;
        }
        if let Some(delay) = env.millis("ATTACK_DELAY_MS")? {
            self.attempt_delay = delay;
        }
        if let Some(interval) = env.millis("ATTACK_POLL_MS")? {
            self.poll_interval = interval;
        }
        if let Some(policy) = env.parse::<FailurePolicy>("ATTACK_DECODE_FAILURE")? {
            self.decode_failure = policy;
        }
        if let Some(policy) = env.parse::<FailurePolicy>("ATTACK_BACKEND_FAILURE")? {
            self.backend_failure = policy;
        }
        if let Some(max_retries) = env.parse::<u32>("ATTACK_RETRY_MAX")? {
            self.retry = (max_retries > 0).then(|| RetryPolicy {
                max_retries,
                ..RetryPolicy::default()
            });
        }
        if let (Some(retry), Some(backoff)) =
            (self.retry.as_mut(), env.millis("ATTACK_RETRY_BACKOFF_MS")?)
        {
            retry.initial_backoff = backoff;
        }
        if let Some(retention) = env.secs("RUN_RETENTION_SECS")? {
            self.run_retention = retention;
        }
        if let Some(seed) = env.parse::<u64>("SIM_SEED")? {
            self.simulator_seed = Some(seed);
        }
        Ok(self)
    }
}
