//! Cancellation Signals
//!
//! The orchestrator polls a [`CancellationSignal`] between attempts and on
//! every tick of its waiting loops. Two implementations exist:
//! - [`CancelFlag`]: one process-wide flag shared by the compatibility
//!   endpoints (`/ataque`, `/cancel`). It has no run identity.
//! - `tokio_util::sync::CancellationToken`: one per registered run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;

/// Cooperative stop signal
pub trait CancellationSignal: Send + Sync {
    fn is_cancelled(&self) -> bool;
}

impl CancellationSignal for CancellationToken {
    fn is_cancelled(&self) -> bool {
        CancellationToken::is_cancelled(self)
    }
}

/// Shared boolean flag with signal / query / clear
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    signaled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self) {
        self.signaled.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.signaled.store(false, Ordering::SeqCst);
    }

    pub fn is_signaled(&self) -> bool {
        self.signaled.load(Ordering::SeqCst)
    }
}

impl CancellationSignal for CancelFlag {
    fn is_cancelled(&self) -> bool {
        self.is_signaled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_lifecycle() {
        let flag = CancelFlag::new();
        assert!(!flag.is_cancelled());

        flag.signal();
        assert!(flag.is_cancelled());

        flag.clear();
        assert!(!flag.is_cancelled());
    }

    #[test]
    fn test_clones_share_state() {
        let flag = CancelFlag::new();
        let other = flag.clone();
        other.signal();
        assert!(flag.is_signaled());
    }

    #[test]
    fn test_token_as_signal() {
        let token = CancellationToken::new();
        let signal: &dyn CancellationSignal = &token;
        assert!(!signal.is_cancelled());
        token.cancel();
        assert!(signal.is_cancelled());
    }
}
