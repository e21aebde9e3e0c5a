use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Admits at most one station connect at a time.
#[derive(Debug, Default)]
pub struct ConnectGate {
    in_progress: AtomicBool,
}

impl ConnectGate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns `None` when another connect already holds the gate.
    pub fn try_acquire(self: &Arc<Self>) -> Option<ConnectPermit> {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ConnectPermit {
                gate: Arc::clone(self),
            })
    }

    pub fn is_held(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }
}

/// Held for the whole duration of a connect; released on drop, including
/// when the connecting future is cancelled.
#[derive(Debug)]
pub struct ConnectPermit {
    gate: Arc<ConnectGate>,
}

impl Drop for ConnectPermit {
    fn drop(&mut self) {
        self.gate.in_progress.store(false, Ordering::Release);
    }
}

/// Background reconnection switch. Every outstanding guard keeps it off, so
/// overlapping manual requests cannot turn it back on early.
#[derive(Debug, Default)]
pub struct AutoReconnect {
    suppressors: AtomicUsize,
}

impl AutoReconnect {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn suppress(self: &Arc<Self>) -> AutoReconnectGuard {
        self.suppressors.fetch_add(1, Ordering::AcqRel);
        AutoReconnectGuard {
            owner: Arc::clone(self),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.suppressors.load(Ordering::Acquire) == 0
    }
}

#[derive(Debug)]
pub struct AutoReconnectGuard {
    owner: Arc<AutoReconnect>,
}

impl Drop for AutoReconnectGuard {
    fn drop(&mut self) {
        self.owner.suppressors.fetch_sub(1, Ordering::AcqRel);
    }
}
