//! Readiness gate for the embedded UI runtime

/// Write-once readiness flag
///
/// Flips to ready at most once per process. The first successful
/// [`signal_ready`](Self::signal_ready) is the one-shot "became ready" event.
#[derive(Debug, Default)]
pub struct ReadinessGate {
    ready: bool,
}

impl ReadinessGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the UI runtime as ready
    ///
    /// Returns `true` only for the call that performed the transition.
    /// Later calls are no-ops and return `false`.
    pub fn signal_ready(&mut self) -> bool {
        if self.ready {
            return false;
        }
        self.ready = true;
        true
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }
}
