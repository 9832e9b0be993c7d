//! Application lifecycle phases

use std::fmt;

/// Coarse-grained stage of the application process
///
/// Phases are ordered; a running process only ever moves forward through
/// them. `Terminating` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LifecyclePhase {
    /// Process started, OS has not reported launch completion yet
    #[default]
    Launching,
    /// Launch finished, embedded UI runtime is loading its content
    ContentLoading,
    /// UI runtime has mounted its handlers; actions are dispatched directly
    Ready,
    /// Application is tearing down
    Terminating,
}

impl LifecyclePhase {
    /// All phases in lifecycle order
    pub fn all() -> &'static [LifecyclePhase] {
        &[
            LifecyclePhase::Launching,
            LifecyclePhase::ContentLoading,
            LifecyclePhase::Ready,
            LifecyclePhase::Terminating,
        ]
    }

    /// Whether moving from `self` to `next` goes forward
    pub fn can_advance_to(self, next: LifecyclePhase) -> bool {
        next > self
    }

    /// Whether this phase is terminal
    pub fn is_terminal(self) -> bool {
        self == LifecyclePhase::Terminating
    }

    pub fn name(self) -> &'static str {
        match self {
            LifecyclePhase::Launching => "launching",
            LifecyclePhase::ContentLoading => "content-loading",
            LifecyclePhase::Ready => "ready",
            LifecyclePhase::Terminating => "terminating",
        }
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
