//! Application lifecycle coordinator
//!
//! Receives lifecycle and menu callbacks from the host adapter, holds menu
//! actions until the embedded UI runtime reports that its content has
//! appeared, then delivers them in arrival order exactly once.
//!
//! All entry points take `&mut self` and are called from the main thread, so
//! a flush always runs to completion before the next arrival is looked at.

use super::action::{ActionPayload, MenuAction};
use super::error::{ConfigError, DispatchError};
use super::gate::ReadinessGate;
use super::lifecycle::LifecyclePhase;
use super::queue::ActionQueue;
use crate::menu::MenuManager;
use std::ffi::OsStr;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info, warn};

/// What happened to an incoming action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handler ran and succeeded
    Dispatched,
    /// Handler ran and failed (logged)
    Failed,
    /// Held until the UI runtime is ready
    Queued,
    /// No handler registered; dropped
    Unhandled,
    /// Arrived after termination began; dropped
    Rejected,
}

/// Running totals for dispatch outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Handlers invoked (successful or not)
    pub dispatched: u64,
    /// Handlers that returned an error or panicked
    pub failed: u64,
    /// Actions with no handler
    pub unhandled: u64,
    /// Queued actions cancelled by termination
    pub discarded: u64,
    /// Actions that arrived after termination
    pub rejected: u64,
}

/// The application delegate: lifecycle state plus readiness-gated dispatch
#[derive(Debug)]
pub struct AppLifecycleCoordinator {
    phase: LifecyclePhase,
    history: Vec<LifecyclePhase>,
    gate: ReadinessGate,
    queue: ActionQueue,
    menu: MenuManager,
    stats: DispatchStats,
}

impl AppLifecycleCoordinator {
    pub fn new() -> Self {
        Self::with_menu_manager(MenuManager::new())
    }

    /// Build a coordinator around an already populated menu manager
    pub fn with_menu_manager(menu: MenuManager) -> Self {
        Self {
            phase: LifecyclePhase::Launching,
            history: vec![LifecyclePhase::Launching],
            gate: ReadinessGate::new(),
            queue: ActionQueue::new(),
            menu,
            stats: DispatchStats::default(),
        }
    }

    /// Register a handler for a menu-action identifier
    pub fn register_action<F>(
        &mut self,
        identifier: impl Into<String>,
        handler: F,
    ) -> Result<(), ConfigError>
    where
        F: FnMut(&MenuAction) -> anyhow::Result<()> + Send + 'static,
    {
        self.menu.register_action(identifier, handler)
    }

    /// Startup check: declared menu items without handlers
    pub fn validate(&self) -> Vec<ConfigError> {
        self.menu.validate()
    }

    /// OS reported that the application finished launching
    pub fn on_launch_finished(&mut self) {
        if self.phase != LifecyclePhase::Launching {
            debug!(phase = %self.phase, "Ignoring launch-finished callback");
            return;
        }
        self.advance(LifecyclePhase::ContentLoading);
    }

    /// Embedded UI runtime reported that its content fully appeared
    pub fn on_content_ready(&mut self) {
        match self.phase {
            LifecyclePhase::Terminating => {
                warn!("Readiness signal arrived after termination began, ignoring");
                return;
            }
            LifecyclePhase::Ready => {
                debug!("Duplicate readiness signal ignored");
                return;
            }
            LifecyclePhase::Launching => {
                debug!("Content appeared before launch-finished, entering content loading first");
                self.advance(LifecyclePhase::ContentLoading);
            }
            LifecyclePhase::ContentLoading => {}
        }

        self.advance(LifecyclePhase::Ready);
        if self.gate.signal_ready() {
            self.flush_pending();
        }
    }

    /// OS reported that the application will terminate
    ///
    /// Queued actions are cancelled, not delivered.
    pub fn on_will_terminate(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        self.advance(LifecyclePhase::Terminating);

        if !self.queue.is_empty() {
            let identifiers: Vec<&str> = self.queue.identifiers().collect();
            info!(?identifiers, "Discarding pending menu actions at termination");
        }
        let discarded = self.queue.discard();
        self.stats.discarded += discarded as u64;
    }

    /// A native menu item was invoked
    pub fn on_menu_invoked(&mut self, identifier: &str, payload: Option<ActionPayload>) -> Delivery {
        let action = self.menu.handle_invocation(identifier, payload);
        self.submit(action)
    }

    /// The OS asked the application to open one or more documents
    pub fn on_open_documents<I, S>(&mut self, references: I) -> Vec<Delivery>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        references
            .into_iter()
            .map(|reference| {
                let action = self.menu.handle_open_document(reference);
                self.submit(action)
            })
            .collect()
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    /// Every phase entered so far, oldest first
    pub fn phase_history(&self) -> &[LifecyclePhase] {
        &self.history
    }

    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    /// Number of actions waiting for readiness
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Read-only view of the menu registry
    pub fn menu_manager(&self) -> &MenuManager {
        &self.menu
    }

    fn advance(&mut self, next: LifecyclePhase) {
        if !self.phase.can_advance_to(next) {
            warn!(from = %self.phase, to = %next, "Refusing lifecycle regression");
            return;
        }
        info!(from = %self.phase, to = %next, "Lifecycle transition");
        self.phase = next;
        self.history.push(next);
    }

    fn submit(&mut self, action: MenuAction) -> Delivery {
        if self.phase.is_terminal() {
            debug!(identifier = action.identifier(), "Dropping action received during termination");
            self.stats.rejected += 1;
            return Delivery::Rejected;
        }

        if !action.is_handled() {
            warn!(identifier = action.identifier(), "No handler for menu action, dropping");
            self.stats.unhandled += 1;
            return Delivery::Unhandled;
        }

        if self.gate.is_ready() {
            return self.deliver(action);
        }

        debug!(
            identifier = action.identifier(),
            sequence = action.sequence(),
            "UI runtime not ready, queueing action"
        );
        self.queue.enqueue(action);
        Delivery::Queued
    }

    /// Drain the queue, then dispatch the drained batch in order
    fn flush_pending(&mut self) {
        let batch = self.queue.flush();
        if batch.is_empty() {
            return;
        }
        info!(count = batch.len(), "Flushing queued menu actions");
        for action in batch {
            self.deliver(action);
        }
    }

    fn deliver(&mut self, action: MenuAction) -> Delivery {
        match self.dispatch(action) {
            Ok(()) => Delivery::Dispatched,
            Err(DispatchError::Unhandled { identifier }) => {
                warn!(identifier = %identifier, "Handler disappeared before dispatch");
                self.stats.unhandled += 1;
                Delivery::Unhandled
            }
            Err(e) => {
                error!(identifier = e.identifier(), "Menu action failed: {}", e);
                Delivery::Failed
            }
        }
    }

    fn dispatch(&mut self, action: MenuAction) -> Result<(), DispatchError> {
        let identifier = action.identifier().to_string();
        let Some(handler) = self.menu.handler_mut(&identifier) else {
            return Err(DispatchError::Unhandled { identifier });
        };

        debug!(identifier = %identifier, sequence = action.sequence(), "Dispatching menu action");
        self.stats.dispatched += 1;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(&action)));
        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => {
                self.stats.failed += 1;
                Err(DispatchError::Handler { identifier, source })
            }
            Err(payload) => {
                self.stats.failed += 1;
                Err(DispatchError::Panicked {
                    identifier,
                    message: panic_message(payload.as_ref()),
                })
            }
        }
    }
}

impl Default for AppLifecycleCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
