//! Error types for the coordinator and its collaborators
//!
//! None of these ever escape to the OS layer: configuration errors are
//! reported to the integrator at startup, dispatch errors are logged per
//! action.

use thiserror::Error;

/// Problems with how menu handlers are wired up
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A handler was registered twice; the later one replaced the earlier
    #[error("Duplicate handler for menu action '{identifier}' (last registration wins)")]
    DuplicateHandler { identifier: String },

    /// A menu item is shown but nothing handles it
    #[error("Menu item '{identifier}' has no registered handler")]
    MissingHandler { identifier: String },
}

/// A single action failed to dispatch
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The handler returned an error
    #[error("Handler for '{identifier}' failed: {source}")]
    Handler {
        identifier: String,
        #[source]
        source: anyhow::Error,
    },

    /// The handler panicked
    #[error("Handler for '{identifier}' panicked: {message}")]
    Panicked { identifier: String, message: String },

    /// No handler was registered when the action was dispatched
    #[error("No handler registered for '{identifier}'")]
    Unhandled { identifier: String },
}

impl DispatchError {
    pub fn identifier(&self) -> &str {
        match self {
            DispatchError::Handler { identifier, .. }
            | DispatchError::Panicked { identifier, .. }
            | DispatchError::Unhandled { identifier } => identifier,
        }
    }
}

/// Outbound bridge to the UI runtime failed
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The UI runtime dropped its receiver
    #[error("UI bridge disconnected while sending '{event}'")]
    Disconnected { event: String },

    #[error("Failed to encode bridge event: {0}")]
    Encode(#[from] serde_json::Error),
}
