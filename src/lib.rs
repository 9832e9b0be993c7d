//! Bergen Shell
//!
//! Lifecycle and native menu coordination for the Bergen markdown viewer,
//! whose UI is rendered by an embedded UI runtime.
//!
//! # Features
//! - Tracks the application lifecycle (launching, content loading, ready, terminating)
//! - Holds native menu actions and document-open requests until the UI runtime is ready
//! - Delivers held actions in arrival order exactly once, then dispatches directly
//! - Isolates failing menu handlers from each other
//! - Builds the native menu bar from configuration
//! - Publishes file and view actions to the UI runtime as JSON events

pub mod bridge;
pub mod core;
pub mod menu;

pub use bridge::{
    install_default_handlers, sidebar_state_changed, BridgeEvent, SharedViewState, UiBridge,
    ViewState,
};
pub use crate::core::action::{ActionPayload, MenuAction};
pub use crate::core::config::Config;
pub use crate::core::coordinator::{AppLifecycleCoordinator, Delivery, DispatchStats};
pub use crate::core::error::{BridgeError, ConfigError, DispatchError};
pub use crate::core::events::{AppEvent, EventSender};
pub use crate::core::lifecycle::LifecyclePhase;
pub use menu::{MenuBar, MenuManager};
