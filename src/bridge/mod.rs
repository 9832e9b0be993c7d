//! Outbound bridge to the embedded UI runtime
//!
//! The UI runtime subscribes to named events. File actions are published as
//! `fileMenuAction`, view actions as `viewMenuAction`; the body is JSON.

use crate::core::action::{ActionPayload, MenuAction, OPEN_DOCUMENT};
use crate::core::error::{BridgeError, ConfigError};
use crate::menu::MenuManager;
use anyhow::anyhow;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Menu item that opens a file chosen in the native picker
pub const OPEN_FILE: &str = "openFile";

/// Menu item that shows or hides the sidebar
pub const TOGGLE_SIDEBAR: &str = "toggleSidebar";

/// Event published for file actions
pub const FILE_MENU_EVENT: &str = "fileMenuAction";

/// Event published for view actions
pub const VIEW_MENU_EVENT: &str = "viewMenuAction";

/// A named event delivered to the UI runtime
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BridgeEvent {
    pub name: String,
    pub body: serde_json::Value,
}

#[derive(Serialize)]
struct FileMenuBody<'a> {
    action: &'static str,
    path: &'a str,
}

#[derive(Serialize)]
struct ViewMenuBody {
    action: &'static str,
    show: bool,
}

/// View state shared between the native side and the UI runtime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    pub sidebar_visible: bool,
}

pub type SharedViewState = Arc<RwLock<ViewState>>;

/// Sending half of the UI event channel
#[derive(Debug, Clone)]
pub struct UiBridge {
    tx: mpsc::UnboundedSender<BridgeEvent>,
}

impl UiBridge {
    /// Create a bridge and the receiver the UI runtime listens on
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<BridgeEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Publish `body` as event `name`
    pub fn emit<T: Serialize>(&self, name: &str, body: &T) -> Result<(), BridgeError> {
        let event = BridgeEvent {
            name: name.to_string(),
            body: serde_json::to_value(body)?,
        };
        debug!(event = name, body = %event.body, "Emitting UI bridge event");
        self.tx.send(event).map_err(|_| BridgeError::Disconnected {
            event: name.to_string(),
        })
    }

    /// Tell the UI runtime to open `path`
    pub fn file_selected(&self, path: &str) -> Result<(), BridgeError> {
        self.emit(
            FILE_MENU_EVENT,
            &FileMenuBody {
                action: "fileSelected",
                path,
            },
        )
    }

    /// Tell the UI runtime to show or hide the sidebar
    pub fn sidebar_toggled(&self, show: bool) -> Result<(), BridgeError> {
        self.emit(
            VIEW_MENU_EVENT,
            &ViewMenuBody {
                action: "toggleSidebar",
                show,
            },
        )
    }
}

/// The UI runtime collapsed or expanded the sidebar itself
///
/// Updates the shared view state and returns the new visibility, which the
/// caller mirrors onto the native menu checkmark.
pub fn sidebar_state_changed(view: &SharedViewState, collapsed: bool) -> bool {
    let visible = !collapsed;
    view.write().sidebar_visible = visible;
    debug!(visible, "Sidebar state changed in the UI runtime");
    visible
}

/// Register the built-in handlers for file and view actions
///
/// Returns any duplicate registrations so the integrator can report them.
pub fn install_default_handlers(
    menu: &mut MenuManager,
    bridge: &UiBridge,
    view: &SharedViewState,
) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    for identifier in [OPEN_FILE, OPEN_DOCUMENT] {
        let bridge = bridge.clone();
        let registered = menu.register_action(identifier, move |action: &MenuAction| {
            let path = action
                .document()
                .ok_or_else(|| anyhow!("'{}' carries no file reference", action.identifier()))?;
            let path = path
                .to_str()
                .ok_or_else(|| anyhow!("{:?} is not valid UTF-8", path))?;
            bridge.file_selected(path)?;
            Ok(())
        });
        errors.extend(registered.err());
    }

    let bridge = bridge.clone();
    let view = Arc::clone(view);
    let registered = menu.register_action(TOGGLE_SIDEBAR, move |action: &MenuAction| {
        let show = {
            let mut state = view.write();
            let show = action
                .payload()
                .and_then(ActionPayload::as_flag)
                .unwrap_or(!state.sidebar_visible);
            state.sidebar_visible = show;
            show
        };
        bridge.sidebar_toggled(show)?;
        Ok(())
    });
    errors.extend(registered.err());

    errors
}
