//! Host event definitions

use super::action::ActionPayload;
use std::ffi::OsString;
use tokio::sync::mpsc;
use winit::event_loop::EventLoopProxy;

/// Wrapper around `mpsc::UnboundedSender<AppEvent>` that also wakes the winit
/// event loop via the `EventLoopProxy` after every send, so callbacks raised
/// on helper threads (native menu, UI runtime) are picked up on the main
/// thread while the loop is waiting.
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<AppEvent>,
    proxy: Option<EventLoopProxy<()>>,
}

impl EventSender {
    pub fn new(tx: mpsc::UnboundedSender<AppEvent>, proxy: EventLoopProxy<()>) -> Self {
        Self {
            tx,
            proxy: Some(proxy),
        }
    }

    /// Sender for hosts that poll the receiver themselves
    pub fn without_wakeup(tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { tx, proxy: None }
    }

    pub fn send(&self, event: AppEvent) -> Result<(), mpsc::error::SendError<AppEvent>> {
        let result = self.tx.send(event);
        if let Some(proxy) = &self.proxy {
            let _ = proxy.send_event(());
        }
        result
    }
}

/// Inbound callbacks raised off the main event loop
///
/// Menu clicks, document-open requests and UI runtime notifications are
/// funneled through this enum so they arrive serialized on the main thread.
/// Lifecycle callbacks come straight from the event loop and skip the channel.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Native menu item invoked
    MenuInvoked {
        identifier: String,
        payload: Option<ActionPayload>,
    },

    /// OS asked to open documents (file URLs or paths, not necessarily UTF-8)
    OpenDocuments(Vec<OsString>),

    /// UI runtime changed the sidebar visibility itself
    SidebarStateChanged { collapsed: bool },
}
