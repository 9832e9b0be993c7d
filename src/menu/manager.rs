//! Menu action registry and normalization

use crate::core::action::{ActionPayload, MenuAction, OPEN_DOCUMENT};
use crate::core::error::ConfigError;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fmt;
use tracing::{debug, warn};

/// Handler invoked for a dispatched menu action
pub type ActionHandler = Box<dyn FnMut(&MenuAction) -> anyhow::Result<()> + Send>;

/// Maps menu-item identifiers to handlers and normalizes raw invocations
#[derive(Default)]
pub struct MenuManager {
    handlers: HashMap<String, ActionHandler>,
    /// Identifiers shown in the native menu bar, in declaration order
    declared: Vec<String>,
    next_sequence: u64,
}

impl MenuManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `identifier` with `handler`
    ///
    /// Registering an identifier twice installs the new handler and reports
    /// [`ConfigError::DuplicateHandler`].
    pub fn register_action<F>(
        &mut self,
        identifier: impl Into<String>,
        handler: F,
    ) -> Result<(), ConfigError>
    where
        F: FnMut(&MenuAction) -> anyhow::Result<()> + Send + 'static,
    {
        let identifier = identifier.into();
        let replaced = self
            .handlers
            .insert(identifier.clone(), Box::new(handler))
            .is_some();

        if replaced {
            warn!(identifier = %identifier, "Menu handler registered twice, replacing");
            return Err(ConfigError::DuplicateHandler { identifier });
        }

        debug!(identifier = %identifier, "Registered menu handler");
        Ok(())
    }

    /// Record an identifier that the native menu bar exposes
    pub fn declare_item(&mut self, identifier: impl Into<String>) {
        let identifier = identifier.into();
        if !self.declared.contains(&identifier) {
            self.declared.push(identifier);
        }
    }

    /// Report declared menu items that have no handler
    pub fn validate(&self) -> Vec<ConfigError> {
        self.declared
            .iter()
            .filter(|id| !self.is_registered(id))
            .map(|id| ConfigError::MissingHandler {
                identifier: id.clone(),
            })
            .collect()
    }

    /// Normalize a raw menu invocation into an action
    ///
    /// Unknown identifiers still yield an action, tagged unhandled.
    pub fn handle_invocation(
        &mut self,
        identifier: &str,
        payload: Option<ActionPayload>,
    ) -> MenuAction {
        let handled = self.is_registered(identifier);
        self.next_sequence += 1;
        MenuAction::new(identifier, payload, self.next_sequence, handled)
    }

    /// Normalize one OS document-open reference (`file://` URL or path)
    pub fn handle_open_document(&mut self, reference: impl AsRef<OsStr>) -> MenuAction {
        self.handle_invocation(OPEN_DOCUMENT, Some(ActionPayload::document(reference)))
    }

    pub fn handler_mut(&mut self, identifier: &str) -> Option<&mut ActionHandler> {
        self.handlers.get_mut(identifier)
    }

    pub fn is_registered(&self, identifier: &str) -> bool {
        self.handlers.contains_key(identifier)
    }

    /// Registered identifiers, sorted
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn declared_items(&self) -> &[String] {
        &self.declared
    }
}

impl fmt::Debug for MenuManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuManager")
            .field("handlers", &self.identifiers())
            .field("declared", &self.declared)
            .field("next_sequence", &self.next_sequence)
            .finish()
    }
}
