//! Normalized menu actions

use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use url::Url;

/// Identifier used for OS document-open requests
pub const OPEN_DOCUMENT: &str = "openDocument";

/// Opaque data attached to an action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionPayload {
    /// File reference from a document-open request or file picker
    Document(PathBuf),
    /// Boolean state (e.g. a checkable menu item)
    Flag(bool),
    /// Anything else the host adapter wants to pass through
    Value(serde_json::Value),
}

impl ActionPayload {
    /// Build a document payload from an OS file reference
    ///
    /// Accepts `file://` URLs (percent-encoded) as well as plain paths. Paths
    /// need not be valid UTF-8.
    pub fn document(reference: impl AsRef<OsStr>) -> Self {
        ActionPayload::Document(resolve_file_reference(reference.as_ref()))
    }

    pub fn as_document(&self) -> Option<&Path> {
        match self {
            ActionPayload::Document(path) => Some(path),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ActionPayload::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

/// A user-invoked command from the menu bar or a file-open request
///
/// Created by the menu manager, consumed exactly once by dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuAction {
    identifier: String,
    payload: Option<ActionPayload>,
    sequence: u64,
    handled: bool,
}

impl MenuAction {
    pub(crate) fn new(
        identifier: impl Into<String>,
        payload: Option<ActionPayload>,
        sequence: u64,
        handled: bool,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            payload,
            sequence,
            handled,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn payload(&self) -> Option<&ActionPayload> {
        self.payload.as_ref()
    }

    /// Arrival sequence number, unique per menu manager
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Whether a handler was registered when the action was normalized
    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Document path carried by this action, if any
    pub fn document(&self) -> Option<&Path> {
        self.payload.as_ref().and_then(ActionPayload::as_document)
    }
}

/// Turn a `file://` URL or a plain path into a filesystem path
fn resolve_file_reference(reference: &OsStr) -> PathBuf {
    if let Some(url) = reference.to_str().and_then(|s| Url::parse(s).ok()) {
        if url.scheme() == "file" {
            if let Ok(path) = url.to_file_path() {
                return path;
            }
        }
    }
    PathBuf::from(reference)
}
