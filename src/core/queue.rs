//! Pending action buffer

use super::action::MenuAction;
use std::collections::VecDeque;

/// FIFO buffer of actions that arrived before the UI runtime was ready
///
/// Unbounded: menu actions are human-paced, so nothing is ever dropped here.
#[derive(Debug, Default)]
pub struct ActionQueue {
    pending: VecDeque<MenuAction>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action to the tail
    pub fn enqueue(&mut self, action: MenuAction) {
        self.pending.push_back(action);
    }

    /// Take every buffered action in arrival order, leaving the queue empty
    pub fn flush(&mut self) -> Vec<MenuAction> {
        self.pending.drain(..).collect()
    }

    /// Drop every buffered action, returning how many were discarded
    pub fn discard(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Identifiers of the buffered actions, head first
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(MenuAction::identifier)
    }
}
