//! Core module - Lifecycle coordination, configuration, and events

pub mod action;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod gate;
pub mod lifecycle;
pub mod queue;
