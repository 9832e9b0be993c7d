//! Menu module - Action registry and native menu bar

pub mod bar;
pub mod manager;

pub use bar::{spawn_menu_forwarder, MenuBar};
pub use manager::{ActionHandler, MenuManager};
