//! Native menu bar built from configuration
//!
//! Items carry their action identifier as the menu id, so a click can be
//! forwarded to the coordinator without a lookup table.

use super::MenuManager;
use crate::core::config::MenuConfig;
use crate::core::events::{AppEvent, EventSender};
use anyhow::{Context, Result};
use std::collections::HashMap;
use tray_icon::menu::{accelerator::Accelerator, CheckMenuItem, Menu, MenuEvent, MenuItem, Submenu};
use tracing::{debug, error, info, warn};

/// Owns the native menu and its checkable items
pub struct MenuBar {
    #[cfg_attr(not(target_os = "macos"), allow(dead_code))]
    menu: Menu,
    checks: HashMap<String, CheckMenuItem>,
}

impl MenuBar {
    /// Build the menu bar and declare its items on `manager`
    pub fn build(config: &MenuConfig, manager: &mut MenuManager) -> Result<Self> {
        let menu = Menu::new();
        let mut checks = HashMap::new();

        #[cfg(target_os = "macos")]
        {
            use tray_icon::menu::PredefinedMenuItem;

            let app_menu = Submenu::new("Bergen", true);
            app_menu.append(&PredefinedMenuItem::about(None, None))?;
            app_menu.append(&PredefinedMenuItem::separator())?;
            app_menu.append(&PredefinedMenuItem::hide(None))?;
            app_menu.append(&PredefinedMenuItem::hide_others(None))?;
            app_menu.append(&PredefinedMenuItem::show_all(None))?;
            app_menu.append(&PredefinedMenuItem::separator())?;
            app_menu.append(&PredefinedMenuItem::quit(None))?;
            menu.append(&app_menu)?;
        }

        for section in &config.sections {
            let submenu = Submenu::new(&section.title, true);

            for item in &section.items {
                let accelerator = item.accelerator.as_deref().and_then(parse_accelerator);

                match item.checked {
                    Some(checked) => {
                        let check = CheckMenuItem::with_id(
                            item.id.as_str(),
                            &item.title,
                            true,
                            checked,
                            accelerator,
                        );
                        submenu.append(&check)?;
                        checks.insert(item.id.clone(), check);
                    }
                    None => {
                        let entry = MenuItem::with_id(item.id.as_str(), &item.title, true, accelerator);
                        submenu.append(&entry)?;
                    }
                }

                manager.declare_item(item.id.as_str());
            }

            menu.append(&submenu)
                .with_context(|| format!("Failed to add '{}' menu", section.title))?;
        }

        debug!(items = manager.declared_items().len(), "Native menu bar built");
        Ok(Self { menu, checks })
    }

    /// Install as the application menu
    pub fn attach(&self) {
        #[cfg(target_os = "macos")]
        {
            self.menu.init_for_nsapp();
            info!("Native menu bar attached");
        }

        #[cfg(not(target_os = "macos"))]
        info!("Native menu bar built; window menus are not attached on this platform");
    }

    /// Current check state of a checkable item
    pub fn is_checked(&self, identifier: &str) -> Option<bool> {
        self.checks.get(identifier).map(CheckMenuItem::is_checked)
    }

    pub fn set_checked(&self, identifier: &str, checked: bool) {
        match self.checks.get(identifier) {
            Some(item) => item.set_checked(checked),
            None => warn!(identifier, "No checkable menu item to update"),
        }
    }
}

fn parse_accelerator(raw: &str) -> Option<Accelerator> {
    match raw.parse::<Accelerator>() {
        Ok(accelerator) => Some(accelerator),
        Err(e) => {
            warn!("Ignoring invalid accelerator {:?}: {}", raw, e);
            None
        }
    }
}

/// Forward native menu clicks to the main event loop
///
/// The toolkit delivers clicks on its own channel; a helper thread blocks on
/// it and re-posts each click as an [`AppEvent::MenuInvoked`].
pub fn spawn_menu_forwarder(event_tx: EventSender) {
    std::thread::spawn(move || {
        let receiver = MenuEvent::receiver();

        while let Ok(event) = receiver.recv() {
            debug!("Menu event: {:?}", event);

            let forwarded = event_tx.send(AppEvent::MenuInvoked {
                identifier: event.id().0.clone(),
                payload: None,
            });

            if let Err(e) = forwarded {
                error!("Failed to forward menu action: {}", e);
                break;
            }
        }
    });
}
