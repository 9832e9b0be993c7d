// Hide console window on Windows release builds
#![cfg_attr(
    all(target_os = "windows", not(debug_assertions)),
    windows_subsystem = "windows"
)]

//! Bergen Shell - Entry Point
//!
//! Host adapter around the lifecycle coordinator: translates winit and
//! native menu callbacks into coordinator hooks and runs the main event loop.

use anyhow::Result;
use std::ffi::OsString;
use bergen_shell::{
    bridge::{self, BridgeEvent, SharedViewState, UiBridge, TOGGLE_SIDEBAR},
    core::{
        action::ActionPayload,
        config::Config,
        coordinator::AppLifecycleCoordinator,
        events::{AppEvent, EventSender},
    },
    menu::{spawn_menu_forwarder, MenuBar, MenuManager},
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

/// Main application handler for winit event loop
struct App {
    /// Lifecycle coordinator (owned exclusively by the main thread)
    coordinator: AppLifecycleCoordinator,
    /// Events posted from menu and UI runtime threads
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Events published to the UI runtime
    bridge_rx: mpsc::UnboundedReceiver<BridgeEvent>,
    /// Native menu bar (attached on first resume)
    menu_bar: MenuBar,
    menu_attached: bool,
    /// View state shared with the default handlers
    view: SharedViewState,
    /// Main window hosting the UI runtime
    window: Option<Window>,
    /// Whether the first frame has been presented
    content_appeared: bool,
    config: Config,
}

impl App {
    /// Open-file menu item: ask for a file, then dispatch with it attached
    fn pick_document(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Markdown", self.config.documents.extensions.as_slice())
            .pick_file();

        match picked {
            Some(path) => {
                self.coordinator.on_menu_invoked(
                    bridge::OPEN_FILE,
                    Some(ActionPayload::Document(path)),
                );
            }
            None => debug!("Open dialog cancelled"),
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::MenuInvoked {
                identifier,
                payload,
            } => {
                if identifier == bridge::OPEN_FILE && payload.is_none() {
                    self.pick_document();
                    return;
                }
                let payload =
                    payload.or_else(|| self.menu_bar.is_checked(&identifier).map(ActionPayload::Flag));
                let delivery = self.coordinator.on_menu_invoked(&identifier, payload);
                debug!(identifier = %identifier, ?delivery, "Menu invocation handled");
            }
            AppEvent::OpenDocuments(references) => {
                let deliveries = self.coordinator.on_open_documents(references);
                debug!(?deliveries, "Document-open request handled");
            }
            AppEvent::SidebarStateChanged { collapsed } => {
                let visible = bridge::sidebar_state_changed(&self.view, collapsed);
                self.menu_bar.set_checked(TOGGLE_SIDEBAR, visible);
            }
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_app_event(event);
        }
    }

    /// No embedded runtime is linked into this binary; log what it would receive
    fn drain_bridge(&mut self) {
        while let Ok(event) = self.bridge_rx.try_recv() {
            info!(event = %event.name, body = %event.body, "UI bridge event");
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.menu_attached {
            self.menu_bar.attach();
            self.menu_attached = true;
        }

        if self.window.is_none() {
            match event_loop.create_window(Window::default_attributes().with_title("Bergen")) {
                Ok(window) => {
                    window.request_redraw();
                    self.window = Some(window);
                }
                Err(e) => error!("Failed to create main window: {}", e),
            }
        }

        self.coordinator.on_launch_finished();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::RedrawRequested if !self.content_appeared => {
                self.content_appeared = true;
                self.coordinator.on_content_ready();
            }
            WindowEvent::CloseRequested => {
                // Anything still in the channel is rejected from here on
                self.coordinator.on_will_terminate();
                event_loop.exit();
            }
            _ => {}
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, _event: ()) {
        self.drain_events();
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.drain_events();
        self.drain_bridge();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.coordinator.on_will_terminate();
        self.drain_bridge();
        info!(stats = ?self.coordinator.stats(), "Bergen shell exiting");
    }
}

/// First run: write the defaults so the user has a file to edit
fn write_default_config(config: &Config) {
    let path = match Config::config_path() {
        Ok(path) => path,
        Err(e) => {
            warn!("No configuration directory: {:#}", e);
            return;
        }
    };
    if path.exists() {
        return;
    }
    match config.save() {
        Ok(()) => info!(path = %path.display(), "Wrote default configuration"),
        Err(e) => warn!("Failed to write default configuration: {:#}", e),
    }
}

fn main() -> Result<()> {
    // Configuration first so it can supply the log filter
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bergen shell");
    match config_error {
        Some(e) => warn!("Failed to load configuration, using defaults: {:#}", e),
        None => write_default_config(&config),
    }

    // Create event channel
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    // Create event loop (the native menu must be built after this on macOS)
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let proxy = event_loop.create_proxy();
    let event_sender = EventSender::new(event_tx, proxy);

    // Handlers and menu bar
    let (ui_bridge, bridge_rx) = UiBridge::channel();
    let view = SharedViewState::default();
    let mut menu_manager = MenuManager::new();
    for problem in bridge::install_default_handlers(&mut menu_manager, &ui_bridge, &view) {
        warn!("Menu configuration problem: {}", problem);
    }

    let menu_bar = MenuBar::build(&config.menu, &mut menu_manager)?;
    info!(
        sections = config.menu.sections.len(),
        items = config.menu.items().count(),
        "Native menu configured"
    );

    let coordinator = AppLifecycleCoordinator::with_menu_manager(menu_manager);
    for problem in coordinator.validate() {
        warn!("Menu configuration problem: {}", problem);
    }

    // Command-line arguments are the launch-time document-open request
    let launch_documents: Vec<OsString> = std::env::args_os().skip(1).collect();
    if !launch_documents.is_empty() {
        info!(count = launch_documents.len(), "Documents requested at launch");
        if let Err(e) = event_sender.send(AppEvent::OpenDocuments(launch_documents)) {
            warn!("Failed to post launch documents: {}", e);
        }
    }
    spawn_menu_forwarder(event_sender);

    let mut app = App {
        coordinator,
        event_rx,
        bridge_rx,
        menu_bar,
        menu_attached: false,
        view,
        window: None,
        content_appeared: false,
        config,
    };

    // Run event loop
    event_loop.run_app(&mut app)?;

    Ok(())
}
