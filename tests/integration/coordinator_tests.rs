//! Coordinator integration tests

use bergen_shell::bridge::{
    install_default_handlers, sidebar_state_changed, SharedViewState, UiBridge, TOGGLE_SIDEBAR,
};
use bergen_shell::{
    ActionPayload, AppLifecycleCoordinator, ConfigError, Delivery, LifecyclePhase, MenuAction,
    MenuManager,
};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

type Log = Arc<Mutex<Vec<String>>>;

/// Coordinator with a recording handler for each identifier
fn recording_coordinator(ids: &[&str]) -> (AppLifecycleCoordinator, Log) {
    let log: Log = Arc::default();
    let mut coordinator = AppLifecycleCoordinator::new();
    for id in ids {
        let log = Arc::clone(&log);
        coordinator
            .register_action(*id, move |action: &MenuAction| {
                log.lock().push(action.identifier().to_string());
                Ok(())
            })
            .unwrap();
    }
    (coordinator, log)
}

#[test]
fn test_events_before_and_after_ready_keep_arrival_order() {
    let (mut coordinator, log) = recording_coordinator(&["A", "B", "C"]);

    coordinator.on_launch_finished();
    coordinator.on_menu_invoked("A", None);
    coordinator.on_menu_invoked("B", None);
    coordinator.on_content_ready();
    coordinator.on_menu_invoked("C", None);

    assert_eq!(*log.lock(), vec!["A", "B", "C"]);
}

#[test]
fn test_fifo_for_many_pre_ready_sequences() {
    let ids = ["a", "b", "c", "d"];

    for len in 0..12usize {
        let (mut coordinator, log) = recording_coordinator(&ids);
        coordinator.on_launch_finished();

        let arrivals: Vec<&str> = (0..len).map(|i| ids[(i * 7 + len) % ids.len()]).collect();
        for id in &arrivals {
            assert_eq!(coordinator.on_menu_invoked(id, None), Delivery::Queued);
        }
        assert_eq!(coordinator.pending(), len);

        coordinator.on_content_ready();
        assert_eq!(*log.lock(), arrivals);
        assert_eq!(coordinator.stats().dispatched, len as u64);
        assert_eq!(coordinator.pending(), 0);
    }
}

#[test]
fn test_second_readiness_signal_is_noop() {
    let (mut coordinator, log) = recording_coordinator(&["A"]);

    coordinator.on_launch_finished();
    coordinator.on_menu_invoked("A", None);
    coordinator.on_content_ready();
    coordinator.on_content_ready();

    assert_eq!(*log.lock(), vec!["A"]);
    assert_eq!(coordinator.stats().dispatched, 1);
}

#[test]
fn test_terminate_discards_queued_actions() {
    let (mut coordinator, log) = recording_coordinator(&["A"]);

    coordinator.on_launch_finished();
    coordinator.on_menu_invoked("A", None);
    coordinator.on_will_terminate();

    assert!(log.lock().is_empty());
    assert_eq!(coordinator.stats().discarded, 1);
    assert_eq!(coordinator.stats().dispatched, 0);

    // late readiness signal changes nothing
    coordinator.on_content_ready();
    assert!(log.lock().is_empty());
    assert_eq!(coordinator.phase(), LifecyclePhase::Terminating);
}

#[test]
fn test_every_action_dispatched_or_discarded_once() {
    let (mut coordinator, log) = recording_coordinator(&["A", "B"]);

    coordinator.on_launch_finished();
    coordinator.on_menu_invoked("A", None);
    coordinator.on_content_ready();
    coordinator.on_menu_invoked("B", None);
    coordinator.on_will_terminate();
    coordinator.on_menu_invoked("A", None);

    let stats = coordinator.stats();
    assert_eq!(*log.lock(), vec!["A", "B"]);
    assert_eq!(stats.dispatched, 2);
    assert_eq!(stats.discarded, 0);
    assert_eq!(stats.rejected, 1);
}

#[test]
fn test_unknown_identifier_does_nothing() {
    let (mut coordinator, log) = recording_coordinator(&["A"]);

    coordinator.on_launch_finished();
    assert_eq!(coordinator.on_menu_invoked("xyz", None), Delivery::Unhandled);
    assert_eq!(coordinator.pending(), 0);

    coordinator.on_content_ready();
    assert_eq!(coordinator.on_menu_invoked("xyz", None), Delivery::Unhandled);
    assert!(log.lock().is_empty());
    assert_eq!(coordinator.stats().unhandled, 2);
}

#[test]
fn test_failed_handler_does_not_block_later_actions() {
    let (mut coordinator, log) = recording_coordinator(&["B"]);
    coordinator
        .register_action("A", |_| anyhow::bail!("disk full"))
        .unwrap();

    coordinator.on_launch_finished();
    coordinator.on_menu_invoked("A", None);
    coordinator.on_menu_invoked("B", None);
    coordinator.on_content_ready();

    assert_eq!(*log.lock(), vec!["B"]);
    assert_eq!(coordinator.stats().failed, 1);
    assert_eq!(coordinator.phase(), LifecyclePhase::Ready);

    assert_eq!(coordinator.on_menu_invoked("A", None), Delivery::Failed);
    assert_eq!(coordinator.on_menu_invoked("B", None), Delivery::Dispatched);
}

#[test]
fn test_phase_history_is_monotonic() {
    let (mut coordinator, _) = recording_coordinator(&[]);

    coordinator.on_launch_finished();
    coordinator.on_launch_finished();
    coordinator.on_content_ready();
    coordinator.on_launch_finished();
    coordinator.on_will_terminate();
    coordinator.on_content_ready();
    coordinator.on_will_terminate();

    let history = coordinator.phase_history();
    assert_eq!(history, LifecyclePhase::all());
    assert!(history.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_terminate_before_ready_skips_ready() {
    let (mut coordinator, _) = recording_coordinator(&[]);
    coordinator.on_launch_finished();
    coordinator.on_will_terminate();

    assert_eq!(
        coordinator.phase_history(),
        &[
            LifecyclePhase::Launching,
            LifecyclePhase::ContentLoading,
            LifecyclePhase::Terminating
        ]
    );
}

#[test]
fn test_documents_opened_at_launch_reach_ui_after_ready() {
    let (bridge, mut rx) = UiBridge::channel();
    let view = SharedViewState::default();
    let mut menu = MenuManager::new();
    assert!(install_default_handlers(&mut menu, &bridge, &view).is_empty());
    let mut coordinator = AppLifecycleCoordinator::with_menu_manager(menu);

    coordinator.on_launch_finished();
    let deliveries = coordinator.on_open_documents(["/docs/one.md", "/docs/two.md"]);
    assert_eq!(deliveries, vec![Delivery::Queued, Delivery::Queued]);
    coordinator.on_menu_invoked(TOGGLE_SIDEBAR, Some(ActionPayload::Flag(true)));
    assert!(rx.try_recv().is_err());

    coordinator.on_content_ready();

    let bodies: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
        .map(|event| (event.name, event.body))
        .collect();
    assert_eq!(
        bodies,
        vec![
            (
                "fileMenuAction".to_string(),
                json!({ "action": "fileSelected", "path": "/docs/one.md" })
            ),
            (
                "fileMenuAction".to_string(),
                json!({ "action": "fileSelected", "path": "/docs/two.md" })
            ),
            (
                "viewMenuAction".to_string(),
                json!({ "action": "toggleSidebar", "show": true })
            ),
        ]
    );
    assert!(view.read().sidebar_visible);
}

#[test]
fn test_disconnected_ui_is_a_handler_failure() {
    let (bridge, rx) = UiBridge::channel();
    let view = SharedViewState::default();
    let mut menu = MenuManager::new();
    install_default_handlers(&mut menu, &bridge, &view);
    let mut coordinator = AppLifecycleCoordinator::with_menu_manager(menu);
    drop(rx);

    coordinator.on_launch_finished();
    coordinator.on_content_ready();
    assert_eq!(
        coordinator.on_open_documents(["/docs/one.md"]),
        vec![Delivery::Failed]
    );
    assert_eq!(coordinator.phase(), LifecyclePhase::Ready);
}

#[test]
fn test_configuration_errors_surface_at_startup() {
    let mut menu = MenuManager::new();
    menu.declare_item("openFile");
    menu.declare_item("print");
    menu.register_action("openFile", |_| Ok(())).unwrap();
    let mut coordinator = AppLifecycleCoordinator::with_menu_manager(menu);

    assert_eq!(
        coordinator.validate(),
        vec![ConfigError::MissingHandler {
            identifier: "print".to_string()
        }]
    );
    assert!(matches!(
        coordinator.register_action("openFile", |_| Ok(())),
        Err(ConfigError::DuplicateHandler { .. })
    ));
    assert_eq!(coordinator.menu_manager().identifiers(), vec!["openFile"]);
}

#[test]
fn test_actions_behind_terminate_are_rejected() {
    let (mut coordinator, log) = recording_coordinator(&["A", "openDocument"]);

    coordinator.on_launch_finished();
    coordinator.on_content_ready();
    coordinator.on_will_terminate();

    // the rest of an already drained batch
    assert_eq!(coordinator.on_menu_invoked("A", None), Delivery::Rejected);
    assert_eq!(
        coordinator.on_open_documents(["/docs/one.md"]),
        vec![Delivery::Rejected]
    );
    assert!(log.lock().is_empty());
    assert_eq!(coordinator.stats().rejected, 2);

    // exit callback repeats the hook
    coordinator.on_will_terminate();
    assert_eq!(coordinator.phase_history().len(), 4);
}

#[cfg(unix)]
#[test]
fn test_non_utf8_document_is_a_handler_failure() {
    use std::ffi::{OsStr, OsString};
    use std::os::unix::ffi::OsStrExt;

    let (bridge, mut rx) = UiBridge::channel();
    let view = SharedViewState::default();
    let mut menu = MenuManager::new();
    install_default_handlers(&mut menu, &bridge, &view);
    let mut coordinator = AppLifecycleCoordinator::with_menu_manager(menu);

    coordinator.on_launch_finished();
    let references: Vec<OsString> = vec![
        OsStr::from_bytes(b"/tmp/caf\xe9.md").to_owned(),
        "file:///tmp/caf%E9.md".into(),
        "file:///tmp/caf%C3%A9.md".into(),
    ];
    assert_eq!(
        coordinator.on_open_documents(references),
        vec![Delivery::Queued; 3]
    );
    coordinator.on_content_ready();

    assert_eq!(coordinator.stats().failed, 2);
    let event = rx.try_recv().unwrap();
    assert_eq!(
        event.body,
        json!({ "action": "fileSelected", "path": "/tmp/café.md" })
    );
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_ui_collapse_then_menu_toggle_shows_sidebar() {
    let (bridge, mut rx) = UiBridge::channel();
    let view = SharedViewState::default();
    let mut menu = MenuManager::new();
    install_default_handlers(&mut menu, &bridge, &view);
    let mut coordinator = AppLifecycleCoordinator::with_menu_manager(menu);

    coordinator.on_launch_finished();
    coordinator.on_content_ready();
    coordinator.on_menu_invoked(TOGGLE_SIDEBAR, Some(ActionPayload::Flag(true)));
    assert!(view.read().sidebar_visible);

    assert!(!sidebar_state_changed(&view, true));
    assert!(!view.read().sidebar_visible);

    assert_eq!(
        coordinator.on_menu_invoked(TOGGLE_SIDEBAR, None),
        Delivery::Dispatched
    );
    let bodies: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
        .map(|event| event.body)
        .collect();
    assert_eq!(
        bodies,
        vec![
            json!({ "action": "toggleSidebar", "show": true }),
            json!({ "action": "toggleSidebar", "show": true }),
        ]
    );
    assert!(view.read().sidebar_visible);
}
