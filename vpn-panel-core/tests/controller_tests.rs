//! Integration tests for the connection controller
//!
//! Time is paused, so simulated backend delays elapse instantly while
//! ordering between concurrent operations is preserved.

use std::sync::Arc;
use std::time::Duration;
use vpn_panel_core::config::PanelConfig;
use vpn_panel_core::error::{BackendError, Operation};
use vpn_panel_core::types::{default_catalog, ServerDescriptor};
use vpn_panel_core::vpn::{ConnectionController, ConnectionStatus, MockBackend, Outcome};

async fn started() -> (Arc<MockBackend>, ConnectionController) {
    let backend = Arc::new(MockBackend::new(&PanelConfig::default()));
    let controller = ConnectionController::new(backend.clone());
    assert_eq!(controller.start().await, Outcome::Completed);
    (backend, controller)
}

fn server(name: &str) -> ServerDescriptor {
    default_catalog()
        .into_iter()
        .find(|s| s.name == name)
        .expect("server in default catalog")
}

#[tokio::test(start_paused = true)]
async fn test_catalog_is_fetched_once() {
    // Given: A controller that has loaded its catalog
    let (backend, controller) = started().await;
    let catalog = controller.snapshot().catalog;

    // When: Starting it again
    let outcome = controller.start().await;

    // Then: Ignored without another backend call, catalog unchanged
    assert_eq!(outcome, Outcome::Ignored);
    assert_eq!(backend.list_calls(), 1);
    assert_eq!(controller.snapshot().catalog, catalog);
}

#[tokio::test(start_paused = true)]
async fn test_toggle_connects_to_default_server() {
    // Given: A disconnected controller
    let (backend, controller) = started().await;
    assert_eq!(controller.status(), ConnectionStatus::Disconnected);

    // When: Toggling the connection
    let outcome = controller.toggle_connection().await;

    // Then: Connected to the backend's default server
    assert_eq!(outcome, Outcome::Completed);
    let state = controller.snapshot();
    assert_eq!(state.status, ConnectionStatus::Connected);
    let active = state.active_server.expect("active server");
    assert_eq!(active.name, "US East Server");
    assert_eq!(active.location, "New York, USA");
    assert_eq!(active.ping_millis, 23);
    assert_eq!(backend.connect_calls(), 1);
    assert_eq!(backend.disconnect_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_toggle_disconnects_when_connected() {
    // Given: A connected controller
    let (backend, controller) = started().await;
    controller.toggle_connection().await;

    // When: Toggling again
    let outcome = controller.toggle_connection().await;

    // Then: Disconnected with no active server, one call each way
    assert_eq!(outcome, Outcome::Completed);
    let state = controller.snapshot();
    assert_eq!(state.status, ConnectionStatus::Disconnected);
    assert!(state.active_server.is_none());
    assert_eq!(backend.connect_calls(), 1);
    assert_eq!(backend.disconnect_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_toggle_sequence_alternates() {
    let (_backend, controller) = started().await;

    let expected = [
        ConnectionStatus::Connected,
        ConnectionStatus::Disconnected,
        ConnectionStatus::Connected,
        ConnectionStatus::Disconnected,
        ConnectionStatus::Connected,
    ];

    for status in expected {
        controller.toggle_connection().await;
        assert_eq!(controller.status(), status);
    }
}

#[tokio::test(start_paused = true)]
async fn test_select_while_disconnected() {
    // Given: A disconnected controller with the server list open
    let (backend, controller) = started().await;
    controller.toggle_server_list();
    assert!(controller.snapshot().show_server_list);

    // When: Selecting the UK server
    let outcome = controller.select_server(server("UK Server")).await;

    // Then: Connected to it, list closed, no teardown issued
    assert_eq!(outcome, Outcome::Completed);
    let state = controller.snapshot();
    assert_eq!(state.status, ConnectionStatus::Connected);
    assert_eq!(state.active_server, Some(server("UK Server")));
    assert!(!state.show_server_list);
    assert_eq!(backend.disconnect_calls(), 0);
    assert_eq!(backend.connect_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_select_while_connected_disconnects_first() {
    // Given: Connected to US East
    let (backend, controller) = started().await;
    controller.toggle_connection().await;
    assert_eq!(
        controller.snapshot().active_server.map(|s| s.name),
        Some("US East Server".to_string())
    );

    // When: Switching to Japan
    let outcome = controller.select_server(server("Japan Server")).await;

    // Then: A disconnect was issued and the new server is active
    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(backend.disconnect_calls(), 1);
    assert_eq!(backend.connect_calls(), 2);
    let state = controller.snapshot();
    assert_eq!(state.status, ConnectionStatus::Connected);
    assert_eq!(state.active_server, Some(server("Japan Server")));
}

#[tokio::test(start_paused = true)]
async fn test_select_shows_target_while_pending() {
    let (_backend, controller) = started().await;
    let target = server("Germany Server");

    let select = controller.select_server(target.clone());
    tokio::pin!(select);

    // Run until the backend call is pending
    tokio::select! {
        _ = &mut select => panic!("select should still be pending"),
        _ = tokio::time::sleep(Duration::from_millis(100)) => {}
    }

    let pending = controller.snapshot();
    assert_eq!(pending.status, ConnectionStatus::Connecting);
    assert_eq!(pending.active_server, Some(target.clone()));
    assert!(!pending.is_active(&target));

    assert_eq!(select.await, Outcome::Completed);
    assert!(controller.snapshot().is_active(&target));
}

#[tokio::test(start_paused = true)]
async fn test_select_teardown_failure_does_not_block_switch() {
    // Given: Connected, with disconnects failing
    let (backend, controller) = started().await;
    controller.toggle_connection().await;
    backend.set_fail_disconnect(true);

    // When: Switching servers
    let outcome = controller.select_server(server("US West Server")).await;

    // Then: The switch still happens
    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(
        controller.snapshot().active_server,
        Some(server("US West Server"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_connect_failure_reverts_to_disconnected() {
    let (backend, controller) = started().await;
    backend.set_fail_connect(true);

    let outcome = controller.toggle_connection().await;

    assert_eq!(
        outcome,
        Outcome::Failed(BackendError::rejected(Operation::Connect))
    );
    let state = controller.snapshot();
    assert_eq!(state.status, ConnectionStatus::Disconnected);
    assert!(state.active_server.is_none());
    assert_eq!(
        state.notice.as_deref(),
        Some("connect failed: backend reported failure")
    );

    // The notice clears on dismissal
    controller.dismiss_notice();
    assert!(controller.snapshot().notice.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_select_failure_clears_optimistic_server() {
    let (backend, controller) = started().await;
    backend.set_fail_connect(true);

    let outcome = controller.select_server(server("UK Server")).await;

    assert!(matches!(outcome, Outcome::Failed(_)));
    let state = controller.snapshot();
    assert_eq!(state.status, ConnectionStatus::Disconnected);
    assert!(state.active_server.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_failure_stays_connected() {
    let (backend, controller) = started().await;
    controller.toggle_connection().await;
    backend.set_fail_disconnect(true);

    let outcome = controller.toggle_connection().await;

    assert!(matches!(outcome, Outcome::Failed(_)));
    let state = controller.snapshot();
    assert_eq!(state.status, ConnectionStatus::Connected);
    assert_eq!(state.active_server.map(|s| s.id), Some("us-east".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_back_to_back_toggles_only_first_applies() {
    // Given: A disconnected controller
    let (backend, controller) = started().await;

    // When: Two toggles are issued without waiting in between
    let (first, second) = tokio::join!(controller.toggle_connection(), controller.toggle_connection());

    // Then: The second is ignored and the first decides the final state
    assert_eq!(first, Outcome::Completed);
    assert_eq!(second, Outcome::Ignored);
    assert_eq!(controller.status(), ConnectionStatus::Connected);
    assert_eq!(backend.connect_calls(), 1);
    assert_eq!(backend.disconnect_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_select_during_toggle_is_ignored() {
    let (backend, controller) = started().await;

    let (toggle, select) = tokio::join!(
        controller.toggle_connection(),
        controller.select_server(server("Japan Server"))
    );

    assert_eq!(toggle, Outcome::Completed);
    assert_eq!(select, Outcome::Ignored);
    let state = controller.snapshot();
    assert_eq!(state.status, ConnectionStatus::Connected);
    assert_eq!(state.active_server.map(|s| s.name), Some("US East Server".to_string()));
    assert_eq!(backend.connect_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_see_every_transition() {
    let (_backend, controller) = started().await;
    let mut rx = controller.subscribe();
    rx.borrow_and_update();

    let watcher = async {
        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            let status = rx.borrow_and_update().status;
            seen.push(status);
            if status == ConnectionStatus::Connected {
                break;
            }
        }
        seen
    };

    let (_, seen) = tokio::join!(controller.toggle_connection(), watcher);
    assert_eq!(
        seen,
        vec![ConnectionStatus::Connecting, ConnectionStatus::Connected]
    );
}
