//! Connection controller
//!
//! Owns the panel state and drives it from user requests and backend
//! responses. State is published through a `watch` channel so any number
//! of views can follow it while the controller remains the single writer.

use crate::error::{BackendError, Operation};
use crate::types::{ConnectResponse, ServerDescriptor};
use crate::vpn::backend::Backend;
use crate::vpn::state::{ConnectionStatus, PanelEvent, PanelState};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// How a user request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The backend call succeeded and the state was updated
    Completed,

    /// The backend call failed; the state was rolled back
    Failed(BackendError),

    /// Rejected up front: an operation was in flight, or the catalog was
    /// already loaded
    Ignored,
}

/// Drives the connection state machine against a [`Backend`]
pub struct ConnectionController {
    backend: Arc<dyn Backend>,
    state_tx: watch::Sender<PanelState>,
}

impl ConnectionController {
    /// Create a controller in the initial disconnected state
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (state_tx, _state_rx) = watch::channel(PanelState::new());
        Self { backend, state_tx }
    }

    /// Subscribe to state updates
    pub fn subscribe(&self) -> watch::Receiver<PanelState> {
        self.state_tx.subscribe()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> PanelState {
        self.state_tx.borrow().clone()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.state_tx.borrow().status
    }

    /// Load the server catalog
    ///
    /// The catalog is fetched once; later calls are ignored without touching
    /// the backend. A failed fetch may be retried.
    #[tracing::instrument(skip(self))]
    pub async fn start(&self) -> Outcome {
        let loaded = self.state_tx.borrow().catalog_loaded;
        if loaded {
            debug!("Catalog already loaded");
            return Outcome::Ignored;
        }

        match self.backend.list_servers().await {
            Ok(servers) => {
                let count = servers.len();
                if !self.dispatch(PanelEvent::CatalogLoaded(servers)) {
                    debug!("Catalog loaded concurrently, dropping {} servers", count);
                    return Outcome::Ignored;
                }
                info!("Loaded {} servers", count);
                Outcome::Completed
            }
            Err(e) => {
                warn!("Failed to load server catalog: {}", e);
                self.dispatch(PanelEvent::CatalogFailed {
                    reason: e.to_string(),
                });
                Outcome::Failed(e)
            }
        }
    }

    /// Connect when disconnected, disconnect when connected
    ///
    /// Ignored while an operation is in flight. Issues exactly one backend
    /// call and never retries.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_connection(&self) -> Outcome {
        match self.status() {
            ConnectionStatus::Connecting => {
                debug!("Toggle ignored, operation in flight");
                Outcome::Ignored
            }
            ConnectionStatus::Connected => self.disconnect().await,
            ConnectionStatus::Disconnected => {
                let Some(token) = self.request(PanelEvent::ConnectRequested { target: None })
                else {
                    return Outcome::Ignored;
                };
                info!("Connecting to default server");
                self.finish_connect(token, None, false).await
            }
        }
    }

    /// Switch to `target`
    ///
    /// An existing connection is torn down first on a best-effort basis:
    /// the disconnect is awaited but its result does not stop the switch.
    /// The target is shown as the active server while the connect is pending.
    #[tracing::instrument(skip(self, target), fields(server = %target.id))]
    pub async fn select_server(&self, target: ServerDescriptor) -> Outcome {
        let token = match self.status() {
            ConnectionStatus::Connecting => {
                debug!("Server selection ignored, operation in flight");
                return Outcome::Ignored;
            }
            ConnectionStatus::Disconnected => {
                match self.request(PanelEvent::ConnectRequested {
                    target: Some(target.clone()),
                }) {
                    Some(token) => token,
                    None => return Outcome::Ignored,
                }
            }
            ConnectionStatus::Connected => {
                let Some(teardown) = self.request(PanelEvent::DisconnectRequested) else {
                    return Outcome::Ignored;
                };

                info!("Disconnecting before switching to {}", target.name);
                match self.backend.disconnect().await {
                    Ok(response) if response.success => debug!("Teardown complete"),
                    Ok(_) => warn!("Teardown reported failure, switching anyway"),
                    Err(e) => warn!("Teardown failed ({}), switching anyway", e),
                }

                self.switch_over(teardown, &target)
            }
        };

        info!("Connecting to {}", target.name);
        self.finish_connect(token, Some(&target), true).await
    }

    /// Show or hide the server list
    pub fn toggle_server_list(&self) {
        self.dispatch(PanelEvent::ServerListToggled);
    }

    /// Clear the failure notice
    pub fn dismiss_notice(&self) {
        self.dispatch(PanelEvent::NoticeDismissed);
    }

    async fn disconnect(&self) -> Outcome {
        let Some(token) = self.request(PanelEvent::DisconnectRequested) else {
            return Outcome::Ignored;
        };

        info!("Disconnecting");
        let result = match self.backend.disconnect().await {
            Ok(response) if response.success => Ok(()),
            Ok(_) => Err(BackendError::rejected(Operation::Disconnect)),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => self.complete(PanelEvent::DisconnectSucceeded { token }, Outcome::Completed),
            Err(e) => {
                warn!("Disconnect failed, staying connected: {}", e);
                self.complete(
                    PanelEvent::DisconnectFailed {
                        token,
                        reason: e.to_string(),
                    },
                    Outcome::Failed(e),
                )
            }
        }
    }

    async fn finish_connect(
        &self,
        token: u64,
        target: Option<&ServerDescriptor>,
        close_server_list: bool,
    ) -> Outcome {
        let result = match self.backend.connect(target).await {
            Ok(ConnectResponse {
                success: true,
                server: Some(server),
            }) => Ok(server),
            Ok(ConnectResponse {
                success: true,
                server: None,
            }) => Err(BackendError::MissingServer),
            Ok(_) => Err(BackendError::rejected(Operation::Connect)),
            Err(e) => Err(e),
        };

        match result {
            Ok(server) => {
                info!("Connected to {} ({})", server.name, server.location);
                self.complete(
                    PanelEvent::ConnectSucceeded {
                        token,
                        server,
                        at: chrono::Local::now(),
                        close_server_list,
                    },
                    Outcome::Completed,
                )
            }
            Err(e) => {
                warn!("Connect failed, reverting to disconnected: {}", e);
                self.complete(
                    PanelEvent::ConnectFailed {
                        token,
                        reason: e.to_string(),
                    },
                    Outcome::Failed(e),
                )
            }
        }
    }

    /// Finish a teardown and start the follow-up connect in one update
    ///
    /// The `Connecting` guard keeps every other request out between the two
    /// events, so both are accepted and the returned token is the connect's.
    fn switch_over(&self, teardown: u64, target: &ServerDescriptor) -> u64 {
        let mut token = teardown;
        self.state_tx.send_if_modified(|state| {
            let torn_down = state.apply(PanelEvent::DisconnectSucceeded { token: teardown });
            let requested = state.apply(PanelEvent::ConnectRequested {
                target: Some(target.clone()),
            });
            token = state.generation;
            torn_down || requested
        });
        token
    }

    /// Apply a request event, returning its token when accepted
    fn request(&self, event: PanelEvent) -> Option<u64> {
        let mut token = None;
        self.state_tx.send_if_modified(|state| {
            let accepted = state.apply(event);
            if accepted {
                token = Some(state.generation);
            }
            accepted
        });
        token
    }

    /// Apply a completion; the reducer drops it if its token is stale
    fn complete(&self, event: PanelEvent, outcome: Outcome) -> Outcome {
        if !self.dispatch(event) {
            debug!("Stale completion dropped");
        }
        outcome
    }

    fn dispatch(&self, event: PanelEvent) -> bool {
        self.state_tx.send_if_modified(|state| state.apply(event))
    }
}
