//! Panel state and its transition function
//!
//! Every change to the panel goes through [`PanelState::apply`], so the
//! connection state machine can be exercised without a backend or a view:
//!
//! ```text
//! Disconnected --ConnectRequested-->    Connecting --ConnectSucceeded-->    Connected
//! Connected    --DisconnectRequested--> Connecting --DisconnectSucceeded--> Disconnected
//! ```
//!
//! Failures roll back to the state the operation started from. Each request
//! bumps `generation`; completions carry the generation they were issued
//! under and are dropped when it is no longer current.

use crate::types::ServerDescriptor;
use chrono::{DateTime, Local};

/// Connection status shown by the panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Not connected
    #[default]
    Disconnected,

    /// A connect or disconnect is in flight
    Connecting,

    /// Successfully connected
    Connected,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Disconnected => write!(f, "disconnected"),
            ConnectionStatus::Connecting => write!(f, "connecting"),
            ConnectionStatus::Connected => write!(f, "connected"),
        }
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// Catalog fetched from the backend; accepted only once
    CatalogLoaded(Vec<ServerDescriptor>),

    /// Catalog fetch failed
    CatalogFailed { reason: String },

    /// User toggled the server list
    ServerListToggled,

    /// User dismissed the failure notice
    NoticeDismissed,

    /// Connect started; `target` is shown optimistically while pending
    ConnectRequested { target: Option<ServerDescriptor> },

    /// Disconnect started
    DisconnectRequested,

    ConnectSucceeded {
        token: u64,
        server: ServerDescriptor,
        at: DateTime<Local>,
        close_server_list: bool,
    },

    ConnectFailed { token: u64, reason: String },

    DisconnectSucceeded { token: u64 },

    DisconnectFailed { token: u64, reason: String },
}

/// Everything the panel displays
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelState {
    pub status: ConnectionStatus,
    pub active_server: Option<ServerDescriptor>,
    pub catalog: Vec<ServerDescriptor>,
    /// Set once the catalog has been fetched; the catalog is read-only after
    pub catalog_loaded: bool,
    pub show_server_list: bool,
    /// Failure notice shown until dismissed or the next request
    pub notice: Option<String>,
    /// When the current connection was established
    pub connected_at: Option<DateTime<Local>>,
    /// Request token of the most recent operation
    pub generation: u64,
}

impl PanelState {
    /// Create the initial state: disconnected, no server, empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    pub fn is_connecting(&self) -> bool {
        self.status == ConnectionStatus::Connecting
    }

    /// Whether `server` should carry the "Active" marker
    pub fn is_active(&self, server: &ServerDescriptor) -> bool {
        self.is_connected()
            && self
                .active_server
                .as_ref()
                .is_some_and(|active| active.same_server(server))
    }

    /// Apply an event in place
    ///
    /// Returns `false` when the event was rejected and the state is
    /// unchanged: a request while another operation is in flight, a request
    /// from the wrong stable state, a completion with a stale token, or a
    /// second catalog.
    pub fn apply(&mut self, event: PanelEvent) -> bool {
        match event {
            PanelEvent::CatalogLoaded(servers) => {
                if self.catalog_loaded {
                    return false;
                }
                self.catalog = servers;
                self.catalog_loaded = true;
                true
            }
            PanelEvent::CatalogFailed { reason } => {
                self.notice = Some(reason);
                true
            }
            PanelEvent::ServerListToggled => {
                self.show_server_list = !self.show_server_list;
                true
            }
            PanelEvent::NoticeDismissed => self.notice.take().is_some(),
            PanelEvent::ConnectRequested { target } => {
                if self.status != ConnectionStatus::Disconnected {
                    return false;
                }
                self.begin();
                self.active_server = target;
                true
            }
            PanelEvent::DisconnectRequested => {
                if self.status != ConnectionStatus::Connected {
                    return false;
                }
                self.begin();
                true
            }
            PanelEvent::ConnectSucceeded {
                token,
                server,
                at,
                close_server_list,
            } => {
                if !self.completes(token) {
                    return false;
                }
                self.status = ConnectionStatus::Connected;
                self.active_server = Some(server);
                self.connected_at = Some(at);
                if close_server_list {
                    self.show_server_list = false;
                }
                true
            }
            PanelEvent::ConnectFailed { token, reason } => {
                if !self.completes(token) {
                    return false;
                }
                self.status = ConnectionStatus::Disconnected;
                self.active_server = None;
                self.connected_at = None;
                self.notice = Some(reason);
                true
            }
            PanelEvent::DisconnectSucceeded { token } => {
                if !self.completes(token) {
                    return false;
                }
                self.status = ConnectionStatus::Disconnected;
                self.active_server = None;
                self.connected_at = None;
                true
            }
            PanelEvent::DisconnectFailed { token, reason } => {
                if !self.completes(token) {
                    return false;
                }
                // active_server and connected_at were never cleared
                self.status = ConnectionStatus::Connected;
                self.notice = Some(reason);
                true
            }
        }
    }

    fn begin(&mut self) {
        self.status = ConnectionStatus::Connecting;
        self.generation += 1;
        self.notice = None;
    }

    fn completes(&self, token: u64) -> bool {
        self.status == ConnectionStatus::Connecting && token == self.generation
    }
}

/// Pure form of [`PanelState::apply`]
pub fn reduce(state: &PanelState, event: PanelEvent) -> PanelState {
    let mut next = state.clone();
    next.apply(event);
    next
}
