//! View model for the panel
//!
//! Turns a [`PanelState`] snapshot into the labels, flags and rows a
//! front-end needs. Rendering itself (colours, layout) is left to the caller.

use crate::types::ServerDescriptor;
use crate::vpn::state::{ConnectionStatus, PanelState};

/// A clickable control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionView {
    pub label: &'static str,
    pub enabled: bool,
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRow {
    pub server: ServerDescriptor,
    pub active: bool,
    pub enabled: bool,
}

/// Connection details, only present while connected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsView {
    pub status: &'static str,
    pub server: String,
    pub location: String,
    pub latency: String,
    pub connected_since: Option<String>,
}

/// Everything a front-end draws for one state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub status: ConnectionStatus,
    pub status_text: &'static str,
    /// Flag, name, location and ping of the active server when connected
    pub summary: Option<String>,
    pub primary_action: ActionView,
    pub list_toggle: ActionView,
    /// Empty when the list is hidden
    pub rows: Vec<ServerRow>,
    pub details: Option<DetailsView>,
    pub notice: Option<String>,
}

impl PanelView {
    pub fn from_state(state: &PanelState) -> Self {
        let busy = state.is_connecting();
        let connected_server = state
            .active_server
            .as_ref()
            .filter(|_| state.is_connected());

        let status_text = match state.status {
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Connecting => "Connecting...",
            ConnectionStatus::Disconnected => "Disconnected",
        };

        let primary_label = match state.status {
            ConnectionStatus::Connected => "Disconnect",
            ConnectionStatus::Connecting => "Connecting...",
            ConnectionStatus::Disconnected => "Connect",
        };

        let rows = if state.show_server_list {
            state
                .catalog
                .iter()
                .map(|server| ServerRow {
                    server: server.clone(),
                    active: state.is_active(server),
                    enabled: !busy,
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            status: state.status,
            status_text,
            summary: connected_server.map(|server| {
                format!(
                    "{} {} ({}), Ping: {}ms",
                    server.flag, server.name, server.location, server.ping_millis
                )
            }),
            primary_action: ActionView {
                label: primary_label,
                enabled: !busy,
            },
            list_toggle: ActionView {
                label: if state.show_server_list {
                    "Hide Servers"
                } else {
                    "Show Servers"
                },
                enabled: true,
            },
            rows,
            details: connected_server.map(|server| DetailsView {
                status: "Secure",
                server: server.name.clone(),
                location: server.location.clone(),
                latency: format!("{}ms", server.ping_millis),
                connected_since: state
                    .connected_at
                    .map(|at| at.format("%H:%M:%S").to_string()),
            }),
            notice: state.notice.clone(),
        }
    }
}
