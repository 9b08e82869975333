//! Type definitions shared by the backend, controller and views
//!
//! Server descriptors are plain immutable values. Identity is the `id`
//! slug, never the display name, so two catalog entries that happen to
//! share a name are still told apart by the "Active" marker.

use serde::{Deserialize, Serialize};

/// A selectable VPN server from the catalog
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDescriptor {
    /// Stable identifier (e.g. "us-east")
    pub id: String,
    /// Display name
    pub name: String,
    /// Human readable location
    pub location: String,
    /// Advertised latency in milliseconds
    pub ping_millis: u32,
    /// Flag glyph shown next to the name
    pub flag: String,
}

impl ServerDescriptor {
    /// Create a new server descriptor
    pub fn new(id: &str, name: &str, location: &str, ping_millis: u32, flag: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            location: location.to_string(),
            ping_millis,
            flag: flag.to_string(),
        }
    }

    /// Whether both descriptors refer to the same server
    pub fn same_server(&self, other: &ServerDescriptor) -> bool {
        self.id == other.id
    }
}

/// Identifier of the server returned by a plain connect
pub const DEFAULT_SERVER_ID: &str = "us-east";

/// The built-in server catalog
pub fn default_catalog() -> Vec<ServerDescriptor> {
    vec![
        ServerDescriptor::new("us-east", "US East Server", "New York, USA", 23, "🇺🇸"),
        ServerDescriptor::new("us-west", "US West Server", "Los Angeles, USA", 45, "🇺🇸"),
        ServerDescriptor::new("uk", "UK Server", "London, UK", 12, "🇬🇧"),
        ServerDescriptor::new("de", "Germany Server", "Frankfurt, Germany", 18, "🇩🇪"),
        ServerDescriptor::new("jp", "Japan Server", "Tokyo, Japan", 89, "🇯🇵"),
    ]
}

/// Response to a connect call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectResponse {
    pub success: bool,
    pub server: Option<ServerDescriptor>,
}

/// Response to a disconnect call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisconnectResponse {
    pub success: bool,
}
