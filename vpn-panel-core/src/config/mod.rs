//! Configuration module
//!
//! Handles loading and saving panel configuration from TOML files.

use crate::types::{default_catalog, ServerDescriptor, DEFAULT_SERVER_ID};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod toml_config;

/// Upper bound for any simulated delay
const MAX_DELAY_MS: u64 = 60_000;

/// Panel configuration structure
///
/// Tunes the simulated backend. Nothing here describes a real tunnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Simulated connect latency in milliseconds
    pub connect_delay_ms: u64,

    /// Simulated disconnect latency in milliseconds
    pub disconnect_delay_ms: u64,

    /// Simulated catalog fetch latency in milliseconds
    pub catalog_delay_ms: u64,

    /// Id of the server a plain connect lands on
    pub default_server: String,

    /// Optional catalog override; the built-in catalog is used when absent
    pub servers: Option<Vec<ServerDescriptor>>,
}

impl PanelConfig {
    /// Catalog served by the backend
    pub fn catalog(&self) -> Vec<ServerDescriptor> {
        self.servers.clone().unwrap_or_else(default_catalog)
    }

    /// Descriptor of the default server, if it is part of the catalog
    pub fn default_server_descriptor(&self) -> Option<ServerDescriptor> {
        self.catalog()
            .into_iter()
            .find(|server| server.id == self.default_server)
    }

    pub fn connect_delay(&self) -> Duration {
        Duration::from_millis(self.connect_delay_ms)
    }

    pub fn disconnect_delay(&self) -> Duration {
        Duration::from_millis(self.disconnect_delay_ms)
    }

    pub fn catalog_delay(&self) -> Duration {
        Duration::from_millis(self.catalog_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("connect_delay_ms", self.connect_delay_ms),
            ("disconnect_delay_ms", self.disconnect_delay_ms),
            ("catalog_delay_ms", self.catalog_delay_ms),
        ] {
            if value > MAX_DELAY_MS {
                return Err(format!("{} cannot exceed {} ms", field, MAX_DELAY_MS));
            }
        }

        let catalog = self.catalog();
        if catalog.is_empty() {
            return Err("Server catalog cannot be empty".to_string());
        }

        for (index, server) in catalog.iter().enumerate() {
            if server.id.is_empty() {
                return Err("Server id cannot be empty".to_string());
            }
            if server.name.is_empty() {
                return Err(format!("Server '{}' has an empty name", server.id));
            }
            if catalog[..index].iter().any(|earlier| earlier.same_server(server)) {
                return Err(format!("Duplicate server id: {}", server.id));
            }
        }

        if self.default_server_descriptor().is_none() {
            return Err(format!(
                "Default server '{}' is not in the catalog",
                self.default_server
            ));
        }

        Ok(())
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            connect_delay_ms: 2000,
            disconnect_delay_ms: 1000,
            catalog_delay_ms: 500,
            default_server: DEFAULT_SERVER_ID.to_string(),
            servers: None,
        }
    }
}
