//! Simulated backend
//!
//! Sleeps for fixed delays and answers with hard-coded data. Failure
//! switches and call counters exist so callers can exercise the rollback
//! paths of the controller.

use crate::config::PanelConfig;
use crate::error::{BackendError, Operation};
use crate::types::{ConnectResponse, DisconnectResponse, ServerDescriptor};
use crate::vpn::backend::Backend;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

/// In-process stand-in for a tunnel service
#[derive(Debug)]
pub struct MockBackend {
    catalog: Vec<ServerDescriptor>,
    default_server: Option<ServerDescriptor>,
    connect_delay: Duration,
    disconnect_delay: Duration,
    catalog_delay: Duration,
    fail_connect: AtomicBool,
    fail_disconnect: AtomicBool,
    omit_server: AtomicBool,
    connect_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl MockBackend {
    /// Create a mock backend from configuration
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            catalog: config.catalog(),
            default_server: config.default_server_descriptor(),
            connect_delay: config.connect_delay(),
            disconnect_delay: config.disconnect_delay(),
            catalog_delay: config.catalog_delay(),
            fail_connect: AtomicBool::new(false),
            fail_disconnect: AtomicBool::new(false),
            omit_server: AtomicBool::new(false),
            connect_calls: AtomicUsize::new(0),
            disconnect_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Make subsequent connect calls report `success: false`
    pub fn set_fail_connect(&self, fail: bool) {
        self.fail_connect.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent disconnect calls report `success: false`
    pub fn set_fail_disconnect(&self, fail: bool) {
        self.fail_disconnect.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent connect calls succeed without naming a server
    pub fn set_omit_server(&self, omit: bool) {
        self.omit_server.store(omit, Ordering::SeqCst);
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new(&PanelConfig::default())
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn connect(
        &self,
        target: Option<&ServerDescriptor>,
    ) -> Result<ConnectResponse, BackendError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.connect_delay).await;

        if self.fail_connect.load(Ordering::SeqCst) {
            debug!("Mock connect configured to fail");
            return Ok(ConnectResponse {
                success: false,
                server: None,
            });
        }

        let server = if self.omit_server.load(Ordering::SeqCst) {
            None
        } else {
            target.cloned().or_else(|| self.default_server.clone())
        };

        debug!(
            "Mock connect completed: {}",
            server.as_ref().map_or("<none>", |s| s.name.as_str())
        );
        Ok(ConnectResponse {
            success: true,
            server,
        })
    }

    async fn disconnect(&self) -> Result<DisconnectResponse, BackendError> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.disconnect_delay).await;

        let success = !self.fail_disconnect.load(Ordering::SeqCst);
        debug!("Mock disconnect completed: success={}", success);
        Ok(DisconnectResponse { success })
    }

    async fn list_servers(&self) -> Result<Vec<ServerDescriptor>, BackendError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.catalog_delay).await;

        if self.catalog.is_empty() {
            return Err(BackendError::CallFailed {
                operation: Operation::ListServers,
                reason: "catalog is empty".to_string(),
            });
        }
        Ok(self.catalog.clone())
    }
}
