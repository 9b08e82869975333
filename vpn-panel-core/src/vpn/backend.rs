//! Connection backend abstraction
//!
//! The controller only ever talks to this trait. The bundled
//! [`MockBackend`](crate::vpn::mock::MockBackend) simulates a tunnel service;
//! a real implementation can be swapped in without touching controller logic.

use crate::error::BackendError;
use crate::types::{ConnectResponse, DisconnectResponse, ServerDescriptor};
use async_trait::async_trait;

/// Asynchronous tunnel-establishment capability
#[async_trait]
pub trait Backend: Send + Sync {
    /// Establish a connection
    ///
    /// With no target the backend picks its default server. A successful
    /// response is expected to carry the server actually connected to.
    async fn connect(
        &self,
        target: Option<&ServerDescriptor>,
    ) -> Result<ConnectResponse, BackendError>;

    /// Tear down the current connection
    async fn disconnect(&self) -> Result<DisconnectResponse, BackendError>;

    /// Fetch the server catalog
    async fn list_servers(&self) -> Result<Vec<ServerDescriptor>, BackendError>;
}
