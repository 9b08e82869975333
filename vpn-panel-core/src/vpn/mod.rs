//! VPN connection module
//!
//! Connection state machine, the controller that drives it, and the
//! backend abstraction it calls through.

pub mod backend;
pub mod controller;
pub mod mock;
pub mod state;

// Public re-exports
pub use backend::Backend;
pub use controller::{ConnectionController, Outcome};
pub use mock::MockBackend;
pub use state::{reduce, ConnectionStatus, PanelEvent, PanelState};
