//! Unit tests for error types and conversions

use vpn_panel_core::error::{BackendError, ConfigError, Operation, PanelError};

#[test]
fn test_config_error_display() {
    let error = ConfigError::LoadFailed {
        path: "/tmp/missing.toml".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Failed to load configuration file: /tmp/missing.toml"
    );
}

#[test]
fn test_backend_error_display() {
    let error = BackendError::CallFailed {
        operation: Operation::Disconnect,
        reason: "timeout".to_string(),
    };
    assert_eq!(error.to_string(), "disconnect failed: timeout");
    assert_eq!(
        BackendError::MissingServer.to_string(),
        "Backend reported success without a server"
    );
}

#[test]
fn test_panel_error_from_backend() {
    let panel_error: PanelError = BackendError::rejected(Operation::ListServers).into();
    assert!(matches!(panel_error, PanelError::Backend(_)));
    assert_eq!(
        panel_error.to_string(),
        "Backend error: list servers failed: backend reported failure"
    );
}

#[test]
fn test_panel_error_from_io() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let panel_error: PanelError = io_error.into();
    assert!(matches!(panel_error, PanelError::Io(_)));
}

#[test]
fn test_panel_error_from_toml() {
    let toml_error: toml::de::Error =
        toml::from_str::<serde_json::Value>("invalid toml").unwrap_err();
    let panel_error: PanelError = toml_error.into();
    assert!(matches!(panel_error, PanelError::Toml(_)));
}

#[test]
fn test_panel_error_from_json() {
    let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let panel_error: PanelError = json_error.into();
    assert!(matches!(panel_error, PanelError::Json(_)));
    assert!(panel_error
        .to_string()
        .starts_with("JSON serialization error:"));
}
