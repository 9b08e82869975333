//! Catalog listing command

use colored::Colorize;
use vpn_panel_core::config::toml_config::load_config;
use vpn_panel_core::error::PanelError;
use vpn_panel_core::vpn::{Backend, MockBackend};

/// Fetch the catalog from the backend and print it
pub async fn run_servers(json: bool) -> Result<(), PanelError> {
    let config = load_config()?;
    let backend = MockBackend::new(&config);
    let servers = backend.list_servers().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&servers)?);
        return Ok(());
    }

    println!("{}", "Available Servers".bold());
    for (index, server) in servers.iter().enumerate() {
        let marker = if server.id == config.default_server {
            " (default)".dimmed().to_string()
        } else {
            String::new()
        };
        println!(
            "{:>3}. {} {:<16} {:<20} {}{}",
            index + 1,
            server.flag,
            server.name,
            server.location,
            format!("{}ms", server.ping_millis).yellow(),
            marker
        );
    }
    Ok(())
}
