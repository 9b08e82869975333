//! Terminal rendering of the panel view

use colored::Colorize;
use std::fmt;
use vpn_panel_core::view::{ActionView, PanelView};
use vpn_panel_core::vpn::ConnectionStatus;

fn button(action: &ActionView) -> String {
    let label = format!("[ {} ]", action.label);
    if action.enabled {
        label.bold().to_string()
    } else {
        label.dimmed().to_string()
    }
}

/// A panel view formatted as a block of terminal text
pub struct Rendered<'a>(pub &'a PanelView);

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;

        writeln!(f, "{}", "VPN Connection".bold())?;
        writeln!(f, "{}", "Secure your internet connection".dimmed())?;
        writeln!(f)?;

        let indicator = match view.status {
            ConnectionStatus::Connected => format!("● {}", view.status_text).green().bold(),
            ConnectionStatus::Connecting => format!("◌ {}", view.status_text).yellow().bold(),
            ConnectionStatus::Disconnected => format!("○ {}", view.status_text).dimmed(),
        };
        writeln!(f, "  {}", indicator)?;
        if let Some(summary) = &view.summary {
            writeln!(f, "    {}", summary)?;
        }
        writeln!(
            f,
            "  {}  {}",
            button(&view.primary_action),
            button(&view.list_toggle)
        )?;

        if !view.rows.is_empty() {
            writeln!(f)?;
            writeln!(f, "  {}", "Available Servers".bold())?;
            for (index, row) in view.rows.iter().enumerate() {
                let line = format!(
                    "{:>3}. {} {:<16} {:<20} {:>5}ms",
                    index + 1,
                    row.server.flag,
                    row.server.name,
                    row.server.location,
                    row.server.ping_millis
                );
                let line = if row.enabled {
                    line.normal()
                } else {
                    line.dimmed()
                };
                if row.active {
                    writeln!(f, "  {} {}", line, "Active".yellow().bold())?;
                } else {
                    writeln!(f, "  {}", line)?;
                }
            }
        }

        if let Some(details) = &view.details {
            writeln!(f)?;
            writeln!(f, "  {}", "Connection Details".bold())?;
            writeln!(f, "    {:<10} {}", "Status", details.status.green())?;
            writeln!(f, "    {:<10} {}", "Server", details.server)?;
            writeln!(f, "    {:<10} {}", "Location", details.location)?;
            writeln!(f, "    {:<10} {}", "Latency", details.latency.yellow())?;
            if let Some(since) = &details.connected_since {
                writeln!(f, "    {:<10} {}", "Since", since)?;
            }
        }

        if let Some(notice) = &view.notice {
            writeln!(f)?;
            writeln!(f, "  {} {}", "✗".red(), notice.red())?;
        }

        Ok(())
    }
}
