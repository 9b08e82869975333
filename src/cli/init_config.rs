//! Configuration bootstrap command

use colored::Colorize;
use vpn_panel_core::config::toml_config::{config_exists, get_config_path, save_config};
use vpn_panel_core::config::PanelConfig;
use vpn_panel_core::error::PanelError;

/// Write the default configuration unless one exists already
pub fn run_init_config(force: bool) -> Result<(), PanelError> {
    if config_exists()? && !force {
        println!(
            "{} Configuration already exists at {}",
            "⚠".yellow(),
            get_config_path()?.display()
        );
        println!("Use --force to overwrite it");
        return Ok(());
    }

    let path = save_config(&PanelConfig::default())?;
    println!("{} Wrote default configuration to {}", "✓".green(), path.display());
    Ok(())
}
