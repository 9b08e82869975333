//! Core library for the vpn-panel tool
//!
//! This crate provides the connection state machine, the backend it
//! drives, configuration handling and the view model rendered by the CLI.

pub mod error;
pub mod types;

pub mod config;
pub mod view;
pub mod vpn;

use tracing_subscriber::filter::LevelFilter;

/// Initialize logging infrastructure
///
/// Logs to the systemd journal when running under systemd, otherwise to
/// stderr. `level` caps what is emitted.
pub fn init_logging(level: LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    #[cfg(target_os = "linux")]
    {
        if std::env::var("JOURNAL_STREAM").is_ok() {
            let journal_layer = tracing_journald::layer()?;
            tracing_subscriber::registry()
                .with(journal_layer)
                .with(level)
                .try_init()?;
            return Ok(());
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(level)
        .try_init()?;

    Ok(())
}
