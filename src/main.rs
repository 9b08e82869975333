//! vpn-panel - terminal VPN control panel
//!
//! Hosts a single panel session against a simulated backend: connect,
//! disconnect, browse the server catalog and switch servers.

use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use vpn_panel_core::{error::PanelError, init_logging};

mod cli;

#[derive(Parser)]
#[command(name = "vpn-panel")]
#[command(about = "VPN control panel backed by a simulated connection service")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open an interactive panel session
    Run,
    /// Print the server catalog
    Servers {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    if let Err(e) = init_logging(level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    let result = match cli.command {
        Commands::Run => cli::run::run_panel().await,
        Commands::Servers { json } => cli::servers::run_servers(json).await,
        Commands::InitConfig { force } => cli::init_config::run_init_config(force),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            let exit_code = match e {
                // Configuration errors (exit code 2)
                PanelError::Config(_) | PanelError::Toml(_) | PanelError::TomlSerialize(_) => 2,
                // Runtime errors (exit code 1)
                PanelError::Backend(_) | PanelError::Io(_) | PanelError::Json(_) => 1,
            };

            eprintln!("{}", e);
            std::process::exit(exit_code);
        }
    }
}
