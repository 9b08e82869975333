//! Interactive panel session
//!
//! Reads single-letter commands from stdin while redrawing the panel on
//! every state change. Operations run as background tasks so the panel
//! keeps updating (and keeps refusing overlapping requests) while a
//! connect or disconnect is in flight.

use crate::cli::render::Rendered;
use colored::Colorize;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};
use vpn_panel_core::config::toml_config::load_config;
use vpn_panel_core::error::PanelError;
use vpn_panel_core::view::PanelView;
use vpn_panel_core::vpn::{ConnectionController, MockBackend, Outcome, PanelState};

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Toggle,
    List,
    /// 1-based index into the catalog
    Select(usize),
    Dismiss,
    Redraw,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(Command::Redraw);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "c" | "connect" | "disconnect" | "toggle" => Command::Toggle,
        "l" | "list" => Command::List,
        "s" | "select" => {
            let index = parts
                .next()
                .ok_or_else(|| "Usage: s <number>".to_string())?
                .parse::<usize>()
                .map_err(|_| "Server number must be a positive integer".to_string())?;
            if index == 0 {
                return Err("Server numbers start at 1".to_string());
            }
            Command::Select(index)
        }
        "d" | "dismiss" => Command::Dismiss,
        "r" | "redraw" => Command::Redraw,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command: {}", other)),
    };

    if parts.next().is_some() {
        return Err(format!("Unexpected arguments for '{}'", head));
    }
    Ok(command)
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  c        connect / disconnect");
    println!("  l        show / hide the server list");
    println!("  s <n>    switch to server number n");
    println!("  d        dismiss the failure notice");
    println!("  r        redraw the panel");
    println!("  q        quit");
}

fn draw(state: &PanelState) {
    println!("{}", Rendered(&PanelView::from_state(state)));
}

fn report(outcome: Outcome) {
    match outcome {
        Outcome::Completed => debug!("Operation completed"),
        Outcome::Ignored => println!(
            "{}",
            "Another operation is still in progress, please wait".yellow()
        ),
        // The notice on the panel already carries the failure
        Outcome::Failed(e) => debug!("Operation failed: {}", e),
    }
}

fn reap(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        warn!("Panel operation aborted: {}", e);
    }
}

/// Run the interactive panel until the user quits or stdin closes
pub async fn run_panel() -> Result<(), PanelError> {
    let config = load_config()?;
    let backend = Arc::new(MockBackend::new(&config));
    let controller = Arc::new(ConnectionController::new(backend));
    let mut state_rx = controller.subscribe();

    println!("{}", "Loading servers...".dimmed());
    controller.start().await;
    draw(&state_rx.borrow_and_update());
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut operations = JoinSet::new();

    loop {
        tokio::select! {
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = state_rx.borrow_and_update().clone();
                draw(&state);
            }
            Some(joined) = operations.join_next() => reap(joined),
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };

                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(message) => {
                        println!("{}", message.red());
                        continue;
                    }
                };

                let state = controller.snapshot();
                match command {
                    Command::Toggle => {
                        if !PanelView::from_state(&state).primary_action.enabled {
                            report(Outcome::Ignored);
                            continue;
                        }
                        let controller = controller.clone();
                        operations.spawn(async move {
                            report(controller.toggle_connection().await);
                        });
                    }
                    Command::Select(index) => {
                        let Some(server) = state.catalog.get(index - 1).cloned() else {
                            println!(
                                "{}",
                                format!("No server number {} (1-{})", index, state.catalog.len()).red()
                            );
                            continue;
                        };
                        if state.is_connecting() {
                            report(Outcome::Ignored);
                            continue;
                        }
                        let controller = controller.clone();
                        operations.spawn(async move {
                            report(controller.select_server(server).await);
                        });
                    }
                    Command::List => controller.toggle_server_list(),
                    Command::Dismiss => controller.dismiss_notice(),
                    Command::Redraw => draw(&state),
                    Command::Help => print_help(),
                    Command::Quit => break,
                }
            }
        }
    }

    // Operations still in flight finish and are drawn before the session ends
    while !operations.is_empty() {
        tokio::select! {
            Ok(()) = state_rx.changed() => {
                let state = state_rx.borrow_and_update().clone();
                draw(&state);
            }
            Some(joined) = operations.join_next() => reap(joined),
        }
    }
    if state_rx.has_changed().unwrap_or(false) {
        let state = state_rx.borrow_and_update().clone();
        draw(&state);
    }

    info!("Panel session ended with status {}", controller.status());
    Ok(())
}
