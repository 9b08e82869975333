//! CLI command implementations
//!
//! This module contains the implementation of all CLI subcommands.

pub mod init_config;
pub mod render;
pub mod run;
pub mod servers;
