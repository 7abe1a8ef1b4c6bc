//! # Repoweave CLI
//!
//! Binary entry point for the `repoweave` command-line tool.
//!
//! Its responsibilities are parsing command-line arguments with `clap`,
//! initializing logging, and dispatching to the appropriate command. The
//! core logic lives in the library crate; the binary is a thin wrapper.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
