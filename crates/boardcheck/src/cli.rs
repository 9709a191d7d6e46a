//! Command-line interface for boardcheck.

use boardcheck::{Group, ScenarioId};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// boardcheck - conformance harness for board games
#[derive(Parser, Debug)]
#[command(name = "boardcheck")]
#[command(about = "Black-box conformance checks for board games", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run scenarios against the reference target
    Run {
        /// Path to a harness config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only run these groups (repeatable)
        #[arg(short, long)]
        group: Vec<Group>,

        /// Only run these scenarios (repeatable)
        #[arg(short, long)]
        scenario: Vec<ScenarioId>,

        /// Directory for captures (overrides the config file)
        #[arg(long)]
        artifacts: Option<PathBuf>,

        /// RNG seed for random play (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Write the JSON report to this file
        #[arg(long)]
        json: Option<PathBuf>,

        /// Reply delay of the reference AI, in milliseconds
        #[arg(long, default_value = "250")]
        ai_delay_ms: u64,
    },

    /// List the scenario catalogue
    List {
        /// Only list this group
        #[arg(short, long)]
        group: Option<Group>,
    },
}
