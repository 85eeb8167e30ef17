//! CLI interface for TuneScout
//!
//! This module provides the command-line interface using clap's derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TuneScout song recommendation engine
///
/// Tracks a catalog of songs across the not-yet-recommended and recommended
/// pools, and asks a language model for verified new suggestions.
#[derive(Parser, Debug)]
#[command(name = "tunescout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Walk through the manual catalog flow with sample songs (offline)
    Demo,

    /// Ask the configured language model for verified new songs
    Suggest {
        /// How many songs to request
        count: usize,

        /// Seed song for the catalog, as "Title|Artist|Genre" (repeatable)
        #[arg(long, value_name = "SONG")]
        seed: Vec<String>,

        /// Basis song to diverge from, as "Title|Artist|Genre" (repeatable)
        #[arg(long, value_name = "SONG")]
        basis: Vec<String>,
    },
}
