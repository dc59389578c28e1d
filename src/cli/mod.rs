//! CLI Module
//!
//! Command-line interface for the Folio book viewer.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Folio - paginated book viewer with page-turn sounds
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Widget configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a book interactively from the terminal
    #[command(name = "read")]
    Read {
        /// Book file (.txt with `---` page separators, or .json)
        book: PathBuf,
    },

    /// Replay a scripted list of input events on a virtual clock
    #[command(name = "simulate")]
    Simulate {
        /// Book file
        book: PathBuf,

        /// Comma-separated events: next, prev, click, key:<name>,
        /// touchstart:<x>, touchend:<x>
        #[arg(short, long, value_delimiter = ',')]
        events: Vec<String>,

        /// Virtual time between consecutive events in milliseconds
        #[arg(short, long, default_value_t = 250)]
        interval_ms: u64,

        /// Print each step as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Also render the page-turn audio of the session to a WAV file
        #[arg(long)]
        wav: Option<PathBuf>,
    },

    /// Render page-turn sounds to a WAV file
    #[command(name = "render-tone")]
    RenderTone {
        /// Output WAV path
        #[arg(short, long)]
        out: PathBuf,

        /// Number of page turns to render
        #[arg(short, long, default_value_t = 1)]
        turns: u32,

        /// Time between page turns in milliseconds
        #[arg(short, long, default_value_t = 400)]
        spacing_ms: u64,

        /// Sample rate in Hz (defaults to the configured offline rate)
        #[arg(long)]
        sample_rate: Option<u32>,

        /// RNG seed for a reproducible render
        #[arg(long)]
        seed: Option<u64>,

        /// Bit depth: 16, 24 or 32
        #[arg(long, default_value_t = 16)]
        bit_depth: u16,
    },
}
