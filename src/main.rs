//! Folio CLI - Paginated Book Viewer
//!
//! Command-line interface for reading, simulating and rendering page turns.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{error, info};

use folio::cli::commands;
use folio::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Folio v{}", env!("CARGO_PKG_VERSION"));

    let config = commands::load_config(cli.config.as_deref()).with_context(|| {
        format!(
            "failed to load config {}",
            cli.config
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        )
    })?;

    match cli.command {
        Some(cmd) => {
            let result = handle_command(cmd, &config);
            if let Err(e) = &result {
                error!("{} ({})", e, e.error_code());
                for suggestion in e.recovery_suggestions() {
                    error!("  - {}", suggestion);
                }
            }
            Ok(result?)
        }
        None => {
            println!("Folio v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands, config: &folio::config::WidgetConfig) -> folio::Result<()> {
    match cmd {
        Commands::Read { book } => commands::read(&book, config),
        Commands::Simulate {
            book,
            events,
            interval_ms,
            json,
            wav,
        } => commands::simulate(&book, config, &events, interval_ms, json, wav.as_deref()),
        Commands::RenderTone {
            out,
            turns,
            spacing_ms,
            sample_rate,
            seed,
            bit_depth,
        } => commands::render_tone(
            &out,
            config,
            turns,
            spacing_ms,
            sample_rate,
            seed,
            bit_depth,
        ),
    }
}
