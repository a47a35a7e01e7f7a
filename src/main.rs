//! Kiln - an asset pipeline for static front-ends.

mod actor;
mod cli;
mod config;
mod core;
mod embed;
mod freshness;
mod glob;
mod logger;
mod pipeline;
mod reload;
mod task;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::{KilnConfig, init_config};
use std::time::Instant;
use task::TaskName;
use utils::plural::plural_count;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = init_config(KilnConfig::load(cli)?);

    match cli.task {
        TaskName::Watch => cli::watch::run_watch(config),
        TaskName::Serve => cli::serve::run_serve(config),
        name => run_task(&config, name),
    }
}

/// Run a one-shot task and print a summary line.
///
/// In development, failed steps are already logged and the run still exits 0.
fn run_task(config: &KilnConfig, name: TaskName) -> Result<()> {
    let started = Instant::now();
    let reports = task::run(config, name)?;

    let failed: usize = reports.iter().map(|r| r.errors.len()).sum();
    let elapsed = started.elapsed().as_millis();
    if failed == 0 {
        logger::status_success(&format!("{name} finished in {elapsed}ms"));
    } else {
        logger::status_warning(&format!(
            "{name} finished in {elapsed}ms with {}",
            plural_count(failed, "error")
        ));
    }
    Ok(())
}
