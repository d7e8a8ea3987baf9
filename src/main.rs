//! reloader-client - live-reload client for Server-sent events.

mod cli;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use reloader_client::{config::ReloaderConfig, debug, log, logger};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        log!("error"; "{:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let cwd = std::env::current_dir().context("failed to read working directory")?;
    let config = ReloaderConfig::load(cli.config.as_deref(), &cwd)?;
    if let Some(path) = &config.config_path {
        debug!("config"; "loaded {}", path.display());
    }

    match &cli.command {
        Commands::Generate { args } => cli::generate::generate_script(args, &config),
        Commands::Signal { args } => cli::signal::emit_signal(args, &config),
        Commands::Replay { args } => cli::replay::replay_stream(args),
    }
}
