// Release builds on Windows run without a console window.
#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

mod app;
mod cli;
mod config;
mod error;
mod events;
mod follow;
mod logging;
mod severity;
mod streams;
mod tail;
mod theme;
mod util;
mod views;
mod watcher;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::Cli;
use crate::config::Settings;
use crate::error::ViewerError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ViewerError> {
    let file_config = config::load(cli.config.as_deref())?;
    let settings = Settings::resolve(&cli, file_config);
    logging::init(&settings.error_log, cli.verbose)?;

    if !settings.path.exists() {
        return Err(ViewerError::MissingLogFile(settings.path));
    }

    app::run(settings)
}
