use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, fmt};

use crate::error::ViewerError;

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// ERROR-only layer appending to `error_log`, creating its directory first.
fn error_file_layer<S>(error_log: &Path) -> io::Result<impl Layer<S> + Send + Sync + use<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if let Some(parent) = error_log.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(error_log)?;
    Ok(fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .with_filter(LevelFilter::ERROR))
}

/// Install the global subscriber.
///
/// stderr gets everything `RUST_LOG` (or `-v`) allows; `error_log` receives
/// ERROR events only. If the error log cannot be opened the viewer keeps
/// running with stderr output alone.
pub fn init(error_log: &Path, verbosity: u8) -> Result<(), ViewerError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    match error_file_layer(error_log) {
        Ok(file_layer) => {
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .try_init()?;
        }
        Err(e) => {
            tracing_subscriber::registry().with(stderr_layer).try_init()?;
            tracing::warn!("error log {} unavailable: {e}", error_log.display());
        }
    }
    Ok(())
}
