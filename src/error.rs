use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the viewer outside of the GUI event loop.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("File {} does not exist.", .0.display())]
    MissingLogFile(PathBuf),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("file watcher: {0}")]
    Watch(#[from] notify::Error),

    #[error("window: {0}")]
    Gui(#[from] iced::Error),

    #[error("logging already initialized: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

impl ViewerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ViewerError::Io {
            path: path.into(),
            source,
        }
    }
}
