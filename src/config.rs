use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::ViewerError;
use crate::theme::ThemeMode;

pub const APP_DIR: &str = "ossec-log-viewer";
const CONFIG_FILE: &str = "config.json";
const ERROR_LOG_FILE: &str = "ossec_log_viewer_errors.log";

pub const DEFAULT_TITLE: &str = "Wazuh Agent Log Viewer";
pub const DEFAULT_LINES: usize = 100;
const MAX_LINES: usize = 10_000;
const DEFAULT_TEXT_SIZE: f32 = 13.0;
const DEFAULT_WINDOW: (f32, f32) = (900.0, 560.0);

/// Where the agent writes its log when no path is given.
pub fn default_log_path() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\Program Files (x86)\ossec-agent\ossec.log")
    } else {
        PathBuf::from("/var/ossec/logs/ossec.log")
    }
}

/// `<config dir>/ossec-log-viewer/config.json`, if the platform has one.
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

pub fn default_error_log() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR).join(ERROR_LOG_FILE))
        .unwrap_or_else(|| PathBuf::from(ERROR_LOG_FILE))
}

/// On-disk config. Every field is optional; CLI flags override it.
///
/// ```json
/// {
///   "path": "/var/ossec/logs/ossec.log",
///   "lines": 200,
///   "theme": "auto",
///   "wrap": false
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub path: Option<PathBuf>,
    pub lines: Option<usize>,
    pub theme: Option<ThemeMode>,
    pub wrap: Option<bool>,
    pub text_size: Option<f32>,
    pub error_log: Option<PathBuf>,
    pub icon: Option<PathBuf>,
    pub title: Option<String>,
    pub window_width: Option<f32>,
    pub window_height: Option<f32>,
}

pub fn parse_config(content: &str, path: &Path) -> Result<FileConfig, ViewerError> {
    serde_json::from_str(content).map_err(|source| ViewerError::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the config file. An explicit path must exist; the default one may not.
pub fn load(explicit: Option<&Path>) -> Result<FileConfig, ViewerError> {
    let (path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => match config_file_path() {
            Some(p) => (p, false),
            None => return Ok(FileConfig::default()),
        },
    };

    match fs::read_to_string(&path) {
        Ok(content) => parse_config(&content, &path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
            Ok(FileConfig::default())
        }
        Err(e) => Err(ViewerError::io(path, e)),
    }
}

/// Effective settings after merging defaults, config file and CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub path: PathBuf,
    pub lines: usize,
    pub theme: ThemeMode,
    pub wrap: bool,
    pub text_size: f32,
    pub error_log: PathBuf,
    pub icon: Option<PathBuf>,
    pub title: String,
    pub window_size: (f32, f32),
}

impl Settings {
    pub fn resolve(cli: &Cli, file: FileConfig) -> Self {
        let lines = cli
            .lines
            .or(file.lines)
            .unwrap_or(DEFAULT_LINES)
            .clamp(1, MAX_LINES);
        let wrap = !cli.no_wrap && file.wrap.unwrap_or(true);

        Self {
            path: cli.path.clone().or(file.path).unwrap_or_else(default_log_path),
            lines,
            theme: cli.theme.or(file.theme).unwrap_or(ThemeMode::Auto),
            wrap,
            text_size: file.text_size.unwrap_or(DEFAULT_TEXT_SIZE).max(6.0),
            error_log: cli
                .error_log
                .clone()
                .or(file.error_log)
                .unwrap_or_else(default_error_log),
            icon: file.icon,
            title: file.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            window_size: (
                file.window_width.unwrap_or(DEFAULT_WINDOW.0),
                file.window_height.unwrap_or(DEFAULT_WINDOW.1),
            ),
        }
    }
}
