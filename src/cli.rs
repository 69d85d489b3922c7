use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::theme::ThemeMode;

const VERSION: &str = concat!(
    env!("OSSEC_LOG_VIEWER_VERSION"),
    " (",
    env!("OSSEC_LOG_VIEWER_COMMIT"),
    ")"
);

/// Tail a Wazuh/OSSEC agent log in a desktop window.
#[derive(Debug, Parser)]
#[command(name = "ossec-log-viewer", version = VERSION, about)]
pub struct Cli {
    /// Log file to tail (defaults to the agent's ossec.log)
    pub path: Option<PathBuf>,

    /// Config file (defaults to <config dir>/ossec-log-viewer/config.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of trailing lines to display
    #[arg(short = 'n', long)]
    pub lines: Option<usize>,

    #[arg(long, value_enum)]
    pub theme: Option<ThemeMode>,

    /// Disable soft wrapping of long lines
    #[arg(long)]
    pub no_wrap: bool,

    /// File that receives ERROR-level diagnostics
    #[arg(long)]
    pub error_log: Option<PathBuf>,

    /// More stderr logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
