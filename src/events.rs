use crate::tail::TailSnapshot;

/// Events produced by the file watcher, consumed by the UI state machine.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// The file changed and its tail was re-read.
    Reloaded(TailSnapshot),
    /// The file changed but could not be read (rotated away, locked, ...).
    ReadFailed(String),
    /// The OS watcher could not be set up; only polling is active.
    WatchFailed(String),
}

impl WatchEvent {
    pub fn describe(&self) -> String {
        match self {
            WatchEvent::Reloaded(snapshot) => format!("reloaded {} lines", snapshot.lines.len()),
            WatchEvent::ReadFailed(e) => format!("read failed: {e}"),
            WatchEvent::WatchFailed(e) => format!("watch failed: {e}"),
        }
    }
}
