pub mod filter;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info, warn};

use crate::error::ViewerError;
use crate::events::WatchEvent;
use crate::tail::{Fingerprint, TailSnapshot};

/// Quiet period after a change notification before re-reading.
const DEBOUNCE_MS: u64 = 75;

/// Fingerprint check interval when no notifications arrive.
const POLL_FALLBACK_MS: u64 = 2000;

/// What to watch and how much of it to read. Used as the subscription key,
/// so changing either field restarts the watcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WatchTarget {
    pub path: PathBuf,
    pub max_lines: usize,
}

/// Spawn the watcher thread and return its event stream.
///
/// The thread owns the OS watcher and exits, dropping it, once the returned
/// stream is dropped.
pub fn watch_stream(target: &WatchTarget) -> UnboundedReceiver<WatchEvent> {
    let target = target.clone();
    let (tx, rx) = futures::channel::mpsc::unbounded();
    thread::spawn(move || watch_thread(target, tx));
    rx
}

/// Directory to register with the OS. Relative bare file names watch `.`.
fn watch_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn start_os_watcher(path: &Path, signal: mpsc::Sender<()>) -> Result<RecommendedWatcher, ViewerError> {
    let file_name = path
        .file_name()
        .map(OsStr::to_os_string)
        .unwrap_or_default();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            if filter::is_relevant(&event, &file_name) {
                let _ = signal.send(());
            }
        }
        Err(e) => warn!("watch error: {e}"),
    })?;

    let dir = watch_dir(path);
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    info!("watching {} for changes to {}", dir.display(), path.display());
    Ok(watcher)
}

fn watch_thread(target: WatchTarget, tx: UnboundedSender<WatchEvent>) {
    let (signal_tx, signal_rx) = mpsc::channel();
    let poll = Duration::from_millis(POLL_FALLBACK_MS);

    let _watcher = match start_os_watcher(&target.path, signal_tx) {
        Ok(w) => Some(w),
        Err(e) => {
            error!("falling back to polling {}: {e}", target.path.display());
            if tx
                .unbounded_send(WatchEvent::WatchFailed(e.to_string()))
                .is_err()
            {
                return;
            }
            None
        }
    };

    // Writes between the viewer's first read and the watcher registration
    // produced no notification, so start with one unconditional read.
    let mut last = Fingerprint::of(&target.path);
    if !send_tail(&target, &tx) {
        return;
    }

    loop {
        let changed = match signal_rx.recv_timeout(poll) {
            Ok(()) => {
                // Let a burst of writes settle, then read once
                thread::sleep(Duration::from_millis(DEBOUNCE_MS));
                while signal_rx.try_recv().is_ok() {}
                true
            }
            Err(mpsc::RecvTimeoutError::Timeout) => Fingerprint::of(&target.path) != last,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                // No OS watcher: polling only
                thread::sleep(poll);
                Fingerprint::of(&target.path) != last
            }
        };

        if tx.is_closed() {
            debug!("viewer gone, stopping watcher for {}", target.path.display());
            return;
        }
        if !changed {
            continue;
        }

        last = Fingerprint::of(&target.path);
        if !send_tail(&target, &tx) {
            return;
        }
    }
}

/// Re-read the tail and forward it. Returns false once the viewer is gone.
fn send_tail(target: &WatchTarget, tx: &UnboundedSender<WatchEvent>) -> bool {
    let event = match TailSnapshot::load(&target.path, target.max_lines) {
        Ok(snapshot) => WatchEvent::Reloaded(snapshot),
        Err(e) => {
            error!("Error reading file: {e}");
            WatchEvent::ReadFailed(e.to_string())
        }
    };
    debug!("{}", event.describe());
    tx.unbounded_send(event).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::io::Write;

    /// Wait up to `secs` for the first event accepted by `wanted`, skipping
    /// the others.
    fn wait_for(
        stream: impl futures::Stream<Item = WatchEvent> + Unpin + Send + 'static,
        secs: u64,
        wanted: impl Fn(&WatchEvent) -> bool,
    ) -> Option<WatchEvent> {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut stream = stream;
            while let Some(event) = futures::executor::block_on(stream.next()) {
                if tx.send(event).is_err() {
                    return;
                }
            }
        });
        let deadline = std::time::Instant::now() + Duration::from_secs(secs);
        loop {
            let left = deadline.checked_duration_since(std::time::Instant::now())?;
            let event = rx.recv_timeout(left).ok()?;
            if wanted(&event) {
                return Some(event);
            }
        }
    }

    fn tail_texts(event: &WatchEvent) -> Vec<String> {
        match event {
            WatchEvent::Reloaded(snapshot) => snapshot.lines.iter().map(|l| l.text.clone()).collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn watch_dir_of_bare_file_name_is_cwd() {
        assert_eq!(watch_dir(Path::new("ossec.log")), Path::new("."));
        assert_eq!(
            watch_dir(Path::new("/var/ossec/logs/ossec.log")),
            Path::new("/var/ossec/logs")
        );
    }

    #[test]
    fn target_is_a_stable_subscription_key() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let hash = |t: &WatchTarget| {
            let mut h = DefaultHasher::new();
            t.hash(&mut h);
            h.finish()
        };
        let a = WatchTarget {
            path: PathBuf::from("/var/ossec/logs/ossec.log"),
            max_lines: 100,
        };
        let b = WatchTarget {
            max_lines: 200,
            ..a.clone()
        };
        assert_eq!(hash(&a), hash(&a.clone()));
        assert_ne!(hash(&a), hash(&b));
    }

    #[test]
    fn appending_emits_reloaded_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ossec.log");
        std::fs::write(&path, "INFO: agent started\n").unwrap();

        let stream = watch_stream(&WatchTarget {
            path: path.clone(),
            max_lines: 2,
        });
        // Give the thread time to register and take its first fingerprint
        thread::sleep(Duration::from_millis(300));

        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "WARNING: queue 90% full").unwrap();
        writeln!(file, "ERROR: connection lost").unwrap();
        file.flush().unwrap();

        let event = wait_for(stream, 10, |e| {
            tail_texts(e).last().map(String::as_str) == Some("ERROR: connection lost")
        });
        match event {
            Some(event) => assert_eq!(
                tail_texts(&event),
                vec!["WARNING: queue 90% full", "ERROR: connection lost"]
            ),
            None => panic!("no reload with the appended lines"),
        }
    }

    #[test]
    fn removed_file_reports_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ossec.log");
        std::fs::write(&path, "INFO: agent started\n").unwrap();

        let stream = watch_stream(&WatchTarget {
            path: path.clone(),
            max_lines: 100,
        });
        thread::sleep(Duration::from_millis(300));
        std::fs::remove_file(&path).unwrap();

        match wait_for(stream, 10, |e| matches!(e, WatchEvent::ReadFailed(_))) {
            Some(WatchEvent::ReadFailed(msg)) => assert!(msg.contains("ossec.log")),
            other => panic!("expected ReadFailed, got {other:?}"),
        }
    }

    #[test]
    fn starts_with_a_fresh_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ossec.log");
        std::fs::write(&path, "INFO: a\n").unwrap();
        let initial = TailSnapshot::load(&path, 100).unwrap();
        assert_eq!(initial.lines.len(), 1);

        // Written after the viewer's first read, before the watcher exists
        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "ERROR: b").unwrap();
        file.flush().unwrap();

        let stream = watch_stream(&WatchTarget {
            path: path.clone(),
            max_lines: 100,
        });
        match wait_for(stream, 5, |_| true) {
            Some(event) => assert_eq!(tail_texts(&event), vec!["INFO: a", "ERROR: b"]),
            None => panic!("no reload after the watcher started"),
        }
    }
}
