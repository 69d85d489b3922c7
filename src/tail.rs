use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::time::SystemTime;

use crate::error::ViewerError;
use crate::severity::{self, Severity};

/// Bytes read per backward step when looking for line starts.
const CHUNK_SIZE: u64 = 8 * 1024;

/// A single displayed line with its precomputed severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub text: String,
    pub severity: Severity,
}

impl LogLine {
    pub fn new(text: String) -> Self {
        let severity = severity::classify(&text);
        Self { text, severity }
    }
}

/// The last lines of the log file at one point in time.
#[derive(Debug, Clone)]
pub struct TailSnapshot {
    pub lines: Vec<LogLine>,
    pub read_at: SystemTime,
}

impl TailSnapshot {
    pub fn load(path: &Path, max_lines: usize) -> Result<Self, ViewerError> {
        let lines = read_last_lines(path, max_lines)?
            .into_iter()
            .map(LogLine::new)
            .collect();
        Ok(Self {
            lines,
            read_at: SystemTime::now(),
        })
    }
}

/// Size and mtime of the file, compared by the polling fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl Fingerprint {
    /// `None` when the file is missing or unreadable.
    pub fn of(path: &Path) -> Option<Self> {
        let meta = fs::metadata(path).ok()?;
        Some(Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

/// Read at most `max_lines` lines from the end of `path`.
///
/// Walks backward from EOF in `CHUNK_SIZE` steps so large logs are not read
/// in full. A trailing newline does not count as an extra empty line, and
/// both `\n` and `\r\n` endings are stripped.
pub fn read_last_lines(path: &Path, max_lines: usize) -> Result<Vec<String>, ViewerError> {
    let mut file = fs::File::open(path).map_err(|e| ViewerError::io(path, e))?;
    let len = file.metadata().map_err(|e| ViewerError::io(path, e))?.len();
    if max_lines == 0 || len == 0 {
        return Ok(Vec::new());
    }

    let mut chunks: Vec<Vec<u8>> = Vec::new();
    let mut pos = len;
    let mut newlines = 0usize;
    let mut ends_with_newline = None;

    while pos > 0 {
        let step = CHUNK_SIZE.min(pos);
        pos -= step;
        file.seek(SeekFrom::Start(pos))
            .map_err(|e| ViewerError::io(path, e))?;
        let mut chunk = vec![0u8; step as usize];
        file.read_exact(&mut chunk)
            .map_err(|e| ViewerError::io(path, e))?;

        if ends_with_newline.is_none() {
            ends_with_newline = Some(chunk.last() == Some(&b'\n'));
        }
        newlines += chunk.iter().filter(|&&b| b == b'\n').count();
        chunks.push(chunk);

        let complete = newlines - usize::from(ends_with_newline == Some(true));
        if complete >= max_lines {
            break;
        }
    }

    chunks.reverse();
    let bytes = chunks.concat();
    let text = String::from_utf8_lossy(&bytes);

    let mut lines = text.lines();
    if pos > 0 {
        // The first segment started mid-line.
        lines.next();
    }
    let lines: Vec<&str> = lines.collect();
    let start = lines.len().saturating_sub(max_lines);
    Ok(lines[start..].iter().map(|l| l.to_string()).collect())
}
