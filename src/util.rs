use std::time::SystemTime;

use chrono::{DateTime, Local};

/// UTF-8 safe truncation that keeps the END of the string.
/// Paths are more recognizable by their tail, so the elided part is the
/// front: `.../logs/ossec.log`. With `max_chars` of 3 or less there is no
/// room for the prefix and the last `max_chars` characters are returned.
pub fn truncate_start(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        return s.to_string();
    }
    if max_chars <= 3 {
        return s.chars().skip(char_count - max_chars).collect();
    }
    let keep = max_chars - 3;
    let tail: String = s.chars().skip(char_count - keep).collect();
    format!("...{tail}")
}

/// Local wall-clock time as HH:MM:SS.
pub fn format_clock(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%H:%M:%S").to_string()
}
