/// Severity of a log line, derived from the first matching keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    /// No keyword matched; rendered in the default text color.
    Plain,
}

/// Keywords in priority order. The first one found in a line wins.
const KEYWORDS: [(&str, Severity); 3] = [
    ("ERROR", Severity::Error),
    ("WARNING", Severity::Warning),
    ("INFO", Severity::Info),
];

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Plain => "plain",
        }
    }
}

/// Classify a line by case-sensitive substring match.
pub fn classify(line: &str) -> Severity {
    KEYWORDS
        .iter()
        .find(|(keyword, _)| line.contains(keyword))
        .map_or(Severity::Plain, |&(_, severity)| severity)
}
