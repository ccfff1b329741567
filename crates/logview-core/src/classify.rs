//! Severity inference for plain text lines coming from external producers.

use std::sync::OnceLock;

use regex::Regex;

use crate::palette::Severity;

fn level_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*[\[(<]?(info|information|debug|dbg|trace|warn|warning|error|err|fatal)\b[\])>]?\s*[:\-|]?\s*",
        )
        .expect("level prefix pattern is valid")
    })
}

/// Split a raw line into a severity and the remaining message. Lines without a recognized level
/// token are [`Severity::Info`] and keep their full text.
pub fn classify_line(line: &str) -> (Severity, &str) {
    let line = line.trim_end_matches(['\r', '\n']);
    if let Some(captures) = level_prefix().captures(line) {
        if let (Some(whole), Some(level)) = (captures.get(0), captures.get(1)) {
            if let Ok(severity) = level.as_str().parse::<Severity>() {
                return (severity, &line[whole.end()..]);
            }
        }
    }
    (Severity::Info, line)
}
