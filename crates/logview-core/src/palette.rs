//! Severity levels and the fixed severity → color mapping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity supplied by whoever produces a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Debug,
    Warning,
    Error,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Info,
        Severity::Debug,
        Severity::Warning,
        Severity::Error,
    ];

    /// Short uppercase tag used in the rendered row.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown severity `{0}`")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" | "information" | "trace" => Ok(Severity::Info),
            "debug" | "dbg" => Ok(Severity::Debug),
            "warn" | "warning" => Ok(Severity::Warning),
            "error" | "err" | "fatal" => Ok(Severity::Error),
            other => Err(ParseSeverityError(other.to_string())),
        }
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Severity::Error,
            tracing::Level::WARN => Severity::Warning,
            tracing::Level::INFO => Severity::Info,
            _ => Severity::Debug,
        }
    }
}

/// Opaque RGB color handle. The rendering layer converts it into its own color type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl LogColor {
    pub const WHITE_SMOKE: LogColor = LogColor::rgb(245, 245, 245);
    pub const AQUA: LogColor = LogColor::rgb(0, 255, 255);
    pub const GOLD: LogColor = LogColor::rgb(255, 215, 0);
    pub const RED: LogColor = LogColor::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for LogColor {
    fn default() -> Self {
        LogColor::WHITE_SMOKE
    }
}

/// Fixed mapping from [`Severity`] to display color. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeverityPalette;

impl SeverityPalette {
    pub const fn color(severity: Severity) -> LogColor {
        match severity {
            Severity::Info => LogColor::WHITE_SMOKE,
            Severity::Debug => LogColor::AQUA,
            Severity::Warning => LogColor::GOLD,
            Severity::Error => LogColor::RED,
        }
    }

    /// Reverse lookup, used when a record only carries its resolved color.
    pub fn severity_of(color: LogColor) -> Option<Severity> {
        Severity::ALL
            .into_iter()
            .find(|severity| Self::color(*severity) == color)
    }
}

impl std::ops::Index<Severity> for SeverityPalette {
    type Output = LogColor;

    fn index(&self, severity: Severity) -> &Self::Output {
        match severity {
            Severity::Info => &LogColor::WHITE_SMOKE,
            Severity::Debug => &LogColor::AQUA,
            Severity::Warning => &LogColor::GOLD,
            Severity::Error => &LogColor::RED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_matches_named_colors() {
        assert_eq!(SeverityPalette::color(Severity::Info), LogColor::rgb(245, 245, 245));
        assert_eq!(SeverityPalette::color(Severity::Debug), LogColor::rgb(0, 255, 255));
        assert_eq!(SeverityPalette::color(Severity::Warning), LogColor::rgb(255, 215, 0));
        assert_eq!(SeverityPalette::color(Severity::Error), LogColor::rgb(255, 0, 0));
    }

    #[test]
    fn palette_is_independent_of_call_order() {
        let first: Vec<_> = Severity::ALL.iter().map(|s| SeverityPalette::color(*s)).collect();
        for severity in Severity::ALL.iter().rev() {
            let _ = SeverityPalette::color(*severity);
        }
        let second: Vec<_> = Severity::ALL.iter().map(|s| SeverityPalette[*s]).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn reverse_lookup_round_trips() {
        for severity in Severity::ALL {
            assert_eq!(
                SeverityPalette::severity_of(SeverityPalette::color(severity)),
                Some(severity)
            );
        }
        assert_eq!(SeverityPalette::severity_of(LogColor::rgb(1, 2, 3)), None);
    }

    #[test]
    fn parses_common_level_spellings() {
        assert_eq!("WARN".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!(" error ".parse::<Severity>(), Ok(Severity::Error));
        assert_eq!("dbg".parse::<Severity>(), Ok(Severity::Debug));
        assert!("loud".parse::<Severity>().is_err());
    }

    #[test]
    fn tracing_levels_map_onto_severities() {
        assert_eq!(Severity::from(tracing::Level::TRACE), Severity::Debug);
        assert_eq!(Severity::from(tracing::Level::WARN), Severity::Warning);
    }
}
