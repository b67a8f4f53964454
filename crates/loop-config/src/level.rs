//! Host logger severities.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Log severities understood by the host logger, ordered from most to least
/// verbose.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
    Serialize,
    EnumString,
    Display,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    /// Verbose diagnostics, usually disabled in production.
    Debug,
    /// Default operational messages.
    #[default]
    Info,
    /// Unexpected but recoverable conditions.
    Warn,
    /// Failures that need attention.
    Error,
    /// Errors that panic in development builds only.
    DPanic,
    /// Errors that panic after logging.
    Panic,
    /// Errors that terminate the process after logging.
    Fatal,
}

/// Errors encountered while parsing a [`LogLevel`] from text.
pub type LogLevelParseError = strum::ParseError;

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;
    use strum::IntoEnumIterator;

    use super::*;

    #[rstest]
    #[case::lower("warn", LogLevel::Warn)]
    #[case::upper("DEBUG", LogLevel::Debug)]
    #[case::mixed("DPanic", LogLevel::DPanic)]
    fn parses_names_case_insensitively(#[case] input: &str, #[case] expected: LogLevel) {
        assert_eq!(LogLevel::from_str(input).expect("level parses"), expected);
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(LogLevel::from_str("bogus").is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for level in LogLevel::iter() {
            let text = level.to_string();
            assert_eq!(text, text.to_lowercase());
            assert_eq!(LogLevel::from_str(&text).expect("level parses"), level);
        }
    }

    #[test]
    fn severities_are_ordered() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Error < LogLevel::DPanic);
        assert!(LogLevel::Panic < LogLevel::Fatal);
    }
}
