//! Logging settings inherited by LOOP executables.

use serde::{Deserialize, Serialize};

use crate::level::LogLevel;

/// Static logging configuration handed from the host to a LOOP executable.
///
/// No validation happens here; an unsupported level only surfaces when the
/// plugin decodes its environment.
pub trait LoggingConfig {
    /// Minimum severity to emit.
    fn level(&self) -> LogLevel;

    /// Whether console output is structured JSON.
    fn json_console(&self) -> bool;

    /// Whether timestamps are rendered as Unix epoch seconds.
    fn unix_timestamps(&self) -> bool;
}

/// Immutable [`LoggingConfig`] value resolved by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct LoggingSnapshot {
    level: LogLevel,
    #[serde(default)]
    json_console: bool,
    #[serde(default)]
    unix_timestamps: bool,
}

impl LoggingSnapshot {
    /// Creates a snapshot from explicit values.
    #[must_use]
    pub const fn new(level: LogLevel, json_console: bool, unix_timestamps: bool) -> Self {
        Self {
            level,
            json_console,
            unix_timestamps,
        }
    }

    /// Captures the current values of any [`LoggingConfig`].
    #[must_use]
    pub fn from_config<C: LoggingConfig + ?Sized>(config: &C) -> Self {
        Self::new(
            config.level(),
            config.json_console(),
            config.unix_timestamps(),
        )
    }
}

impl LoggingConfig for LoggingSnapshot {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn json_console(&self) -> bool {
        self.json_console
    }

    fn unix_timestamps(&self) -> bool {
        self.unix_timestamps
    }
}
