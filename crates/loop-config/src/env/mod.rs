//! Environment codec for the host to LOOP configuration hand-off.
//!
//! The host stamps four canonical variables into a [`LoopCommand`] and
//! forwards a fixed allow-list of its own variables. The plugin reads the
//! canonical variables back with [`read_env_config`]. Level and port are
//! parsed strictly; the two boolean flags are lenient and only the literal
//! `true` (in any case) enables them.

use std::collections::HashMap;
use std::env;
use std::ffi::{OsStr, OsString};
use std::hash::BuildHasher;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::command::LoopCommand;
use crate::level::{LogLevel, LogLevelParseError};
use crate::logging::{LoggingConfig, LoggingSnapshot};

/// Log severity name.
pub const LOG_LEVEL_VAR: &str = "CL_LOG_LEVEL";
/// Structured console output flag.
pub const JSON_CONSOLE_VAR: &str = "CL_JSON_CONSOLE";
/// Unix epoch timestamp flag.
pub const UNIX_TS_VAR: &str = "CL_UNIX_TS";
/// Prometheus metrics port.
pub const PROMETHEUS_PORT_VAR: &str = "CL_PROMETHEUS_PORT";

/// Host variables copied verbatim into the child when present.
pub const FORWARDED_VARS: [&str; 3] = ["CL_DEV", "CL_LOG_SQL_MIGRATIONS", "CL_LOG_COLOR"];

/// Configuration passed from the host to a LOOP through its environment.
///
/// Values are fully resolved and static for the lifetime of the plugin.
pub trait EnvConfig: LoggingConfig {
    /// Port the plugin serves Prometheus metrics on; `0` disables metrics.
    fn prometheus_port(&self) -> i64;
}

/// Plain [`EnvConfig`] value built by the host or decoded by the plugin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct EnvSnapshot {
    level: LogLevel,
    json_console: bool,
    unix_timestamps: bool,
    prometheus_port: i64,
}

impl EnvSnapshot {
    /// Combines logging settings with the metrics port assigned to a LOOP.
    #[must_use]
    pub fn new<L: LoggingConfig + ?Sized>(logging: &L, prometheus_port: i64) -> Self {
        Self {
            level: logging.level(),
            json_console: logging.json_console(),
            unix_timestamps: logging.unix_timestamps(),
            prometheus_port,
        }
    }

    /// The logging half of the snapshot.
    #[must_use]
    pub const fn logging(&self) -> LoggingSnapshot {
        LoggingSnapshot::new(self.level, self.json_console, self.unix_timestamps)
    }
}

impl LoggingConfig for EnvSnapshot {
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

impl EnvConfig for EnvSnapshot {
    fn prometheus_port(&self) -> i64 {
        self.prometheus_port
    }
}

/// Read-only view of a set of environment variables.
pub trait EnvSource {
    /// Returns the raw value of `name`, or `None` when it is unset.
    ///
    /// A value that is set but not valid Unicode is still returned.
    fn var(&self, name: &str) -> Option<OsString>;
}

/// The environment of the current process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<OsString> {
        env::var_os(name)
    }
}

impl<V, S> EnvSource for HashMap<String, V, S>
where
    V: AsRef<OsStr>,
    S: BuildHasher,
{
    fn var(&self, name: &str) -> Option<OsString> {
        self.get(name).map(|value| value.as_ref().to_os_string())
    }
}

/// Errors raised while decoding an [`EnvSnapshot`] from the environment.
#[derive(Debug, Error)]
pub enum EnvConfigError {
    /// The log level variable did not name a known severity.
    #[error("failed to parse {variable} = {value:?}: {source}")]
    InvalidLogLevel {
        /// Variable that was read.
        variable: &'static str,
        /// Raw value found in the environment, lossily converted when it is
        /// not valid Unicode.
        value: String,
        /// Underlying parse failure.
        #[source]
        source: LogLevelParseError,
    },

    /// The metrics port variable was missing or not a base-10 integer.
    #[error("failed to parse {variable} = {value:?}: {source}")]
    InvalidPort {
        /// Variable that was read.
        variable: &'static str,
        /// Raw value found in the environment; empty when unset and lossily
        /// converted when it is not valid Unicode.
        value: String,
        /// Underlying parse failure.
        #[source]
        source: ParseIntError,
    },
}

impl EnvConfigError {
    /// Name of the environment variable that failed to decode.
    #[must_use]
    pub const fn variable(&self) -> &'static str {
        match self {
            Self::InvalidLogLevel { variable, .. } | Self::InvalidPort { variable, .. } => *variable,
        }
    }

    /// Raw value that failed to decode.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::InvalidLogLevel { value, .. } | Self::InvalidPort { value, .. } => value.as_str(),
        }
    }
}

/// Stamps `config` into `command`, forwarding allow-listed variables from
/// the current process environment.
pub fn apply_env_config<C: EnvConfig + ?Sized>(command: &mut LoopCommand, config: &C) {
    apply_env_config_from(command, config, &ProcessEnv);
}

/// Stamps `config` into `command`, forwarding allow-listed variables found
/// in `host`.
///
/// Only `command` is modified; `host` is never written to.
pub fn apply_env_config_from<C, E>(command: &mut LoopCommand, config: &C, host: &E)
where
    C: EnvConfig + ?Sized,
    E: EnvSource + ?Sized,
{
    for name in FORWARDED_VARS {
        if let Some(value) = host.var(name) {
            command.env(name, value);
        }
    }
    command
        .env(LOG_LEVEL_VAR, config.level().to_string())
        .env(JSON_CONSOLE_VAR, config.json_console().to_string())
        .env(UNIX_TS_VAR, config.unix_timestamps().to_string())
        .env(PROMETHEUS_PORT_VAR, config.prometheus_port().to_string());
}

/// Decodes the LOOP configuration from the current process environment.
///
/// # Errors
///
/// Returns [`EnvConfigError`] when the log level or the metrics port cannot
/// be parsed. The level is checked first.
pub fn read_env_config() -> Result<EnvSnapshot, EnvConfigError> {
    read_env_config_from(&ProcessEnv)
}

/// Decodes the LOOP configuration from `environment`.
///
/// # Errors
///
/// Returns [`EnvConfigError`] when the log level or the metrics port cannot
/// be parsed. The level is checked first.
pub fn read_env_config_from<E: EnvSource + ?Sized>(
    environment: &E,
) -> Result<EnvSnapshot, EnvConfigError> {
    let raw_level = text_var(environment, LOG_LEVEL_VAR);
    let level = parse_level(&raw_level).map_err(|error| EnvConfigError::InvalidLogLevel {
        variable: LOG_LEVEL_VAR,
        value: raw_level,
        source: error,
    })?;

    let raw_port = text_var(environment, PROMETHEUS_PORT_VAR);
    let prometheus_port = raw_port
        .parse::<i64>()
        .map_err(|error| EnvConfigError::InvalidPort {
            variable: PROMETHEUS_PORT_VAR,
            value: raw_port,
            source: error,
        })?;

    Ok(EnvSnapshot {
        level,
        json_console: flag(environment, JSON_CONSOLE_VAR),
        unix_timestamps: flag(environment, UNIX_TS_VAR),
        prometheus_port,
    })
}

// Unset reads as empty. Non-Unicode bytes become U+FFFD, which no level
// name or digit matches, so such values always fail to parse.
fn text_var<E: EnvSource + ?Sized>(environment: &E, name: &str) -> String {
    environment
        .var(name)
        .map(|value| value.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// An unset level means the host logger default.
fn parse_level(raw: &str) -> Result<LogLevel, LogLevelParseError> {
    if raw.is_empty() {
        return Ok(LogLevel::default());
    }
    LogLevel::from_str(raw)
}

fn flag<E: EnvSource + ?Sized>(environment: &E, name: &str) -> bool {
    environment
        .var(name)
        .is_some_and(|value| value.eq_ignore_ascii_case("true"))
}
