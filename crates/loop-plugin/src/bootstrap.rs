//! Start-up sequence for LOOP executables.

use loop_config::{
    EnvConfig, EnvConfigError, EnvSnapshot, EnvSource, LoggingConfig, ProcessEnv,
    read_env_config_from,
};
use thiserror::Error;
use tracing::info;

use crate::telemetry::{self, TelemetryError, TelemetryHandle};

/// Tracing target for start-up events.
const BOOTSTRAP_TARGET: &str = "loop_plugin::bootstrap";

/// Errors surfaced while starting a LOOP.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The inherited environment could not be decoded.
    #[error("failed to read LOOP configuration from the environment: {source}")]
    Environment {
        /// Underlying decode error.
        #[source]
        source: EnvConfigError,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
}

/// Result of a successful start-up.
#[derive(Debug, Clone, Copy)]
pub struct PluginContext {
    env_config: EnvSnapshot,
    telemetry: TelemetryHandle,
}

impl PluginContext {
    /// Configuration decoded from the environment.
    #[must_use]
    pub const fn env_config(&self) -> &EnvSnapshot {
        &self.env_config
    }

    /// Port to serve Prometheus metrics on; `0` means disabled.
    #[must_use]
    pub fn prometheus_port(&self) -> i64 {
        self.env_config.prometheus_port()
    }

    /// Handle proving telemetry was initialised.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }
}

/// Starts the LOOP from the current process environment.
///
/// # Errors
///
/// Returns [`BootstrapError`] when the environment cannot be decoded or
/// telemetry cannot be installed.
pub fn start() -> Result<PluginContext, BootstrapError> {
    start_from(&ProcessEnv)
}

/// Starts the LOOP from the variables in `environment`.
///
/// # Errors
///
/// Returns [`BootstrapError`] when the environment cannot be decoded or
/// telemetry cannot be installed.
pub fn start_from<E: EnvSource + ?Sized>(environment: &E) -> Result<PluginContext, BootstrapError> {
    let env_config = read_env_config_from(environment)
        .map_err(|source| BootstrapError::Environment { source })?;
    let handle =
        telemetry::initialise(&env_config).map_err(|source| BootstrapError::Telemetry { source })?;

    info!(
        target: BOOTSTRAP_TARGET,
        level = %env_config.level(),
        json_console = env_config.json_console(),
        unix_timestamps = env_config.unix_timestamps(),
        prometheus_port = env_config.prometheus_port(),
        "LOOP configuration loaded"
    );

    Ok(PluginContext {
        env_config,
        telemetry: handle,
    })
}
