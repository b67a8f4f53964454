//! Structured telemetry initialisation for LOOP executables.

use std::fmt;
use std::io::{self, IsTerminal};
use std::time::{SystemTime, UNIX_EPOCH};

use loop_config::{LogLevel, LoggingConfig};
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{FormatTime, UtcTime};

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Handle returned when telemetry has been initialised.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to install the tracing subscriber.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Renders event timestamps as seconds since the Unix epoch.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnixEpochTime;

impl FormatTime for UnixEpochTime {
    fn format_time(&self, writer: &mut Writer<'_>) -> fmt::Result {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        write!(
            writer,
            "{}.{:06}",
            elapsed.as_secs(),
            elapsed.subsec_micros()
        )
    }
}

/// Maps a host severity onto the closest `tracing` filter.
///
/// `tracing` has no severities above `ERROR`, so the panic and fatal levels
/// collapse onto it.
#[must_use]
pub const fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Error | LogLevel::DPanic | LogLevel::Panic | LogLevel::Fatal => {
            LevelFilter::ERROR
        }
    }
}

/// Configures the global tracing subscriber when invoked for the first time.
///
/// Repeated calls are idempotent: only the first invocation installs the
/// subscriber, later ones return a fresh [`TelemetryHandle`].
///
/// # Errors
///
/// Returns [`TelemetryError::Subscriber`] when another global subscriber
/// was installed outside this function.
pub fn initialise<C: LoggingConfig + ?Sized>(
    config: &C,
) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| {
            tracing::subscriber::set_global_default(build_subscriber(config))
                .map_err(TelemetryError::Subscriber)
        })
        .map(|_| TelemetryHandle)
}

/// Builds the subscriber described by `config` without installing it.
#[must_use]
pub fn build_subscriber<C: LoggingConfig + ?Sized>(
    config: &C,
) -> Box<dyn Subscriber + Send + Sync> {
    let filter = EnvFilter::default().add_directive(level_filter(config.level()).into());
    if config.unix_timestamps() {
        finish(config.json_console(), filter, UnixEpochTime)
    } else {
        finish(config.json_console(), filter, UtcTime::rfc_3339())
    }
}

fn finish<T>(json: bool, filter: EnvFilter, timer: T) -> Box<dyn Subscriber + Send + Sync>
where
    T: FormatTime + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(io::stderr)
        // Structured output never carries colour codes.
        .with_ansi(!json && io::stderr().is_terminal())
        .with_timer(timer);

    if json {
        Box::new(builder.json().flatten_event(true).finish())
    } else {
        Box::new(builder.compact().finish())
    }
}
