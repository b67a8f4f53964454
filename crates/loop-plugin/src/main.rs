//! Minimal LOOP that reports the configuration it inherited.
//!
//! The decoded configuration is written to stdout as a single JSON line;
//! telemetry goes to stderr.

use std::io::{self, Write};
use std::process::ExitCode;

use thiserror::Error;

#[derive(Debug, Error)]
enum EchoError {
    #[error(transparent)]
    Bootstrap(#[from] loop_plugin::BootstrapError),
    #[error("failed to encode configuration: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write configuration: {0}")]
    Output(#[from] io::Error),
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            drop(writeln!(io::stderr().lock(), "loop-echo: {error}"));
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), EchoError> {
    let context = loop_plugin::start()?;
    let line = serde_json::to_string(context.env_config())?;
    tracing::debug!(target: "loop_echo", %line, "reporting configuration");
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{line}")?;
    stdout.flush()?;
    Ok(())
}
