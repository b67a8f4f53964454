//! Static configuration shared between a host and its LOOP plugins.
//!
//! A LOOP (long-running out-of-process plugin) inherits a small, fully
//! resolved slice of the host configuration: how to log and which port to
//! expose Prometheus metrics on. The only channel across the process
//! boundary is the child's environment, so this crate provides both halves
//! of that contract:
//!
//! - [`apply_env_config`] stamps an [`EnvConfig`] into a [`LoopCommand`]
//!   on the host side, forwarding a fixed allow-list of ambient variables.
//! - [`read_env_config`] rebuilds an [`EnvSnapshot`] inside the plugin
//!   from its own environment.
//!
//! ```rust,no_run
//! use loop_config::{
//!     EnvSnapshot, LogLevel, LoggingSnapshot, LoopCommand, apply_env_config,
//! };
//!
//! let logging = LoggingSnapshot::new(LogLevel::Debug, true, false);
//! let mut command = LoopCommand::new("/usr/bin/median-plugin");
//! apply_env_config(&mut command, &EnvSnapshot::new(&logging, 9301));
//! assert_eq!(command.get_env("CL_LOG_LEVEL"), Some("debug"));
//! ```

mod command;
pub mod env;
mod level;
mod logging;

pub use command::LoopCommand;
pub use env::{
    EnvConfig, EnvConfigError, EnvSnapshot, EnvSource, ProcessEnv, apply_env_config,
    apply_env_config_from, read_env_config, read_env_config_from,
};
pub use level::{LogLevel, LogLevelParseError};
pub use logging::{LoggingConfig, LoggingSnapshot};
