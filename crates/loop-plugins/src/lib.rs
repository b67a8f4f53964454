//! Registration of LOOP executables for a host process.
//!
//! A LOOP (long-running out-of-process plugin) is registered once per
//! logical identity. Registration is delegated to a process-wide
//! [`LoopRegistration`] implementation supplied by the host, which must be
//! idempotent and safe to call concurrently for the same identity. The
//! result is a [`CmdFactory`] that builds a fresh [`LoopCommand`] on every
//! launch, with the LOOP's logging and metrics configuration stamped into
//! its environment.
//!
//! The [`Registrar`] is the façade hosts hold on to: it carries the ambient
//! logging snapshot and the transport options used to dial plugins, so call
//! sites only provide a loop ID and an executable.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use loop_config::{LogLevel, LoggingSnapshot};
//! use loop_plugins::{LoopRegistry, Registrar};
//!
//! let logging = LoggingSnapshot::new(LogLevel::Info, true, false);
//! let registry = Arc::new(LoopRegistry::new(9300));
//! let registrar = Registrar::new(&logging, "insecure", Arc::clone(&registry));
//!
//! let (factory, _transport) = registrar
//!     .register_loop("median", "/usr/local/bin/median")
//!     .expect("registration succeeds");
//! let command = factory.build();
//! assert_eq!(command.get_env("CL_PROMETHEUS_PORT"), Some("9301"));
//! ```

pub mod error;
pub mod factory;
pub mod registrar;
pub mod registry;

#[cfg(test)]
mod tests;

pub use self::error::RegistrationError;
pub use self::factory::{CmdConfig, CmdFactory, LoopRegistration, RegisteredLoop};
pub use self::registrar::Registrar;
pub use self::registry::LoopRegistry;
pub use loop_config::LoopCommand;
