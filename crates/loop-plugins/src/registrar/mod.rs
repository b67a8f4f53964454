//! Host-facing façade over LOOP registration.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use loop_config::{LogLevel, LoggingConfig, LoggingSnapshot};

use crate::error::RegistrationError;
use crate::factory::{CmdConfig, CmdFactory, LoopRegistration};

/// Registers LOOPs on behalf of the host.
///
/// The registrar holds the host's logging snapshot, the transport options
/// used to dial plugins, and the shared registration function. Cloning a
/// registrar shares the same registration function, so every clone sees
/// the same process-wide registry.
pub struct Registrar<R: ?Sized, O> {
    logging: LoggingSnapshot,
    transport_opts: O,
    registration: Arc<R>,
}

impl<R: ?Sized, O> Registrar<R, O> {
    /// Creates a registrar from the host's logging settings, the transport
    /// options handed back for every LOOP, and the registration function.
    ///
    /// `registration` must be idempotent and safe for concurrent use; see
    /// [`LoopRegistration`].
    #[must_use]
    pub fn new<L: LoggingConfig + ?Sized>(
        logging: &L,
        transport_opts: O,
        registration: Arc<R>,
    ) -> Self {
        Self {
            logging: LoggingSnapshot::from_config(logging),
            transport_opts,
            registration,
        }
    }

    /// Logging settings passed to every registered LOOP.
    #[must_use]
    pub const fn logging(&self) -> &LoggingSnapshot {
        &self.logging
    }

    /// Transport options handed back with every factory.
    #[must_use]
    pub const fn transport_opts(&self) -> &O {
        &self.transport_opts
    }
}

impl<R, O> Registrar<R, O>
where
    R: LoopRegistration + ?Sized,
    O: Clone,
{
    /// Registers `loop_id` to run `cmd_name` and returns the command factory
    /// together with the transport options for dialling it.
    ///
    /// # Errors
    ///
    /// Returns the [`RegistrationError`] produced by the registration
    /// function.
    pub fn register_loop(
        &self,
        loop_id: &str,
        cmd_name: impl Into<PathBuf>,
    ) -> Result<(CmdFactory, O), RegistrationError> {
        let config = CmdConfig::new(loop_id, cmd_name, self.logging);
        let factory = CmdFactory::new(&*self.registration, config)?;
        Ok((factory, self.transport_opts.clone()))
    }
}

impl<R: ?Sized, O> LoggingConfig for Registrar<R, O> {
    fn level(&self) -> LogLevel {
        self.logging.level()
    }

    fn json_console(&self) -> bool {
        self.logging.json_console()
    }

    fn unix_timestamps(&self) -> bool {
        self.logging.unix_timestamps()
    }
}

impl<R: ?Sized, O: Clone> Clone for Registrar<R, O> {
    fn clone(&self) -> Self {
        Self {
            logging: self.logging,
            transport_opts: self.transport_opts.clone(),
            registration: Arc::clone(&self.registration),
        }
    }
}

impl<R: ?Sized, O: fmt::Debug> fmt::Debug for Registrar<R, O> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Registrar")
            .field("logging", &self.logging)
            .field("transport_opts", &self.transport_opts)
            .finish_non_exhaustive()
    }
}
