//! Registration handshake and per-launch command construction.
//!
//! [`CmdFactory::new`] runs the host's [`LoopRegistration`] exactly once and
//! keeps the resulting [`RegisteredLoop`]. Every [`CmdFactory::build`] call
//! then produces a new [`LoopCommand`], so a plugin can be restarted without
//! registering again and without reusing a command that already ran.

use std::path::{Path, PathBuf};

use loop_config::{
    EnvConfig, EnvSnapshot, EnvSource, LoggingSnapshot, LoopCommand, apply_env_config,
    apply_env_config_from,
};
use tracing::debug;

use crate::error::RegistrationError;

/// Tracing target for registration events.
const FACTORY_TARGET: &str = "loop_plugins::factory";

/// Registry record for a LOOP identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredLoop {
    name: String,
    env_config: EnvSnapshot,
}

impl RegisteredLoop {
    /// Creates a record for `name` with its resolved environment settings.
    #[must_use]
    pub fn new(name: impl Into<String>, env_config: EnvSnapshot) -> Self {
        Self {
            name: name.into(),
            env_config,
        }
    }

    /// Loop ID the record was registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration stamped into every command built for this LOOP.
    #[must_use]
    pub const fn env_config(&self) -> &EnvSnapshot {
        &self.env_config
    }
}

/// Process-wide registration function for LOOPs.
///
/// Implementations are the single serialisation point for registration and
/// must uphold two obligations:
///
/// - Idempotence: registering the same ID twice yields a record equivalent
///   to the first, without acquiring any resource (such as a metrics port)
///   a second time.
/// - Concurrency: callers racing on the same ID all observe the same record
///   and none fails because of the race.
///
/// Closures with a matching signature implement this trait.
pub trait LoopRegistration {
    /// Registers `loop_id`, or returns the existing record for it.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistrationError`] when the ID is unusable or the record
    /// cannot be produced. No partial registration may remain afterwards.
    fn register(
        &self,
        loop_id: &str,
        logging: &LoggingSnapshot,
    ) -> Result<RegisteredLoop, RegistrationError>;
}

impl<F> LoopRegistration for F
where
    F: Fn(&str, &LoggingSnapshot) -> Result<RegisteredLoop, RegistrationError>,
{
    fn register(
        &self,
        loop_id: &str,
        logging: &LoggingSnapshot,
    ) -> Result<RegisteredLoop, RegistrationError> {
        self(loop_id, logging)
    }
}

/// Construction request for a [`CmdFactory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdConfig {
    /// Loop ID used as the registry key.
    pub id: String,
    /// Executable path or name.
    pub cmd: PathBuf,
    /// Logging settings inherited by the LOOP.
    pub logging: LoggingSnapshot,
}

impl CmdConfig {
    /// Creates a construction request.
    #[must_use]
    pub fn new(id: impl Into<String>, cmd: impl Into<PathBuf>, logging: LoggingSnapshot) -> Self {
        Self {
            id: id.into(),
            cmd: cmd.into(),
            logging,
        }
    }
}

/// Builds launch commands for a registered LOOP.
///
/// # Example
///
/// ```
/// use loop_config::{EnvSnapshot, LoggingSnapshot};
/// use loop_plugins::{CmdConfig, CmdFactory, RegisteredLoop, RegistrationError};
///
/// let register = |id: &str, logging: &LoggingSnapshot| {
///     Ok::<_, RegistrationError>(RegisteredLoop::new(id, EnvSnapshot::new(logging, 0)))
/// };
/// let config = CmdConfig::new("median", "/usr/local/bin/median", LoggingSnapshot::default());
/// let factory = CmdFactory::new(&register, config).expect("registration succeeds");
///
/// let first = factory.build();
/// let second = factory.build();
/// assert_eq!(first, second);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdFactory {
    program: PathBuf,
    registered: RegisteredLoop,
}

impl CmdFactory {
    /// Registers the LOOP described by `config` through `registration`.
    ///
    /// The registration function is invoked exactly once per call.
    ///
    /// # Errors
    ///
    /// Propagates the [`RegistrationError`] returned by `registration`; no
    /// factory is produced in that case.
    pub fn new<R: LoopRegistration + ?Sized>(
        registration: &R,
        config: CmdConfig,
    ) -> Result<Self, RegistrationError> {
        let CmdConfig { id, cmd, logging } = config;
        let registered = registration.register(&id, &logging)?;

        debug!(
            target: FACTORY_TARGET,
            loop_id = %id,
            command = %cmd.display(),
            prometheus_port = registered.env_config().prometheus_port(),
            "LOOP registered"
        );

        Ok(Self {
            program: cmd,
            registered,
        })
    }

    /// Loop ID this factory builds commands for.
    #[must_use]
    pub fn loop_id(&self) -> &str {
        self.registered.name()
    }

    /// Executable launched by built commands.
    #[must_use]
    pub fn program(&self) -> &Path {
        self.program.as_path()
    }

    /// Configuration stamped into built commands.
    #[must_use]
    pub const fn env_config(&self) -> &EnvSnapshot {
        self.registered.env_config()
    }

    /// Builds a new command, forwarding allow-listed variables from the
    /// current process environment.
    #[must_use]
    pub fn build(&self) -> LoopCommand {
        let mut command = LoopCommand::new(&self.program);
        apply_env_config(&mut command, self.registered.env_config());
        command
    }

    /// Builds a new command, forwarding allow-listed variables from `host`.
    #[must_use]
    pub fn build_from<E: EnvSource + ?Sized>(&self, host: &E) -> LoopCommand {
        let mut command = LoopCommand::new(&self.program);
        apply_env_config_from(&mut command, self.registered.env_config(), host);
        command
    }

    /// Converts the factory into a plain command-building closure.
    #[must_use]
    pub fn into_fn(self) -> impl Fn() -> LoopCommand + Send + Sync + 'static {
        move || self.build()
    }
}
