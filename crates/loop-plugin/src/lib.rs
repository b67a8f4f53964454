//! Plugin-side start-up for LOOP executables.
//!
//! A LOOP is launched by its host with a fixed set of `CL_*` variables in
//! its environment. [`bootstrap::start`] decodes them, installs structured
//! telemetry that honours the inherited level and output format, and hands
//! back a [`PluginContext`] carrying the decoded configuration. A decoding
//! failure is fatal: the plugin cannot pick safe observability defaults on
//! its own.

pub mod bootstrap;
pub mod telemetry;

pub use bootstrap::{BootstrapError, PluginContext, start, start_from};
pub use telemetry::{TelemetryError, TelemetryHandle, UnixEpochTime};
