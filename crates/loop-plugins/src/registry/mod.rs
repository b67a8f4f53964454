//! Thread-safe, idempotent registry of LOOPs.
//!
//! [`LoopRegistry`] is a ready-made [`LoopRegistration`] for hosts. Each new
//! loop ID is assigned the next Prometheus port above the base port; a
//! repeated registration returns the stored record without allocating
//! another port.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use loop_config::{EnvSnapshot, LoggingSnapshot};
use tracing::debug;

use crate::error::RegistrationError;
use crate::factory::{LoopRegistration, RegisteredLoop};

/// Tracing target for registry operations.
const REGISTRY_TARGET: &str = "loop_plugins::registry";

/// Process-wide record of registered LOOPs.
///
/// A base port of `0` disables metrics for every LOOP: all records carry
/// port `0`.
///
/// # Example
///
/// ```
/// use loop_config::{EnvConfig, LoggingSnapshot};
/// use loop_plugins::{LoopRegistration, LoopRegistry};
///
/// let registry = LoopRegistry::new(9300);
/// let logging = LoggingSnapshot::default();
/// let first = registry.register("median", &logging).expect("first registration");
/// let again = registry.register("median", &logging).expect("repeat registration");
/// assert_eq!(first, again);
/// assert_eq!(again.env_config().prometheus_port(), 9301);
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LoopRegistry {
    base_port: i64,
    loops: Mutex<BTreeMap<String, RegisteredLoop>>,
}

impl LoopRegistry {
    /// Creates an empty registry allocating ports above `base_port`.
    #[must_use]
    pub const fn new(base_port: i64) -> Self {
        Self {
            base_port,
            loops: Mutex::new(BTreeMap::new()),
        }
    }

    /// Port the registry allocates from.
    #[must_use]
    pub const fn base_port(&self) -> i64 {
        self.base_port
    }

    /// Looks up a registered LOOP by ID.
    #[must_use]
    pub fn get(&self, loop_id: &str) -> Option<RegisteredLoop> {
        self.lock().get(loop_id).cloned()
    }

    /// Returns every registered LOOP ordered by ID.
    #[must_use]
    pub fn list(&self) -> Vec<RegisteredLoop> {
        self.lock().values().cloned().collect()
    }

    /// Returns the number of registered LOOPs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` when no LOOPs are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave a half-inserted record,
    // so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, RegisteredLoop>> {
        self.loops.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn port_for(&self, loop_id: &str, registered: usize) -> Result<i64, RegistrationError> {
        if self.base_port == 0 {
            return Ok(0);
        }
        i64::try_from(registered)
            .ok()
            .and_then(|count| count.checked_add(1))
            .and_then(|offset| self.base_port.checked_add(offset))
            .ok_or_else(|| RegistrationError::PortsExhausted {
                id: loop_id.to_owned(),
                base_port: self.base_port,
            })
    }
}

impl LoopRegistration for LoopRegistry {
    fn register(
        &self,
        loop_id: &str,
        logging: &LoggingSnapshot,
    ) -> Result<RegisteredLoop, RegistrationError> {
        validate_id(loop_id)?;

        let mut loops = self.lock();
        if let Some(existing) = loops.get(loop_id) {
            if existing.env_config().logging() != *logging {
                return Err(RegistrationError::Inconsistent {
                    id: loop_id.to_owned(),
                });
            }
            debug!(
                target: REGISTRY_TARGET,
                loop_id,
                "LOOP already registered; reusing record"
            );
            return Ok(existing.clone());
        }

        let port = self.port_for(loop_id, loops.len())?;
        let registered = RegisteredLoop::new(loop_id, EnvSnapshot::new(logging, port));
        loops.insert(loop_id.to_owned(), registered.clone());

        debug!(
            target: REGISTRY_TARGET,
            loop_id,
            prometheus_port = port,
            registered = loops.len(),
            "LOOP added to registry"
        );
        Ok(registered)
    }
}

fn validate_id(loop_id: &str) -> Result<(), RegistrationError> {
    if loop_id.trim().is_empty() {
        return Err(RegistrationError::InvalidId {
            id: loop_id.to_owned(),
            message: String::from("loop id must not be blank"),
        });
    }
    if loop_id.chars().any(char::is_control) {
        return Err(RegistrationError::InvalidId {
            id: loop_id.to_owned(),
            message: String::from("loop id must not contain control characters"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests;
