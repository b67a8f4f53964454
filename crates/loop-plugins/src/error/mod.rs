//! Errors raised while registering LOOPs.
//!
//! Errors are returned to the immediate caller and never logged here.

use std::sync::Arc;

use thiserror::Error;

/// Errors arising from LOOP registration.
#[derive(Debug, Clone, Error)]
pub enum RegistrationError {
    /// The loop ID cannot be used as a registry key.
    #[error("invalid loop id {id:?}: {message}")]
    InvalidId {
        /// ID that was rejected.
        id: String,
        /// Reason for the rejection.
        message: String,
    },

    /// The loop was registered earlier with different logging settings.
    #[error("loop '{id}' is already registered with a different logging configuration")]
    Inconsistent {
        /// ID of the conflicting registration.
        id: String,
    },

    /// No metrics port is left to assign.
    #[error("no metrics port available for loop '{id}' above base port {base_port}")]
    PortsExhausted {
        /// ID that could not be assigned a port.
        id: String,
        /// Base port the registry allocates from.
        base_port: i64,
    },

    /// The host's registration function failed for another reason, such as
    /// the executable not resolving.
    #[error("failed to register loop '{id}': {message}")]
    Failed {
        /// ID being registered.
        id: String,
        /// Human-readable failure description.
        message: String,
        /// Optional underlying error.
        #[source]
        source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },
}

impl RegistrationError {
    /// Loop ID the failure relates to.
    #[must_use]
    pub fn loop_id(&self) -> &str {
        match self {
            Self::InvalidId { id, .. }
            | Self::Inconsistent { id }
            | Self::PortsExhausted { id, .. }
            | Self::Failed { id, .. } => id.as_str(),
        }
    }
}

#[cfg(test)]
mod tests;
