// ── Core error types ──
//
// What the polling layer and the host see. Transport details collapse
// into the unreachable/unauthorized split here; consumers never handle
// HTTP statuses or JSON parse failures directly.

use thiserror::Error;

use crate::telemetry::SanityFailure;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Poll-time conditions (recoverable, retried next tick) ────────
    /// The remote could not be reached or answered nonsense.
    #[error("service unreachable: {message}")]
    Unreachable { message: String },

    /// The remote rejected our credential.
    #[error("insufficient authorization: {message}")]
    Unauthorized { message: String },

    // ── Discovery-time errors (fatal to the platform instance) ───────
    /// The configured network does not exist on this account.
    #[error("network '{name}' not found")]
    NetworkNotFound { name: String },

    /// The remote did not report a field discovery cannot proceed
    /// without (e.g. a printer with no serial).
    #[error("discovery failed: {message}")]
    Discovery { message: String },
}

impl CoreError {
    /// Discovery-time errors abort platform startup; everything else is
    /// logged and retried on the next tick.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NetworkNotFound { .. } | Self::Discovery { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<hivebridge_api::Error> for CoreError {
    fn from(err: hivebridge_api::Error) -> Self {
        if err.is_auth_failure() {
            CoreError::Unauthorized {
                message: err.to_string(),
            }
        } else {
            CoreError::Unreachable {
                message: err.to_string(),
            }
        }
    }
}

// Absent telemetry is indistinguishable from an unreachable device at
// the reporting boundary.
impl From<SanityFailure> for CoreError {
    fn from(err: SanityFailure) -> Self {
        CoreError::Unreachable {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_translate_to_unauthorized() {
        let err = CoreError::from(hivebridge_api::Error::Unauthorized);
        assert!(matches!(err, CoreError::Unauthorized { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn comm_failures_translate_to_unreachable() {
        let err = CoreError::from(hivebridge_api::Error::Status { status: 502 });
        assert!(matches!(err, CoreError::Unreachable { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn discovery_errors_are_fatal() {
        assert!(CoreError::NetworkNotFound { name: "Cabin".into() }.is_fatal());
    }
}
