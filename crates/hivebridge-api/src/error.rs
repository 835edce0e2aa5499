use thiserror::Error;

/// Top-level error type for the `hivebridge-api` crate.
///
/// Every failure a request can produce lands in one of these variants.
/// Consumers rarely match on individual variants -- the two
/// classification helpers below collapse the taxonomy into the
/// auth-failure / comm-failure split that the polling layer reports.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The remote rejected our credential (HTTP 401).
    #[error("insufficient authorization: credential rejected")]
    Unauthorized,

    /// A digest challenge could not be answered (malformed or
    /// unsupported `WWW-Authenticate` header).
    #[error("digest challenge failed: {message}")]
    DigestChallenge { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// Network-level error (DNS failure, connection refused, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Unexpected HTTP status other than 401.
    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the remote understood the request but rejected
    /// the credential. Surfaced distinctly so the host can report
    /// "insufficient authorization" rather than "unreachable".
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns `true` for everything else: network-level failures,
    /// unexpected statuses, and undecodable payloads all collapse into
    /// a generic "service unreachable" condition at the reporting
    /// boundary.
    pub fn is_comm_failure(&self) -> bool {
        !self.is_auth_failure()
    }
}

/// Classify a settled HTTP response, in the fixed order the polling
/// layer depends on: 401 first, then any other non-2xx status.
///
/// Network-level errors never reach this function -- they surface as
/// [`Error::Transport`] from the send itself.
pub(crate) fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Unauthorized);
    }
    if !status.is_success() {
        return Err(Error::Status {
            status: status.as_u16(),
        });
    }
    Ok(resp)
}

/// Decode a 2xx response body as JSON, keeping the raw body around for
/// the error path.
pub(crate) async fn decode_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, Error> {
    let body = resp.text().await.map_err(Error::Transport)?;
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_is_auth_failure() {
        assert!(Error::Unauthorized.is_auth_failure());
        assert!(!Error::Unauthorized.is_comm_failure());
    }

    #[test]
    fn other_errors_are_comm_failures() {
        assert!(Error::Status { status: 500 }.is_comm_failure());
        assert!(
            Error::Deserialization {
                message: "eof".into(),
                body: String::new(),
            }
            .is_comm_failure()
        );
        assert!(
            Error::DigestChallenge {
                message: "missing nonce".into(),
            }
            .is_comm_failure()
        );
    }
}
