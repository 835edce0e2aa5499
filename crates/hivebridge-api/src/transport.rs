// Shared transport configuration for building reqwest::Client instances.
//
// Both the mesh and printer clients share timeout and user-agent
// settings through this module. Credentials are injected per request,
// not baked into the client, so one client can serve several
// configured platform instances.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// How a request authenticates against its remote.
#[derive(Clone)]
pub enum Credential {
    /// Session-cookie token (`Cookie: s={token}`) for the mesh cloud API.
    ///
    /// The token comes from the vendor's interactive login flow, which
    /// is outside this crate -- we only carry the resulting secret.
    SessionCookie(SecretString),
    /// API key header (`X-Api-Key`) for printers exposing key auth.
    ApiKey(SecretString),
    /// HTTP digest challenge credentials for locally-authenticated
    /// printers. Answered by [`crate::digest`].
    Digest {
        username: String,
        password: SecretString,
    },
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SessionCookie(_) => f.write_str("Credential::SessionCookie(..)"),
            Self::ApiKey(_) => f.write_str("Credential::ApiKey(..)"),
            Self::Digest { username, .. } => {
                write!(f, "Credential::Digest {{ username: {username:?}, .. }}")
            }
        }
    }
}

impl Credential {
    /// Attach this credential to an outgoing request.
    ///
    /// Digest credentials are a no-op here -- they are answered
    /// reactively from the 401 challenge by the digest module.
    pub(crate) fn apply(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::SessionCookie(token) => req.header(
                reqwest::header::COOKIE,
                format!("s={}", token.expose_secret()),
            ),
            Self::ApiKey(key) => req.header("X-Api-Key", key.expose_secret()),
            Self::Digest { .. } => req,
        }
    }
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    /// Accept self-signed certificates (local printers ship them).
    pub danger_accept_invalid_certs: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            danger_accept_invalid_certs: false,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("hivebridge/", env!("CARGO_PKG_VERSION")));

        if self.danger_accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder.build().map_err(Error::Transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_leaks_secrets() {
        let cred = Credential::SessionCookie(SecretString::from("super-secret".to_owned()));
        let out = format!("{cred:?}");
        assert!(!out.contains("super-secret"));

        let cred = Credential::Digest {
            username: "maker".into(),
            password: SecretString::from("hunter2".to_owned()),
        };
        let out = format!("{cred:?}");
        assert!(out.contains("maker"));
        assert!(!out.contains("hunter2"));
    }
}
