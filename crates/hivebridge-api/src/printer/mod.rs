// Local printer REST API client
//
// Two endpoints, two auth schemes: an API-key header where the printer
// exposes one, or an HTTP digest challenge answered per request. Both
// funnel into the same classification rules as the mesh client.

pub mod models;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::digest;
use crate::error::{check_status, decode_json, Error};
use crate::transport::{Credential, TransportConfig};

pub use models::{PrinterInfo, PrinterState, PrinterStatus, PrinterTelemetry};

/// Client for a printer's local REST API.
#[derive(Clone)]
pub struct PrinterClient {
    http: reqwest::Client,
    base_url: Url,
    credential: Credential,
}

impl PrinterClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the printer root, e.g. `http://prusa.local`.
    pub fn new(
        base_url: Url,
        credential: Credential,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            credential,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, credential: Credential) -> Self {
        Self {
            http,
            base_url,
            credential,
        }
    }

    /// The printer root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /api/v1/info` -- identity (serial, name, hostname).
    pub async fn info(&self) -> Result<PrinterInfo, Error> {
        self.get("/api/v1/info").await
    }

    /// `GET /api/v1/status` -- temperatures, targets, and state.
    pub async fn status(&self) -> Result<PrinterStatus, Error> {
        self.get("/api/v1/status").await
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.base_url.join(path).map_err(Error::InvalidUrl)?;
        debug!("GET {url}");

        match &self.credential {
            Credential::Digest { username, password } => {
                digest::get_json(&self.http, url, username, password).await
            }
            credential => {
                let resp = credential
                    .apply(self.http.get(url))
                    .send()
                    .await
                    .map_err(Error::Transport)?;
                decode_json(check_status(resp)?).await
            }
        }
    }
}
