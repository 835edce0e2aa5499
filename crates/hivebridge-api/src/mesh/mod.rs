// Mesh cloud API HTTP client
//
// Wraps `reqwest::Client` with vendor-specific URL construction,
// envelope unwrapping, and credential injection. Resource paths come
// back from the API itself (account -> network -> nodes/devices), so
// callers thread them through rather than hardcoding routes.

pub mod models;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{check_status, decode_json, Error};
use crate::transport::{Credential, TransportConfig};

pub use models::{
    Account, ClientDevice, Connectivity, DeviceSource, Envelope, LedCommand, MeshNode, Network,
    NetworkRef, NetworkResources, NodeDetail,
};

/// Client for the mesh-router vendor's cloud API.
///
/// Every response arrives wrapped in a `{ data: ... }` envelope; the
/// request helpers strip it before the caller sees the payload. The
/// session-cookie credential is attached to every request.
#[derive(Clone)]
pub struct MeshClient {
    http: reqwest::Client,
    base_url: Url,
    credential: Credential,
}

impl MeshClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the cloud API root; resource paths returned by the
    /// API are joined onto it.
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

    /// The cloud API root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /2.2/account` -- the networks visible to this credential.
    pub async fn account(&self) -> Result<Account, Error> {
        self.get("/2.2/account").await
    }

    /// Fetch a network's detail by its account-provided path.
    pub async fn network(&self, path: &str) -> Result<Network, Error> {
        self.get(path).await
    }

    /// List the mesh nodes (access points) of a network.
    pub async fn nodes(&self, path: &str) -> Result<Vec<MeshNode>, Error> {
        self.get(path).await
    }

    /// List the client devices seen by a network.
    pub async fn devices(&self, path: &str) -> Result<Vec<ClientDevice>, Error> {
        self.get(path).await
    }

    /// Fetch a node's detail -- used for the status LED state.
    pub async fn node_detail(&self, path: &str) -> Result<NodeDetail, Error> {
        self.get(path).await
    }

    /// Write the status LED state through a node's `led_action` resource.
    pub async fn set_node_led(&self, path: &str, command: &LedCommand) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self
            .credential
            .apply(self.http.put(url))
            .json(command)
            .send()
            .await
            .map_err(Error::Transport)?;

        check_status(resp)?;
        Ok(())
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    /// Send a GET request, classify the outcome, and unwrap the
    /// `{ data: ... }` envelope.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self
            .credential
            .apply(self.http.get(url))
            .send()
            .await
            .map_err(Error::Transport)?;

        let envelope: Envelope<T> = decode_json(check_status(resp)?).await?;
        Ok(envelope.data)
    }
}
