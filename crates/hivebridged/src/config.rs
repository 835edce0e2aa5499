// ── Daemon configuration ──
//
// One TOML file, environment overrides on top. The platform sections
// deserialize straight into the core config types; only daemon-level
// concerns (state path, transport) live here.
//
// ```toml
// state_path = "/var/lib/hivebridge/accessories.json"
//
// [mesh]
// user_token = "..."
// network = "Home"
//
// [[printers]]
// url = "http://prusa.local"
// auth = { digest = { username = "maker", password = "..." } }
// ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

use hivebridge_api::TransportConfig;
use hivebridge_core::{PresenceConfig, PrinterConfig};

use crate::error::BridgeError;

#[derive(Debug, Deserialize)]
pub struct BridgeConfig {
    /// Accessory cache location. Unset disables persistence, and every
    /// start rediscovers from scratch.
    pub state_path: Option<PathBuf>,

    /// HTTP request timeout in seconds, shared by all clients.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Accept self-signed certificates. Local printers ship them; the
    /// cloud API never needs this.
    #[serde(default)]
    pub insecure: bool,

    /// Mesh presence platform, at most one per process.
    pub mesh: Option<PresenceConfig>,

    /// Printer platforms, one entry per printer.
    #[serde(default)]
    pub printers: Vec<PrinterConfig>,
}

impl BridgeConfig {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            danger_accept_invalid_certs: self.insecure,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Load the daemon config from `path`, with `HIVEBRIDGE_`-prefixed
/// environment variables layered on top (`__` separates nesting, e.g.
/// `HIVEBRIDGE_MESH__USER_TOKEN`).
pub fn load(path: &Path) -> Result<BridgeConfig, BridgeError> {
    if !path.exists() {
        return Err(BridgeError::NoConfig {
            path: path.to_path_buf(),
        });
    }

    let config: BridgeConfig = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("HIVEBRIDGE_").split("__"))
        .extract()?;

    if config.mesh.is_none() && config.printers.is_empty() {
        return Err(BridgeError::NothingConfigured);
    }

    if config.timeout_secs == 0 {
        return Err(BridgeError::Validation {
            field: "timeout_secs".into(),
            reason: "must be greater than zero".into(),
        });
    }

    Ok(config)
}
