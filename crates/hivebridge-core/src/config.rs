// ── Per-instance platform configuration ──
//
// One struct per device family, passed into each component call. No
// ambient globals: several printer instances (or several mesh
// accounts) can coexist in one process without interference.

use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

/// Configuration for one mesh presence platform instance.
#[derive(Debug, Deserialize)]
pub struct PresenceConfig {
    /// Session-cookie token from the vendor's login flow.
    pub user_token: SecretString,

    /// Cloud API root. Overridable for testing.
    #[serde(default = "default_api_url")]
    pub api_url: url::Url,

    /// Network to bridge. Unset selects the first network on the account.
    pub network: Option<String>,

    /// Poll cadence in milliseconds, measured from tick completion.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Minimum connectivity score; a device is present only when its
    /// score strictly exceeds this.
    #[serde(default = "default_min_signal")]
    pub min_signal: f64,

    /// Device types that count toward presence.
    #[serde(default = "default_device_types")]
    pub device_types: Vec<String>,

    /// Expose each node's status LED as a secondary light accessory.
    #[serde(default)]
    pub enable_status_light: bool,
}

impl PresenceConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// How a printer instance authenticates.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrinterAuth {
    ApiKey { key: SecretString },
    Digest {
        username: String,
        password: SecretString,
    },
}

/// Configuration for one printer platform instance.
#[derive(Debug, Deserialize)]
pub struct PrinterConfig {
    /// Printer root URL, e.g. `http://prusa.local`.
    pub url: url::Url,

    pub auth: PrinterAuth,

    /// Poll cadence in milliseconds, measured from tick completion.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Nozzle/bed convergence threshold in degrees: below it the
    /// printer counts as settled rather than cooling down.
    #[serde(default = "default_max_temp_delta")]
    pub max_temp_delta: f64,
}

impl PrinterConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn default_api_url() -> url::Url {
    "https://api-user.e2ro.com"
        .parse()
        .expect("static URL parses")
}

fn default_poll_interval_ms() -> u64 {
    5000
}

fn default_min_signal() -> f64 {
    0.7
}

fn default_device_types() -> Vec<String> {
    vec!["phone".into(), "watch".into()]
}

fn default_max_temp_delta() -> f64 {
    5.0
}
