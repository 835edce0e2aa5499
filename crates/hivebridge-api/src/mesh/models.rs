// ── Mesh cloud API wire types ──
//
// Only the fields the bridge consumes are modeled; the vendor payloads
// carry far more. Every response nests its payload under `data`.

use serde::{Deserialize, Serialize};

/// The `{ "data": ... }` envelope wrapping every cloud response.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// `GET /2.2/account` payload: the networks this account can see.
#[derive(Debug, Deserialize)]
pub struct Account {
    pub networks: NetworkList,
}

/// The account payload nests the network list under another `data` key.
#[derive(Debug, Deserialize)]
pub struct NetworkList {
    pub data: Vec<NetworkRef>,
}

/// A network as listed on the account: just enough to pick one and
/// follow its URL.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkRef {
    pub name: String,
    /// Path-relative URL of the network detail resource.
    pub url: String,
}

/// Network detail, fetched by following a [`NetworkRef::url`].
#[derive(Debug, Deserialize)]
pub struct Network {
    pub name: String,
    pub resources: NetworkResources,
}

/// Resource URLs hanging off a network.
#[derive(Debug, Deserialize)]
pub struct NetworkResources {
    /// Node (access point) list endpoint. The vendor names these after
    /// its hardware brand on the wire.
    #[serde(rename = "eeros")]
    pub nodes: String,
    /// Client-device list endpoint.
    pub devices: String,
}

/// A mesh access point as reported by the node list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MeshNode {
    pub serial: String,
    pub location: Option<String>,
    pub model: Option<String>,
    /// Nodes in bridge/extender-only roles do not serve wireless
    /// clients and are excluded from presence entirely.
    #[serde(default)]
    pub provides_wifi: bool,
    /// Path-relative URL of this node's detail resource.
    pub url: String,
    #[serde(default)]
    pub resources: NodeResources,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeResources {
    /// Endpoint accepting LED on/brightness writes.
    #[serde(default)]
    pub led_action: String,
}

/// Node detail payload -- consumed only for the status LED state.
#[derive(Debug, Deserialize)]
pub struct NodeDetail {
    #[serde(default)]
    pub led_on: bool,
    #[serde(default)]
    pub led_brightness: u8,
}

/// Body for LED writes. A brightness of zero turns the LED off.
#[derive(Debug, Serialize)]
pub struct LedCommand {
    pub led_on: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub led_brightness: Option<u8>,
}

impl LedCommand {
    pub fn on(on: bool) -> Self {
        Self {
            led_on: on,
            led_brightness: None,
        }
    }

    pub fn brightness(value: u8) -> Self {
        Self {
            led_on: value > 0,
            led_brightness: Some(value),
        }
    }
}

/// A client device (phone, laptop, watch...) seen by the network.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientDevice {
    pub display_name: Option<String>,
    pub device_type: Option<String>,
    pub connection_type: Option<String>,
    #[serde(default)]
    pub connected: bool,
    /// Missing for wired clients; defaults to a zero score, which the
    /// strict `>` threshold always excludes.
    #[serde(default)]
    pub connectivity: Connectivity,
    /// Absent while a device is disconnected from the network.
    #[serde(default)]
    pub source: Option<DeviceSource>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Connectivity {
    #[serde(default)]
    pub score: f64,
}

/// Which node a client device is currently attached to.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceSource {
    pub serial_number: String,
    pub location: Option<String>,
}
