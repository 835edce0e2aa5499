// ── Accessory registry port ──
//
// The host runtime owns accessory persistence, the UUID namespace on
// its side, and the characteristic plumbing. Core code talks to it
// through this capability trait only; tests substitute a mock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which device family an accessory belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessoryKind {
    MeshNode,
    Printer,
}

/// Opaque context persisted alongside an accessory: the last-known
/// remote entity subset plus whatever the platform wants to find again
/// after a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessoryContext {
    pub serial: String,
    pub kind: AccessoryKind,
    pub discovered_at: DateTime<Utc>,
    /// Last-known remote entity snapshot, shape owned by the platform.
    #[serde(default)]
    pub snapshot: serde_json::Value,
}

/// A previously discovered entity as the registry caches it.
///
/// The identity is a pure function of the serial (see
/// [`crate::identity::for_serial`]), which is what makes re-discovery
/// after a restart idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accessory {
    pub id: Uuid,
    pub display_name: String,
    pub context: AccessoryContext,
}

impl Accessory {
    /// The serial recorded at discovery time. Compared against the
    /// live serial during reconciliation to catch identity-slot
    /// mismatches.
    pub fn serial(&self) -> &str {
        &self.context.serial
    }
}

/// Sensor slots an accessory can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Presence per mesh node: someone's allowed device is on it.
    Occupancy,
    /// Averaged printer temperature.
    Temperature,
    /// Printer settled-state boolean.
    Active,
}

/// A value published to a sensor characteristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorValue {
    Bool(bool),
    Number(f64),
}

/// Non-value conditions surfaced to the host instead of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Generic "service unreachable" -- comm failures and telemetry
    /// sanity failures both land here.
    Unreachable,
    /// Credential rejected by the remote.
    Unauthorized,
    /// Device is transitioning (printer heating toward a target);
    /// the previous value must not be overwritten.
    Busy,
}

/// Host-provided accessory registry and characteristic sink.
///
/// Persistence and restart survival are the registry's responsibility.
/// Callers must apply a reconciliation plan (register/update/
/// unregister) before the next poll cycle reads cached state; within
/// one process everything runs on the single poll task, so that
/// ordering holds by construction.
pub trait AccessoryRegistry: Send + Sync {
    /// All accessories restored from the host's cache.
    fn cached(&self) -> Vec<Accessory>;

    /// Look up a cached accessory by identity.
    fn find(&self, id: Uuid) -> Option<Accessory> {
        self.cached().into_iter().find(|a| a.id == id)
    }

    fn register(&self, accessories: Vec<Accessory>);

    fn update(&self, accessories: Vec<Accessory>);

    fn unregister(&self, accessories: Vec<Accessory>);

    /// Publish a sensor value for an accessory.
    fn publish(&self, id: Uuid, kind: SensorKind, value: SensorValue);

    /// Surface a fault condition for an accessory.
    fn publish_fault(&self, id: Uuid, fault: Fault);
}
