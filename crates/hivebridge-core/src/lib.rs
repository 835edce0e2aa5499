// hivebridge-core: platform logic between the remote APIs and the
// host's accessory registry. Owns identity derivation, cache
// reconciliation, presence matching, telemetry derivation, and the
// polling loops. Never touches the network directly -- that is
// hivebridge-api's job -- and never persists anything -- that is the
// registry's.

pub mod config;
pub mod error;
pub mod identity;
pub mod platform;
pub mod presence;
pub mod reconcile;
pub mod registry;
pub mod telemetry;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{PresenceConfig, PrinterAuth, PrinterConfig};
pub use error::CoreError;
pub use platform::presence::{PresencePlatform, StatusLight};
pub use platform::printer::PrinterPlatform;
pub use reconcile::{reconcile, ReconcilePlan, RemoteEntity};
pub use registry::{Accessory, AccessoryContext, AccessoryKind, AccessoryRegistry, Fault,
    SensorKind, SensorValue};
pub use telemetry::{derive_thermal, ThermalState};
