// ── Platform instances ──
//
// One platform per device family: discovery populates the registry
// once at startup, then a serialized polling loop keeps the sensors
// current for the lifetime of the process.

pub mod presence;
pub mod printer;
