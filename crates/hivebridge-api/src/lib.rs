//! HTTP clients for the remote sources of truth behind hivebridge:
//! the mesh-router vendor's cloud API (client presence) and the local
//! printer REST API (temperature and status).
//!
//! This crate owns transport mechanics only: credential injection,
//! response classification, and payload deserialization. What to do
//! with the data -- and when to retry -- is decided by `hivebridge-core`.

pub mod digest;
pub mod error;
pub mod mesh;
pub mod printer;
pub mod transport;

pub use error::Error;
pub use mesh::MeshClient;
pub use printer::PrinterClient;
pub use transport::{Credential, TransportConfig};
