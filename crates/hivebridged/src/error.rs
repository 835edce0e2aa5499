use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("config file not found: {}", path.display())]
    NoConfig { path: PathBuf },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("nothing to bridge: configure a [mesh] section or at least one [[printers]] entry")]
    NothingConfigured,

    #[error("no platform came up: every configured instance failed discovery")]
    AllPlatformsFailed,

    #[error(transparent)]
    Api(#[from] hivebridge_api::Error),

    #[error(transparent)]
    Core(#[from] hivebridge_core::CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for BridgeError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}
