mod config;
mod error;
mod registry;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use hivebridge_api::{Credential, MeshClient, PrinterClient};
use hivebridge_core::{PresencePlatform, PrinterAuth, PrinterPlatform};

use crate::error::BridgeError;
use crate::registry::FileRegistry;

#[derive(Debug, Parser)]
#[command(name = "hivebridged", version, about)]
struct Args {
    /// Path to the TOML config file.
    #[arg(short, long, env = "HIVEBRIDGE_CONFIG", default_value = "hivebridge.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(err) = run(args).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<(), BridgeError> {
    let config = config::load(&args.config)?;
    let transport = config.transport();
    let registry = Arc::new(FileRegistry::open(config.state_path.clone()));

    let cancel = CancellationToken::new();
    let mut tasks = Vec::new();

    // Discovery failures are fatal to the failing platform instance
    // only; the rest of the bridge keeps running.
    if let Some(mesh) = config.mesh {
        let client = MeshClient::new(
            mesh.api_url.clone(),
            Credential::SessionCookie(mesh.user_token.clone()),
            &transport,
        )?;

        match PresencePlatform::discover(mesh, client, registry.clone()).await {
            Ok(platform) => {
                info!(nodes = platform.accessories().len(), "presence platform up");
                let platform = Arc::new(platform);
                report_status_lights(&platform).await;
                let cancel = cancel.clone();
                tasks.push(tokio::spawn(
                    async move { platform.run(cancel).await },
                ));
            }
            Err(e) => error!(error = %e, "presence discovery failed"),
        }
    }

    for printer in config.printers {
        let credential = match &printer.auth {
            PrinterAuth::ApiKey { key } => Credential::ApiKey(key.clone()),
            PrinterAuth::Digest { username, password } => Credential::Digest {
                username: username.clone(),
                password: password.clone(),
            },
        };
        let client = PrinterClient::new(printer.url.clone(), credential, &transport)?;
        let url = printer.url.clone();

        match PrinterPlatform::discover(printer, client, registry.clone()).await {
            Ok(platform) => {
                info!(printer = %platform.accessory().display_name, "printer platform up");
                let platform = Arc::new(platform);
                let cancel = cancel.clone();
                tasks.push(tokio::spawn(
                    async move { platform.run(cancel).await },
                ));
            }
            Err(e) => error!(error = %e, url = %url, "printer discovery failed"),
        }
    }

    if tasks.is_empty() {
        return Err(BridgeError::AllPlatformsFailed);
    }

    info!(platforms = tasks.len(), "bridge running, ctrl-c to stop");

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }

    info!("shutting down");
    cancel.cancel();
    for task in tasks {
        let _ = task.await;
    }

    Ok(())
}

/// Surface each node's LED state at startup when status lights are
/// enabled. An unreadable LED is a warning, not a startup failure.
async fn report_status_lights(platform: &PresencePlatform) {
    for (node, light) in platform.lights() {
        match (light.is_on().await, light.brightness().await) {
            (Ok(on), Ok(brightness)) => {
                info!(node = %node, on, brightness, "status light");
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(node = %node, error = %e, "status light unreadable");
            }
        }
    }
}
