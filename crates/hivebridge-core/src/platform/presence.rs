// Mesh presence platform: one occupancy sensor per access point,
// occupied while at least one allow-listed device is on it.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use hivebridge_api::mesh::{LedCommand, MeshNode};
use hivebridge_api::MeshClient;

use crate::config::PresenceConfig;
use crate::error::CoreError;
use crate::presence;
use crate::reconcile::{apply_plan, reconcile, RemoteEntity};
use crate::registry::{
    Accessory, AccessoryContext, AccessoryKind, AccessoryRegistry, Fault, SensorKind, SensorValue,
};

impl RemoteEntity for MeshNode {
    fn serial(&self) -> &str {
        &self.serial
    }

    // "Living room beacon" -- location and model joined, serial as a
    // last resort.
    fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.location.as_deref(), self.model.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            self.serial.clone()
        } else {
            parts.join(" ")
        }
    }
}

/// One mesh network bridged as a set of occupancy sensors.
pub struct PresencePlatform {
    config: PresenceConfig,
    client: MeshClient,
    registry: Arc<dyn AccessoryRegistry>,
    accessories: Vec<Accessory>,
    /// Device-list endpoint discovered from the network detail; the
    /// one URL every tick polls.
    devices_path: String,
    lights: Vec<(Uuid, StatusLight)>,
}

impl std::fmt::Debug for PresencePlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresencePlatform")
            .field("devices_path", &self.devices_path)
            .finish_non_exhaustive()
    }
}

impl PresencePlatform {
    /// Discover the configured network, reconcile its wifi-serving
    /// nodes against the registry cache, and return a platform ready
    /// to poll.
    ///
    /// Errors here are fatal to this platform instance only: the
    /// caller logs them and does not retry.
    pub async fn discover(
        config: PresenceConfig,
        client: MeshClient,
        registry: Arc<dyn AccessoryRegistry>,
    ) -> Result<Self, CoreError> {
        let account = client.account().await?;

        let network_ref = match &config.network {
            Some(name) => account
                .networks
                .data
                .iter()
                .find(|n| &n.name == name)
                .ok_or_else(|| CoreError::NetworkNotFound { name: name.clone() })?,
            None => account
                .networks
                .data
                .first()
                .ok_or_else(|| CoreError::Discovery {
                    message: "account has no networks".into(),
                })?,
        };
        info!(network = %network_ref.name, "using network");

        let network = client.network(&network_ref.url).await?;

        // Nodes that do not serve wireless clients can never be
        // occupied; they are excluded before reconciliation runs.
        let nodes: Vec<MeshNode> = client
            .nodes(&network.resources.nodes)
            .await?
            .into_iter()
            .filter(|n| n.provides_wifi)
            .collect();

        let cached = registry.cached();
        let plan = reconcile(&nodes, &cached);
        let accessories = apply_plan(plan, registry.as_ref(), make_accessory);

        let lights = if config.enable_status_light {
            nodes
                .iter()
                .map(|n| {
                    (
                        n.identity(),
                        StatusLight {
                            client: client.clone(),
                            node_path: n.url.clone(),
                            action_path: n.resources.led_action.clone(),
                        },
                    )
                })
                .collect()
        } else {
            Vec::new()
        };

        Ok(Self {
            config,
            client,
            registry,
            accessories,
            devices_path: network.resources.devices,
            lights,
        })
    }

    /// The accessories this instance publishes to.
    pub fn accessories(&self) -> &[Accessory] {
        &self.accessories
    }

    /// Status-light handles, one per node, when enabled.
    pub fn lights(&self) -> &[(Uuid, StatusLight)] {
        &self.lights
    }

    /// Poll until cancelled. Each tick runs to completion before the
    /// next is scheduled, so ticks never overlap and a slow response
    /// stretches the cadence instead of stacking requests. Tick
    /// failures are logged and swallowed; the loop itself never stops
    /// except through `cancel`.
    pub async fn run(&self, cancel: CancellationToken) {
        let interval = self.config.poll_interval();
        debug!("starting presence polling");

        loop {
            if let Err(e) = self.check_occupancy().await {
                warn!(error = %e, "presence poll tick failed");
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(interval) => {}
            }
        }

        debug!("presence polling stopped");
    }

    /// One tick: fetch the device list, match presence, publish one
    /// occupancy value per node.
    pub async fn check_occupancy(&self) -> Result<(), CoreError> {
        let devices = match self.client.devices(&self.devices_path).await {
            Ok(devices) => devices,
            Err(e) => {
                let fault = if e.is_auth_failure() {
                    Fault::Unauthorized
                } else {
                    Fault::Unreachable
                };
                for accessory in &self.accessories {
                    self.registry.publish_fault(accessory.id, fault);
                }
                return Err(e.into());
            }
        };

        let occupied = presence::occupied_nodes(&devices, &self.config);
        debug!(
            present = occupied.len(),
            devices = devices.len(),
            "matched presence"
        );

        for accessory in &self.accessories {
            self.registry.publish(
                accessory.id,
                SensorKind::Occupancy,
                SensorValue::Bool(occupied.contains(&accessory.id)),
            );
        }

        Ok(())
    }
}

fn make_accessory(node: &MeshNode) -> Accessory {
    Accessory {
        id: node.identity(),
        display_name: node.display_name(),
        context: AccessoryContext {
            serial: node.serial.clone(),
            kind: AccessoryKind::MeshNode,
            discovered_at: Utc::now(),
            snapshot: json!({
                "location": node.location,
                "model": node.model,
                "url": node.url,
                "led_action": node.resources.led_action,
            }),
        },
    }
}

/// Handle for a node's status LED, exposed as a secondary light
/// accessory when enabled. Get/set flow through the same transport
/// and classification as everything else.
pub struct StatusLight {
    client: MeshClient,
    node_path: String,
    action_path: String,
}

impl StatusLight {
    pub async fn is_on(&self) -> Result<bool, CoreError> {
        Ok(self.client.node_detail(&self.node_path).await?.led_on)
    }

    pub async fn brightness(&self) -> Result<u8, CoreError> {
        Ok(self.client.node_detail(&self.node_path).await?.led_brightness)
    }

    pub async fn set_on(&self, on: bool) -> Result<(), CoreError> {
        self.client
            .set_node_led(&self.action_path, &LedCommand::on(on))
            .await?;
        Ok(())
    }

    /// Brightness zero implies off; anything else implies on.
    pub async fn set_brightness(&self, value: u8) -> Result<(), CoreError> {
        self.client
            .set_node_led(&self.action_path, &LedCommand::brightness(value))
            .await?;
        Ok(())
    }
}
