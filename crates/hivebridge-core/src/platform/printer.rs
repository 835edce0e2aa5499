// Printer platform: one accessory exposing a single averaged
// temperature and a settled-state boolean.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use hivebridge_api::printer::PrinterInfo;
use hivebridge_api::PrinterClient;

use crate::config::PrinterConfig;
use crate::error::CoreError;
use crate::reconcile::{apply_plan, reconcile, RemoteEntity};
use crate::registry::{
    Accessory, AccessoryContext, AccessoryKind, AccessoryRegistry, Fault, SensorKind, SensorValue,
};
use crate::telemetry::{derive_thermal, ThermalState};

/// A printer whose identity has been confirmed at discovery time.
struct DiscoveredPrinter {
    serial: String,
    name: String,
    info: PrinterInfo,
}

impl RemoteEntity for DiscoveredPrinter {
    fn serial(&self) -> &str {
        &self.serial
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

/// One local printer bridged as a temperature + activity accessory.
pub struct PrinterPlatform {
    config: PrinterConfig,
    client: PrinterClient,
    registry: Arc<dyn AccessoryRegistry>,
    accessory: Accessory,
}

impl std::fmt::Debug for PrinterPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrinterPlatform").finish_non_exhaustive()
    }
}

impl PrinterPlatform {
    /// Fetch the printer's identity and reconcile it against the
    /// registry cache. A printer that reports no serial cannot be
    /// given a stable identity and fails discovery.
    pub async fn discover(
        config: PrinterConfig,
        client: PrinterClient,
        registry: Arc<dyn AccessoryRegistry>,
    ) -> Result<Self, CoreError> {
        let info = client.info().await?;

        let serial = info.serial.clone().ok_or_else(|| CoreError::Discovery {
            message: format!("printer at {} reported no serial", client.base_url()),
        })?;
        let name = info
            .display_name()
            .map_or_else(|| serial.clone(), ToOwned::to_owned);

        let printers = [DiscoveredPrinter { serial, name, info }];
        let cached = registry.cached();
        let plan = reconcile(&printers, &cached);
        let mut accessories = apply_plan(plan, registry.as_ref(), make_accessory);

        let accessory = accessories.pop().ok_or_else(|| CoreError::Discovery {
            message: "reconciliation produced no accessory".into(),
        })?;

        Ok(Self {
            config,
            client,
            registry,
            accessory,
        })
    }

    pub fn accessory(&self) -> &Accessory {
        &self.accessory
    }

    /// Poll until cancelled; same serialized, self-resuming loop as
    /// the presence platform.
    pub async fn run(&self, cancel: CancellationToken) {
        let interval = self.config.poll_interval();
        debug!(printer = %self.accessory.display_name, "starting printer polling");

        loop {
            if let Err(e) = self.check_telemetry().await {
                warn!(error = %e, "printer poll tick failed");
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(interval) => {}
            }
        }

        debug!("printer polling stopped");
    }

    /// One tick: fetch status, derive the thermal state, publish.
    ///
    /// A busy printer surfaces as a busy condition -- the previous
    /// temperature value is deliberately not overwritten while the
    /// device is heating toward a target.
    pub async fn check_telemetry(&self) -> Result<(), CoreError> {
        let status = match self.client.status().await {
            Ok(status) => status,
            Err(e) => {
                let fault = if e.is_auth_failure() {
                    Fault::Unauthorized
                } else {
                    Fault::Unreachable
                };
                self.registry.publish_fault(self.accessory.id, fault);
                return Err(e.into());
            }
        };

        let printer = &status.printer;
        debug!(state = ?printer.state, "printer status");

        match derive_thermal(
            printer.temp_nozzle,
            printer.temp_bed,
            printer.target_nozzle,
            printer.target_bed,
            self.config.max_temp_delta,
        ) {
            Ok(ThermalState::Steady {
                active,
                temperature,
            }) => {
                self.registry.publish(
                    self.accessory.id,
                    SensorKind::Temperature,
                    SensorValue::Number(temperature),
                );
                self.registry.publish(
                    self.accessory.id,
                    SensorKind::Active,
                    SensorValue::Bool(active),
                );
                Ok(())
            }
            Ok(ThermalState::Busy) => {
                self.registry.publish_fault(self.accessory.id, Fault::Busy);
                Ok(())
            }
            Err(sanity) => {
                // Absent data reports the same as an unreachable device.
                self.registry
                    .publish_fault(self.accessory.id, Fault::Unreachable);
                Err(sanity.into())
            }
        }
    }
}

fn make_accessory(printer: &DiscoveredPrinter) -> Accessory {
    Accessory {
        id: printer.identity(),
        display_name: printer.display_name(),
        context: AccessoryContext {
            serial: printer.serial.clone(),
            kind: AccessoryKind::Printer,
            discovered_at: Utc::now(),
            snapshot: json!({
                "name": printer.info.name,
                "hostname": printer.info.hostname,
                "nozzle_diameter": printer.info.nozzle_diameter,
                "mmu": printer.info.mmu,
            }),
        },
    }
}
