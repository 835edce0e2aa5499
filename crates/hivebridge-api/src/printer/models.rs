// ── Local printer API wire types ──

use serde::Deserialize;

/// `GET /api/v1/info` payload: printer identity and capabilities.
#[derive(Debug, Clone, Deserialize)]
pub struct PrinterInfo {
    pub serial: Option<String>,
    pub name: Option<String>,
    pub hostname: Option<String>,
    pub nozzle_diameter: Option<f64>,
    pub min_extrusion_temp: Option<f64>,
    #[serde(default)]
    pub mmu: bool,
    #[serde(default)]
    pub farm_mode: bool,
}

impl PrinterInfo {
    /// Best available human-readable name: configured name, then
    /// hostname, then serial.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.hostname.as_deref())
            .or(self.serial.as_deref())
    }
}

/// `GET /api/v1/status` payload. Only the printer block is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct PrinterStatus {
    pub printer: PrinterTelemetry,
}

/// Telemetry about the printer; all values except `state` are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct PrinterTelemetry {
    pub state: PrinterState,
    pub temp_nozzle: Option<f64>,
    pub target_nozzle: Option<f64>,
    pub temp_bed: Option<f64>,
    pub target_bed: Option<f64>,
    pub fan_hotend: Option<f64>,
    pub fan_print: Option<f64>,
}

/// Printer operational state as reported on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[non_exhaustive]
pub enum PrinterState {
    Idle,
    Busy,
    Printing,
    Paused,
    Finished,
    Stopped,
    Error,
    // Some firmware revisions ship the triple-T spelling.
    #[serde(alias = "ATTTENTION")]
    Attention,
    Ready,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_with_sparse_telemetry() {
        let status: PrinterStatus =
            serde_json::from_str(r#"{"printer": {"state": "IDLE"}}"#).unwrap();
        assert_eq!(status.printer.state, PrinterState::Idle);
        assert!(status.printer.temp_nozzle.is_none());
    }

    #[test]
    fn state_accepts_misspelled_attention() {
        let state: PrinterState = serde_json::from_str("\"ATTTENTION\"").unwrap();
        assert_eq!(state, PrinterState::Attention);
    }

    #[test]
    fn display_name_falls_back() {
        let info: PrinterInfo =
            serde_json::from_str(r#"{"serial": "SN1", "hostname": "printer.local"}"#).unwrap();
        assert_eq!(info.display_name(), Some("printer.local"));
    }
}
