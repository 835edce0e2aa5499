// ── Device filter & matcher ──
//
// Pure function: which mesh nodes currently host at least one
// "present" client device. Presence is reported per node, not per
// client -- the occupancy sensors hang off the access points.

use std::collections::HashSet;

use hivebridge_api::mesh::ClientDevice;
use uuid::Uuid;

use crate::config::PresenceConfig;
use crate::identity;

/// A device counts as present iff its type is allow-listed, it is
/// connected over wireless, and its connectivity score strictly
/// exceeds the configured minimum. A score exactly at the minimum
/// excludes the device.
fn is_present(device: &ClientDevice, config: &PresenceConfig) -> bool {
    device.connected
        && device.connection_type.as_deref() == Some("wireless")
        && device
            .device_type
            .as_deref()
            .is_some_and(|t| config.device_types.iter().any(|allowed| allowed == t))
        && device.connectivity.score > config.min_signal
}

/// Map the device list to the set of node identities with at least one
/// present client. Absence from the set means "not occupied", never
/// "unknown".
pub fn occupied_nodes(devices: &[ClientDevice], config: &PresenceConfig) -> HashSet<Uuid> {
    devices
        .iter()
        .filter(|d| is_present(d, config))
        .filter_map(|d| d.source.as_ref())
        .map(|source| identity::for_serial(&source.serial_number))
        .collect()
}

#[cfg(test)]
mod tests {
    use hivebridge_api::mesh::{Connectivity, DeviceSource};

    use super::*;

    fn config() -> PresenceConfig {
        serde_json::from_str(r#"{ "user_token": "tok" }"#).unwrap()
    }

    fn device(device_type: &str, connection: &str, connected: bool, score: f64) -> ClientDevice {
        ClientDevice {
            display_name: Some(format!("{device_type} on {connection}")),
            device_type: Some(device_type.into()),
            connection_type: Some(connection.into()),
            connected,
            connectivity: Connectivity { score },
            source: Some(DeviceSource {
                serial_number: "NODE-AAA".into(),
                location: Some("Living room".into()),
            }),
        }
    }

    #[test]
    fn present_phone_marks_its_node() {
        let devices = vec![device("phone", "wireless", true, 0.9)];
        let nodes = occupied_nodes(&devices, &config());
        assert_eq!(nodes.len(), 1);
        assert!(nodes.contains(&identity::for_serial("NODE-AAA")));
    }

    #[test]
    fn score_at_threshold_is_excluded() {
        // Strict '>' comparison: exactly the minimum does not count.
        let devices = vec![device("phone", "wireless", true, 0.7)];
        assert!(occupied_nodes(&devices, &config()).is_empty());

        let devices = vec![device("phone", "wireless", true, 0.700_001)];
        assert_eq!(occupied_nodes(&devices, &config()).len(), 1);
    }

    #[test]
    fn disallowed_types_and_wired_links_are_ignored() {
        let devices = vec![
            device("laptop", "wireless", true, 0.9),
            device("phone", "wired", true, 0.9),
            device("phone", "wireless", false, 0.9),
        ];
        assert!(occupied_nodes(&devices, &config()).is_empty());
    }

    #[test]
    fn sourceless_devices_cannot_mark_a_node() {
        let mut d = device("phone", "wireless", true, 0.9);
        d.source = None;
        assert!(occupied_nodes(&[d], &config()).is_empty());
    }

    #[test]
    fn multiple_devices_on_one_node_dedupe() {
        let devices = vec![
            device("phone", "wireless", true, 0.9),
            device("watch", "wireless", true, 0.8),
        ];
        assert_eq!(occupied_nodes(&devices, &config()).len(), 1);
    }
}
