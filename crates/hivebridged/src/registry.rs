// ── File-backed accessory registry ──
//
// The daemon's stand-in for a smart-home host: accessories are cached
// in a JSON file so discovery after a restart reconciles against the
// previous run instead of starting fresh, and published values are
// surfaced as structured log events.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, info, warn};
use uuid::Uuid;

use hivebridge_core::{Accessory, AccessoryRegistry, Fault, SensorKind, SensorValue};

pub struct FileRegistry {
    /// Unset disables persistence.
    path: Option<PathBuf>,
    cached: Mutex<HashMap<Uuid, Accessory>>,
    /// Last value per sensor slot, so steady-state polling does not
    /// flood the log.
    last: Mutex<HashMap<(Uuid, SensorKind), SensorValue>>,
}

impl FileRegistry {
    /// Open the registry, restoring the accessory cache from `path`
    /// when it exists. A corrupt cache file is discarded with a
    /// warning rather than failing startup.
    pub fn open(path: Option<PathBuf>) -> Self {
        let cached = match &path {
            Some(p) if p.exists() => match Self::restore(p) {
                Ok(accessories) => {
                    info!(count = accessories.len(), path = %p.display(), "restored accessory cache");
                    accessories.into_iter().map(|a| (a.id, a)).collect()
                }
                Err(e) => {
                    warn!(error = %e, path = %p.display(), "discarding unreadable accessory cache");
                    HashMap::new()
                }
            },
            _ => HashMap::new(),
        };

        Self {
            path,
            cached: Mutex::new(cached),
            last: Mutex::new(HashMap::new()),
        }
    }

    fn restore(path: &std::path::Path) -> std::io::Result<Vec<Accessory>> {
        let bytes = std::fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(std::io::Error::other)
    }

    /// Write the cache back out. Failures are logged, not propagated:
    /// a read-only state directory degrades persistence, not bridging.
    fn persist(&self) {
        let Some(path) = &self.path else { return };

        let accessories: Vec<Accessory> = self.cached.lock().unwrap().values().cloned().collect();
        let result = serde_json::to_vec_pretty(&accessories)
            .map_err(std::io::Error::other)
            .and_then(|bytes| std::fs::write(path, bytes));

        if let Err(e) = result {
            warn!(error = %e, path = %path.display(), "failed to persist accessory cache");
        }
    }
}

impl AccessoryRegistry for FileRegistry {
    fn cached(&self) -> Vec<Accessory> {
        self.cached.lock().unwrap().values().cloned().collect()
    }

    fn register(&self, accessories: Vec<Accessory>) {
        let mut cached = self.cached.lock().unwrap();
        for accessory in accessories {
            info!(
                name = %accessory.display_name,
                serial = %accessory.serial(),
                id = %accessory.id,
                "registering accessory"
            );
            cached.insert(accessory.id, accessory);
        }
        drop(cached);
        self.persist();
    }

    fn update(&self, accessories: Vec<Accessory>) {
        let mut cached = self.cached.lock().unwrap();
        for accessory in accessories {
            debug!(name = %accessory.display_name, id = %accessory.id, "updating accessory");
            cached.insert(accessory.id, accessory);
        }
        drop(cached);
        self.persist();
    }

    fn unregister(&self, accessories: Vec<Accessory>) {
        let mut cached = self.cached.lock().unwrap();
        for accessory in &accessories {
            info!(
                name = %accessory.display_name,
                serial = %accessory.serial(),
                id = %accessory.id,
                "removing accessory"
            );
            cached.remove(&accessory.id);
        }
        drop(cached);
        self.persist();
    }

    fn publish(&self, id: Uuid, kind: SensorKind, value: SensorValue) {
        let mut last = self.last.lock().unwrap();
        let changed = last.insert((id, kind), value) != Some(value);
        drop(last);

        let name = self
            .find(id)
            .map_or_else(|| id.to_string(), |a| a.display_name);
        if changed {
            info!(accessory = %name, kind = ?kind, value = ?value, "sensor changed");
        } else {
            debug!(accessory = %name, kind = ?kind, value = ?value, "sensor unchanged");
        }
    }

    fn publish_fault(&self, id: Uuid, fault: Fault) {
        let name = self
            .find(id)
            .map_or_else(|| id.to_string(), |a| a.display_name);
        warn!(accessory = %name, fault = ?fault, "accessory fault");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hivebridge_core::{identity, AccessoryContext, AccessoryKind};

    fn accessory(serial: &str) -> Accessory {
        Accessory {
            id: identity::for_serial(serial),
            display_name: format!("node {serial}"),
            context: AccessoryContext {
                serial: serial.into(),
                kind: AccessoryKind::MeshNode,
                discovered_at: Utc::now(),
                snapshot: serde_json::Value::Null,
            },
        }
    }

    #[test]
    fn cache_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accessories.json");

        let registry = FileRegistry::open(Some(path.clone()));
        registry.register(vec![accessory("NODE-AAA"), accessory("NODE-BBB")]);

        let reopened = FileRegistry::open(Some(path));
        let mut serials: Vec<String> = reopened
            .cached()
            .iter()
            .map(|a| a.serial().to_owned())
            .collect();
        serials.sort();
        assert_eq!(serials, vec!["NODE-AAA", "NODE-BBB"]);
    }

    #[test]
    fn unregister_removes_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accessories.json");

        let registry = FileRegistry::open(Some(path.clone()));
        let stale = accessory("NODE-AAA");
        registry.register(vec![stale.clone(), accessory("NODE-BBB")]);
        registry.unregister(vec![stale]);

        let reopened = FileRegistry::open(Some(path));
        assert_eq!(reopened.cached().len(), 1);
        assert_eq!(reopened.cached()[0].serial(), "NODE-BBB");
    }

    #[test]
    fn corrupt_cache_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accessories.json");
        std::fs::write(&path, b"not json").unwrap();

        let registry = FileRegistry::open(Some(path));
        assert!(registry.cached().is_empty());
    }

    #[test]
    fn no_path_means_no_persistence() {
        let registry = FileRegistry::open(None);
        registry.register(vec![accessory("NODE-AAA")]);
        assert_eq!(registry.cached().len(), 1);
    }
}
