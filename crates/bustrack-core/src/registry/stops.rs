//! Bus-to-stop-list registry.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tracing::info;

use super::{hold, required};
use crate::error::{Error, Result};
use crate::store::JsonStore;

const COLLECTION: &str = "stops";

/// Full snapshot shape of the stops collection. Stop order within a
/// list is route order and is preserved as given.
pub type StopMap = BTreeMap<String, Vec<String>>;

pub struct StopRegistry {
    store: Arc<JsonStore>,
    write_lock: Mutex<()>,
}

impl StopRegistry {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Replaces the entire stop list for a bus. An empty list is a
    /// valid "clear the stops" request; it is up to the caller to only
    /// pass a list that was explicitly provided.
    pub fn set(&self, bus_number: &str, stops: &[String]) -> Result<Vec<String>> {
        let bus_number = required("busNumber", bus_number)?;

        let mut cleaned = Vec::with_capacity(stops.len());
        for stop in stops {
            let stop = stop.trim();
            if stop.is_empty() {
                return Err(Error::validation("stop names must be non-empty"));
            }
            cleaned.push(stop.to_string());
        }

        let _guard = hold(&self.write_lock);
        let mut all_stops: StopMap = self.store.load(COLLECTION)?;
        all_stops.insert(bus_number.clone(), cleaned.clone());
        self.store.save(COLLECTION, &all_stops)?;

        info!(bus = %bus_number, count = cleaned.len(), "stop list replaced");
        Ok(cleaned)
    }

    pub fn get(&self, bus_number: &str) -> Result<Vec<String>> {
        let all_stops: StopMap = self.store.load(COLLECTION)?;
        Ok(all_stops.get(bus_number.trim()).cloned().unwrap_or_default())
    }

    pub fn list(&self) -> Result<StopMap> {
        self.store.load(COLLECTION)
    }

    /// Drops the entry for a bus. Invoked by the driver-removal
    /// cascade, not exposed as a standalone operation.
    pub(crate) fn clear(&self, bus_number: &str) -> Result<()> {
        let _guard = hold(&self.write_lock);
        let mut all_stops: StopMap = self.store.load(COLLECTION)?;
        all_stops.remove(bus_number);
        self.store.save(COLLECTION, &all_stops)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (tempfile::TempDir, StopRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonStore::open(dir.path()).unwrap());
        (dir, StopRegistry::new(store))
    }

    #[test]
    fn test_set_preserves_route_order() {
        let (_dir, stops) = registry();

        stops
            .set(
                "5",
                &["Zoo".to_string(), "Airport".to_string(), "Bazaar".to_string()],
            )
            .unwrap();

        assert_eq!(stops.get("5").unwrap(), vec!["Zoo", "Airport", "Bazaar"]);
    }

    #[test]
    fn test_set_overwrites_not_merges() {
        let (_dir, stops) = registry();

        stops.set("5", &["A".to_string(), "B".to_string()]).unwrap();
        stops.set("5", &["C".to_string()]).unwrap();

        assert_eq!(stops.get("5").unwrap(), vec!["C"]);
    }

    #[test]
    fn test_explicit_empty_list_clears_stops() {
        let (_dir, stops) = registry();

        stops.set("5", &["A".to_string()]).unwrap();
        stops.set("5", &[]).unwrap();

        assert!(stops.get("5").unwrap().is_empty());
    }

    #[test]
    fn test_set_trims_and_rejects_blank_stops() {
        let (_dir, stops) = registry();

        stops.set("5", &["  GateA ".to_string()]).unwrap();
        assert_eq!(stops.get("5").unwrap(), vec!["GateA"]);

        let err = stops.set("5", &["GateB".to_string(), "  ".to_string()]);
        assert!(matches!(err, Err(Error::Validation(_))));
        // Failed validation must not have touched the stored list.
        assert_eq!(stops.get("5").unwrap(), vec!["GateA"]);
    }

    #[test]
    fn test_get_unknown_bus_is_empty() {
        let (_dir, stops) = registry();
        assert!(stops.get("99").unwrap().is_empty());
    }
}
