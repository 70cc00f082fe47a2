//! Bus-to-driver assignment registry.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{hold, required, StatusBoard, StopRegistry};
use crate::error::{Error, Result};
use crate::store::JsonStore;

const COLLECTION: &str = "drivers";

/// Full snapshot shape of the drivers collection.
pub type AssignmentMap = BTreeMap<String, BusAssignment>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusAssignment {
    pub name: String,
    pub phone: String,
}

pub struct DriverRegistry {
    store: Arc<JsonStore>,
    write_lock: Mutex<()>,
}

impl DriverRegistry {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Creates or replaces the assignment for a bus. An existing
    /// assignment is overwritten unconditionally, never merged.
    pub fn upsert(&self, bus_number: &str, name: &str, phone: &str) -> Result<BusAssignment> {
        let bus_number = required("busNumber", bus_number)?;
        let name = required("name", name)?;
        let phone = required("phone", phone)?;
        let assignment = BusAssignment { name, phone };

        let _guard = hold(&self.write_lock);
        let mut drivers: AssignmentMap = self.store.load(COLLECTION)?;
        drivers.insert(bus_number.clone(), assignment.clone());
        self.store.save(COLLECTION, &drivers)?;

        info!(bus = %bus_number, driver = %assignment.name, "driver assignment saved");
        Ok(assignment)
    }

    /// Removes the assignment for a bus and cascades to the dependent
    /// collections: drivers first, then stops, then status.
    ///
    /// The cascade is not atomic. If the stops or status write fails
    /// after the drivers write succeeded, the error is reported to the
    /// caller but the already-applied deletions stay in place;
    /// re-running the removal completes the cleanup.
    pub fn remove(
        &self,
        bus_number: &str,
        stops: &StopRegistry,
        status: &StatusBoard,
    ) -> Result<()> {
        let bus_number = required("busNumber", bus_number)?;

        {
            let _guard = hold(&self.write_lock);
            let mut drivers: AssignmentMap = self.store.load(COLLECTION)?;
            drivers.remove(&bus_number);
            self.store.save(COLLECTION, &drivers)?;
        }

        stops.clear(&bus_number)?;
        status.clear(&bus_number)?;

        info!(bus = %bus_number, "driver assignment removed");
        Ok(())
    }

    pub fn get(&self, bus_number: &str) -> Result<Option<BusAssignment>> {
        let drivers: AssignmentMap = self.store.load(COLLECTION)?;
        Ok(drivers.get(bus_number.trim()).cloned())
    }

    pub fn list(&self) -> Result<AssignmentMap> {
        self.store.load(COLLECTION)
    }

    /// Checks a driver's claimed name against the bus's assignment.
    ///
    /// The comparison is case-insensitive: any casing variant of the
    /// assigned name is accepted. This mirrors the behavior the portals
    /// were built against; see DESIGN.md before changing it.
    pub fn verify(&self, bus_number: &str, driver_name: &str) -> Result<BusAssignment> {
        let bus_number = required("busNumber", bus_number)?;
        let driver_name = required("driverName", driver_name)?;

        self.get(&bus_number)?
            .filter(|assignment| assignment.name.to_lowercase() == driver_name.to_lowercase())
            .ok_or_else(|| Error::auth("Driver not assigned to this bus number"))
    }
}

// ============================================================================
// Tests
// ============================================================================
