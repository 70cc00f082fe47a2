//! Bus activity status board.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{hold, required};
use crate::error::{Error, Result};
use crate::store::JsonStore;

const COLLECTION: &str = "status";

/// Full snapshot shape of the status collection. A bus with no entry
/// reads as `Inactive`.
pub type StatusMap = BTreeMap<String, BusStatus>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusStatus {
    Active,
    #[default]
    Inactive,
}

impl BusStatus {
    /// Parses the wire form. Only the exact strings `"active"` and
    /// `"inactive"` are accepted; anything else is rejected rather
    /// than coerced.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "active" => Ok(BusStatus::Active),
            "inactive" => Ok(BusStatus::Inactive),
            other => Err(Error::validation(format!(
                "invalid status '{other}': expected 'active' or 'inactive'"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BusStatus::Active => "active",
            BusStatus::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for BusStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct StatusBoard {
    store: Arc<JsonStore>,
    write_lock: Mutex<()>,
}

impl StatusBoard {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Records the status for a bus, overwriting any previous value.
    pub fn set(&self, bus_number: &str, status: BusStatus) -> Result<()> {
        let bus_number = required("busNumber", bus_number)?;

        let _guard = hold(&self.write_lock);
        let mut board: StatusMap = self.store.load(COLLECTION)?;
        board.insert(bus_number.clone(), status);
        self.store.save(COLLECTION, &board)?;

        info!(bus = %bus_number, %status, "bus status updated");
        Ok(())
    }

    /// Returns the status for a bus, defaulting to `Inactive` when the
    /// bus has never reported one.
    pub fn get(&self, bus_number: &str) -> Result<BusStatus> {
        let board: StatusMap = self.store.load(COLLECTION)?;
        Ok(board.get(bus_number.trim()).copied().unwrap_or_default())
    }

    pub fn all(&self) -> Result<StatusMap> {
        self.store.load(COLLECTION)
    }

    /// Drops the entry for a bus, returning it to the implicit
    /// `Inactive` default. Invoked by the driver-removal cascade.
    pub(crate) fn clear(&self, bus_number: &str) -> Result<()> {
        let _guard = hold(&self.write_lock);
        let mut board: StatusMap = self.store.load(COLLECTION)?;
        board.remove(bus_number);
        self.store.save(COLLECTION, &board)
    }
}

// ============================================================================
// Tests
// ============================================================================
