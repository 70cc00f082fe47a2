//! Core persistence and synchronization layer for bustrack.
//!
//! Everything the three portals (student, driver, administrator) agree
//! on lives in four durable collections keyed by bus number:
//!
//! - `DriverRegistry`: which driver runs which bus
//! - `StopRegistry`: the ordered stops a bus serves
//! - `StatusBoard`: whether a bus is currently active
//! - `AttendanceLedger`: which students were recorded present, per day
//!
//! Collections are full-snapshot JSON documents managed by `JsonStore`.
//! Mutations follow a read-modify-write discipline serialized per
//! collection; removing a driver assignment cascades to the stop list
//! and status entry for the same bus (see `DriverRegistry::remove`).

pub mod error;
pub mod registry;
pub mod store;

pub use error::{Error, Result};
pub use registry::{
    AttendanceLedger, BusAssignment, BusStatus, DriverRegistry, MarkOutcome, StatusBoard,
    StopRegistry,
};
pub use store::JsonStore;
