//! Domain collections built on `JsonStore`.
//!
//! Each registry owns one named collection and serializes its
//! mutations behind a per-collection lock, so two concurrent
//! read-modify-write cycles on the same collection cannot silently
//! drop one writer's update. Reads take no registry lock; the store
//! serializes the actual file writes (including the first-touch
//! bootstrap a read can trigger) and commits snapshots atomically, so
//! readers never see a torn document.
//!
//! The only multi-collection operation is the cascade in
//! `DriverRegistry::remove`, which is deliberately not atomic across
//! collections.

pub mod attendance;
pub mod drivers;
pub mod status;
pub mod stops;

pub use attendance::{AttendanceLedger, MarkOutcome};
pub use drivers::{BusAssignment, DriverRegistry};
pub use status::{BusStatus, StatusBoard};
pub use stops::StopRegistry;

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{Error, Result};

/// Trims a caller-supplied field and rejects it when empty.
fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("missing required field: {field}")));
    }
    Ok(trimmed.to_string())
}

/// Acquires a collection write lock, ignoring poisoning: a panicked
/// writer never leaves a half-applied snapshot behind (saves are
/// all-or-nothing), so the data is safe to touch again.
fn hold(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims_value() {
        assert_eq!(required("name", "  Ravi  ").unwrap(), "Ravi");
    }

    #[test]
    fn test_required_rejects_blank() {
        let err = required("busNumber", "   ").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("busNumber"));
    }
}
