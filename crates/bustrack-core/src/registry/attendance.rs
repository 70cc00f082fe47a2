//! Daily attendance ledger.
//!
//! Two-level mapping: calendar date (`YYYY-MM-DD`) to bus number to
//! the students recorded present on that bus. Entries are append-only;
//! nothing here ever removes one.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use tracing::info;

use super::{hold, required};
use crate::error::Result;
use crate::store::JsonStore;

const COLLECTION: &str = "attendance";

/// Canonical date key format.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Students per bus for a single day, in the order they were marked.
pub type DayRoster = BTreeMap<String, Vec<String>>;

/// Full snapshot shape of the attendance collection.
pub type Ledger = BTreeMap<String, DayRoster>;

/// Result of a mark-present call. A repeat mark is not a failure; the
/// flag lets callers word their feedback accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkOutcome {
    pub already_marked: bool,
}

pub struct AttendanceLedger {
    store: Arc<JsonStore>,
    write_lock: Mutex<()>,
}

impl AttendanceLedger {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Records a student as present on a bus for the given date.
    ///
    /// Idempotent: marking the same (date, bus, student) again leaves
    /// the ledger unchanged and reports `already_marked: true`.
    ///
    /// Names are compared byte-for-byte; two spellings differing only
    /// in casing count as different students (see DESIGN.md).
    pub fn mark_present(
        &self,
        date: NaiveDate,
        bus_number: &str,
        student_name: &str,
    ) -> Result<MarkOutcome> {
        let bus_number = required("busNumber", bus_number)?;
        let student_name = required("studentName", student_name)?;
        let date_key = date.format(DATE_FORMAT).to_string();

        let _guard = hold(&self.write_lock);
        let mut ledger: Ledger = self.store.load(COLLECTION)?;
        let roster = ledger
            .entry(date_key.clone())
            .or_default()
            .entry(bus_number.clone())
            .or_default();

        if roster.iter().any(|name| name == &student_name) {
            return Ok(MarkOutcome {
                already_marked: true,
            });
        }

        roster.push(student_name.clone());
        self.store.save(COLLECTION, &ledger)?;

        info!(date = %date_key, bus = %bus_number, student = %student_name, "attendance marked");
        Ok(MarkOutcome {
            already_marked: false,
        })
    }

    /// Marks a student present for today, keyed by the current UTC date.
    pub fn mark_present_today(&self, bus_number: &str, student_name: &str) -> Result<MarkOutcome> {
        self.mark_present(Utc::now().date_naive(), bus_number, student_name)
    }

    /// Returns the per-bus rosters for one date; empty when no student
    /// was marked that day.
    pub fn for_date(&self, date: NaiveDate) -> Result<DayRoster> {
        let ledger: Ledger = self.store.load(COLLECTION)?;
        let date_key = date.format(DATE_FORMAT).to_string();
        Ok(ledger.get(&date_key).cloned().unwrap_or_default())
    }

    pub fn all(&self) -> Result<Ledger> {
        self.store.load(COLLECTION)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn ledger() -> (tempfile::TempDir, AttendanceLedger) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonStore::open(dir.path()).unwrap());
        (dir, AttendanceLedger::new(store))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_mark_present_is_idempotent() {
        let (_dir, ledger) = ledger();
        let day = date(2024, 5, 1);

        let first = ledger.mark_present(day, "12", "Alice").unwrap();
        assert!(!first.already_marked);

        let second = ledger.mark_present(day, "12", "Alice").unwrap();
        assert!(second.already_marked);

        let roster = ledger.for_date(day).unwrap();
        assert_eq!(roster.get("12").unwrap(), &vec!["Alice".to_string()]);
    }

    #[test]
    fn test_roster_preserves_insertion_order() {
        let (_dir, ledger) = ledger();
        let day = date(2024, 5, 1);

        ledger.mark_present(day, "12", "Alice").unwrap();
        ledger.mark_present(day, "12", "Bob").unwrap();
        let repeat = ledger.mark_present(day, "12", "Alice").unwrap();
        assert!(repeat.already_marked);

        let roster = ledger.for_date(day).unwrap();
        assert_eq!(
            roster.get("12").unwrap(),
            &vec!["Alice".to_string(), "Bob".to_string()]
        );
    }

    #[test]
    fn test_dates_and_buses_partition_the_ledger() {
        let (_dir, ledger) = ledger();

        ledger.mark_present(date(2024, 5, 1), "12", "Alice").unwrap();
        ledger.mark_present(date(2024, 5, 1), "7", "Alice").unwrap();
        ledger.mark_present(date(2024, 5, 2), "12", "Alice").unwrap();

        let all = ledger.all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all.get("2024-05-01").unwrap().len(), 2);
        assert_eq!(
            all.get("2024-05-02").unwrap().get("12").unwrap(),
            &vec!["Alice".to_string()]
        );
    }

    #[test]
    fn test_names_match_exactly() {
        let (_dir, ledger) = ledger();
        let day = date(2024, 5, 1);

        ledger.mark_present(day, "12", "Alice").unwrap();
        // Casing variants are distinct identities, deliberately.
        let outcome = ledger.mark_present(day, "12", "alice").unwrap();
        assert!(!outcome.already_marked);

        assert_eq!(ledger.for_date(day).unwrap().get("12").unwrap().len(), 2);
    }

    #[test]
    fn test_blank_fields_rejected_before_any_write() {
        let (_dir, ledger) = ledger();
        let day = date(2024, 5, 1);

        assert!(matches!(
            ledger.mark_present(day, "", "Alice"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            ledger.mark_present(day, "12", "   "),
            Err(Error::Validation(_))
        ));
        assert!(ledger.all().unwrap().is_empty());
    }

    #[test]
    fn test_for_date_unknown_is_empty() {
        let (_dir, ledger) = ledger();
        assert!(ledger.for_date(date(1999, 1, 1)).unwrap().is_empty());
    }

    #[test]
    fn test_today_helper_uses_canonical_key() {
        let (_dir, ledger) = ledger();

        ledger.mark_present_today("12", "Alice").unwrap();

        let expected_key = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        let all = ledger.all().unwrap();
        assert!(all.contains_key(&expected_key));
    }
}
