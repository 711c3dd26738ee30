// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::{Result, bail};
use pennywise::domain::Record;
use pennywise::storage::{RawRow, Store};
use pennywise::Ledger;
use tempfile::TempDir;

/// Path of the ledger file inside a test directory
pub fn ledger_path(dir: &TempDir) -> PathBuf {
    dir.path().join("transactions.csv")
}

/// Helper to create an empty ledger backed by a file in a temporary directory
pub fn test_ledger() -> Result<(Ledger, TempDir)> {
    let temp_dir = TempDir::new()?;
    let ledger = Ledger::open(ledger_path(&temp_dir));
    Ok((ledger, temp_dir))
}

/// Helper to build a record, panicking on invalid input
pub fn record(date: &str, category: &str, description: &str, cents: i64, kind: &str) -> Record {
    Record::create(date, category, description, cents, kind).unwrap()
}

/// Test fixture: a July 2025 month of entries, deliberately not in date order
pub fn july_entries() -> Vec<Record> {
    vec![
        record("14/07/2025", "wages", "Pay from work", 100000, "income"),
        record("01/07/2025", "food", "Lunch at cafe", 1550, "expense"),
        record("31/07/2025", "Groceries", "Weekly shop", 3456, "expense"),
        record("03/07/2025", "bills", "Phone bill", 7300, "expense"),
        record("20/07/2025", "Food", "Refund", 500, "income"),
        record("30/06/2025", "bills", "Power", 9000, "expense"),
    ]
}

/// Fill a ledger with the given records
pub fn add_all(ledger: &mut Ledger, records: Vec<Record>) -> Result<()> {
    for r in records {
        ledger.add(r)?;
    }
    Ok(())
}

/// Store whose writes always fail; loads report that nothing is stored.
pub struct FailingStore;

impl Store for FailingStore {
    fn load(&self) -> Result<Option<Vec<RawRow>>> {
        Ok(None)
    }

    fn save(&self, _records: &[Record]) -> Result<()> {
        bail!("disk full")
    }

    fn location(&self) -> String {
        "failing-store".to_string()
    }
}
