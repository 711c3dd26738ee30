mod csv_store;

pub use csv_store::*;

use anyhow::Result;

use crate::domain::{Record, RecordRow};

/// One row read back from a store.
///
/// Rows that could not even be split into fields carry the parse error in
/// `data`; the ledger decides what to do with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line in the underlying file (the header is line 1)
    pub line: u64,
    pub data: Result<RecordRow, String>,
}

/// Backing storage for a ledger. Every save replaces the whole collection.
pub trait Store {
    /// Read every stored row. `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<RawRow>>>;

    /// Replace the stored collection with `records`.
    fn save(&self, records: &[Record]) -> Result<()>;

    /// Human-readable location, for messages.
    fn location(&self) -> String;
}
