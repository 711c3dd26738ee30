use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::domain::{Record, TransactionType, parse_date};
use crate::storage::{CsvStore, Store};

use super::reporting::{CategorySummary, Summary, category_summaries};
use super::AppError;

/// How hydration from the store went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Existing data was read (possibly with some rows skipped)
    Loaded,
    /// No store existed yet; the ledger starts empty
    Missing,
    /// The store could not be read; the ledger starts empty
    Failed(String),
}

/// A stored row that was dropped during hydration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

/// Diagnostics collected while opening a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub status: LoadStatus,
    pub loaded: usize,
    pub skipped: Vec<SkippedRow>,
}

/// Filter for listing records. Unset fields match everything; dates are
/// inclusive `DD/MM/YYYY` bounds.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub category: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub transaction_type: Option<String>,
}

/// The in-memory collection of records, mirrored to a store.
///
/// Records keep insertion order. Every successful `add` rewrites the whole
/// store; if that write fails the new record is dropped again so memory and
/// storage never disagree.
pub struct Ledger<S: Store = CsvStore> {
    store: S,
    records: Vec<Record>,
    load_report: LoadReport,
}

impl Ledger<CsvStore> {
    /// Open the CSV ledger at `path`. Never fails: see [`Ledger::load_report`].
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::with_store(CsvStore::new(path.as_ref()))
    }
}

impl<S: Store> Ledger<S> {
    /// Hydrate a ledger from any store, skipping rows that do not validate.
    pub fn with_store(store: S) -> Self {
        let mut records = Vec::new();
        let mut skipped = Vec::new();

        let status = match store.load() {
            Ok(None) => {
                tracing::info!(store = %store.location(), "no existing data, starting empty");
                LoadStatus::Missing
            }
            Ok(Some(rows)) => {
                for raw in rows {
                    let parsed = raw
                        .data
                        .and_then(|row| Record::try_from(row).map_err(|e| e.to_string()));
                    match parsed {
                        Ok(record) => records.push(record),
                        Err(reason) => {
                            tracing::warn!(line = raw.line, %reason, "skipping invalid row");
                            skipped.push(SkippedRow {
                                line: raw.line,
                                reason,
                            });
                        }
                    }
                }
                tracing::info!(
                    store = %store.location(),
                    loaded = records.len(),
                    skipped = skipped.len(),
                    "ledger loaded"
                );
                LoadStatus::Loaded
            }
            Err(err) => {
                tracing::error!(store = %store.location(), "failed to load ledger: {err:#}");
                LoadStatus::Failed(format!("{err:#}"))
            }
        };

        let load_report = LoadReport {
            status,
            loaded: records.len(),
            skipped,
        };

        Self {
            store,
            records,
            load_report,
        }
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record and rewrite the store.
    ///
    /// On a failed write the record is removed again and the error returned.
    pub fn add(&mut self, record: Record) -> Result<(), AppError> {
        self.records.push(record);
        if let Err(err) = self.store.save(&self.records) {
            self.records.pop();
            return Err(AppError::Persistence(err));
        }
        Ok(())
    }

    /// Rewrite the store from memory.
    pub fn save(&self) -> Result<(), AppError> {
        self.store.save(&self.records)?;
        Ok(())
    }

    /// Owned snapshot of every record, in insertion order.
    pub fn all(&self) -> Vec<Record> {
        self.records.clone()
    }

    /// Records whose category matches `name`, ignoring case.
    pub fn by_category(&self, name: &str) -> Vec<Record> {
        let wanted = name.trim().to_lowercase();
        self.filter(|r| r.category().to_lowercase() == wanted)
    }

    /// Records dated between `start` and `end` inclusive (`DD/MM/YYYY`).
    pub fn by_date_range(&self, start: &str, end: &str) -> Result<Vec<Record>, AppError> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        Ok(self.filter(|r| (start..=end).contains(&r.date())))
    }

    /// Records of the given type, ignoring case. Unknown types match nothing.
    pub fn by_type(&self, type_text: &str) -> Vec<Record> {
        match type_text.parse::<TransactionType>() {
            Ok(wanted) => self.filter(|r| r.transaction_type() == wanted),
            Err(_) => Vec::new(),
        }
    }

    /// Records matching every set field of `filter`.
    ///
    /// Unlike [`Ledger::by_type`], an unknown type here is an error.
    pub fn list_filtered(&self, filter: &RecordFilter) -> Result<Vec<Record>, AppError> {
        let from = filter.from_date.as_deref().map(parse_date).transpose()?;
        let to = filter.to_date.as_deref().map(parse_date).transpose()?;
        let kind = filter
            .transaction_type
            .as_deref()
            .map(str::parse::<TransactionType>)
            .transpose()?;
        let category = filter.category.as_deref().map(|c| c.trim().to_lowercase());

        Ok(self.filter(|r| {
            category
                .as_ref()
                .is_none_or(|c| r.category().to_lowercase() == *c)
                && from.is_none_or(|d| r.date() >= d)
                && to.is_none_or(|d| r.date() <= d)
                && kind.is_none_or(|k| r.transaction_type() == k)
        }))
    }

    /// Distinct normalized categories.
    pub fn categories(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .map(|r| r.category().to_string())
            .collect()
    }

    pub fn summary(&self) -> Summary {
        Summary::from_records(&self.records)
    }

    pub fn category_summary(&self) -> BTreeMap<String, CategorySummary> {
        category_summaries(&self.records)
    }

    fn filter(&self, predicate: impl Fn(&Record) -> bool) -> Vec<Record> {
        self.records
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }
}
