use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::{Record, RecordRow};

use super::{RawRow, Store};

/// Column header written as the first line of every ledger file.
pub const CSV_HEADER: [&str; 5] = [
    "date",
    "category",
    "description",
    "amount",
    "transaction_type",
];

/// Flat CSV file holding one row per record.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file that a save is written to before it replaces the ledger.
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_file(&self, target: &Path, records: &[Record]) -> Result<()> {
        let file = File::create(target)
            .with_context(|| format!("Failed to create {}", target.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&file);
        writer
            .write_record(CSV_HEADER)
            .context("Failed to write header")?;
        for record in records {
            writer
                .serialize(record.to_row())
                .context("Failed to write record")?;
        }
        writer.flush().context("Failed to flush ledger file")?;
        drop(writer);

        file.sync_all()
            .with_context(|| format!("Failed to sync {}", target.display()))?;
        Ok(())
    }
}

impl Store for CsvStore {
    fn load(&self) -> Result<Option<Vec<RawRow>>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to open {}", self.path.display()));
            }
        };

        let mut reader = csv::Reader::from_reader(file);
        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read header of {}", self.path.display()))?
            .clone();

        let mut rows = Vec::new();
        let mut record = csv::StringRecord::new();
        loop {
            match reader.read_record(&mut record) {
                Ok(false) => break,
                Ok(true) => {
                    let line = record.position().map_or(0, |p| p.line());
                    let data = record
                        .deserialize::<RecordRow>(Some(&headers))
                        .map_err(|e| e.to_string());
                    rows.push(RawRow { line, data });
                }
                Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => {
                    return Err(err)
                        .with_context(|| format!("Failed to read {}", self.path.display()));
                }
                Err(err) => {
                    let line = err.position().map_or(0, |p| p.line());
                    rows.push(RawRow {
                        line,
                        data: Err(err.to_string()),
                    });
                }
            }
        }

        Ok(Some(rows))
    }

    fn save(&self, records: &[Record]) -> Result<()> {
        let temp = self.temp_path();

        if let Err(err) = self.write_file(&temp, records) {
            let _ = fs::remove_file(&temp);
            return Err(err);
        }

        if let Err(err) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(err).with_context(|| {
                format!(
                    "Failed to replace {} with {}",
                    self.path.display(),
                    temp.display()
                )
            });
        }

        tracing::debug!(path = %self.path.display(), records = records.len(), "ledger saved");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
