use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::prelude::{IngestError, IngestResult};
use crate::telemetry::log::LogManager;

#[derive(Debug, Serialize, Deserialize)]
struct LedgerRow {
    files: String,
}

/// Append-only record of input files that have already been handled.
///
/// Persisted as a single-column CSV with a `files` header. Every mark rewrites
/// the whole file through a sibling temp file so the stored ledger always
/// matches what has been dispatched.
pub struct ProcessedLedger {
    path: PathBuf,
    files: Vec<String>,
    index: HashSet<String>,
    logger: LogManager,
}

impl ProcessedLedger {
    /// Loads the ledger, treating a missing or unreadable file as empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let logger = LogManager::new("ledger");
        let files = if path.exists() {
            match read_rows(&path) {
                Ok(files) => files,
                Err(err) => {
                    logger.warn(&format!("ignoring unreadable ledger: {}", err));
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let mut ledger = Self {
            path,
            files: Vec::with_capacity(files.len()),
            index: HashSet::with_capacity(files.len()),
            logger,
        };
        for name in files {
            ledger.insert(name);
        }
        ledger
    }

    pub fn is_processed(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    /// Records `name` and persists the full ledger. Already-known names are a no-op.
    pub fn mark_processed(&mut self, name: &str) -> IngestResult<()> {
        if !self.insert(name.to_string()) {
            return Ok(());
        }
        self.persist()?;
        self.logger
            .debug(&format!("ledgered {} ({} total)", name, self.files.len()));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Names in the order they were processed.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    fn insert(&mut self, name: String) -> bool {
        if self.index.insert(name.clone()) {
            self.files.push(name);
            true
        } else {
            false
        }
    }

    fn persist(&self) -> IngestResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(IngestError::io(parent))?;
        }

        let mut tmp_name = self.path.clone().into_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let ledger_err = |source| IngestError::Ledger {
            path: tmp_path.display().to_string(),
            source,
        };
        let mut writer = csv::Writer::from_path(&tmp_path).map_err(ledger_err)?;
        for files in &self.files {
            writer
                .serialize(LedgerRow {
                    files: files.clone(),
                })
                .map_err(ledger_err)?;
        }
        if self.files.is_empty() {
            writer.write_record(["files"]).map_err(ledger_err)?;
        }
        writer
            .flush()
            .map_err(IngestError::io(&tmp_path))?;
        drop(writer);

        fs::rename(&tmp_path, &self.path).map_err(IngestError::io(&self.path))
    }
}

fn read_rows(path: &Path) -> Result<Vec<String>, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut files = Vec::new();
    for row in reader.deserialize::<LedgerRow>() {
        files.push(row?.files);
    }
    Ok(files)
}
