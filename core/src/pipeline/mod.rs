//! Run loops that drive scans through classification, merging and dispatch.

pub mod archive;
pub mod realtime;

use std::fs;
use std::path::Path;

use crate::prelude::{IngestError, IngestResult};

pub use archive::{ArchiveRun, ArchiveSettings};
pub use realtime::{FileOutcome, Pipeline, RealtimeSettings};

/// Default number of newest input files looked at per real-time run.
pub const DEFAULT_WINDOW: usize = 10;

/// Sorted names of the regular files in `dir`.
pub fn list_inputs(dir: &Path) -> IngestResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(IngestError::io(dir))? {
        let entry = entry.map_err(IngestError::io(dir))?;
        let is_file = entry
            .file_type()
            .map_err(IngestError::io(&entry.path()))?
            .is_file();
        if is_file {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// The last `size` names of an already sorted listing.
pub fn newest(names: &[String], size: usize) -> &[String] {
    &names[names.len().saturating_sub(size)..]
}
