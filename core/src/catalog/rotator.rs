use std::fs;
use std::path::Path;

use crate::catalog::manifest::{self, MANIFEST_NAME};
use crate::prelude::{IngestError, IngestResult};
use crate::telemetry::log::LogManager;

/// Default number of products kept in the real-time catalog.
pub const DEFAULT_RETENTION: usize = 10;

/// What a rotation pass removed and what it left listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogReport {
    pub removed: Vec<String>,
    pub retained: Vec<String>,
}

/// Sorted catalog entry names, excluding the manifest.
pub fn list_entries(catalog_dir: &Path) -> IngestResult<Vec<String>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(catalog_dir).map_err(IngestError::io(catalog_dir))? {
        let entry = entry.map_err(IngestError::io(catalog_dir))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name != MANIFEST_NAME {
            entries.push(name);
        }
    }
    entries.sort();
    Ok(entries)
}

/// Trims the catalog to `retention_limit` entries and rewrites the manifest.
///
/// Product names embed a zero-padded date and time, so the lexicographically
/// smallest entry is always the oldest one.
pub fn rotate_and_publish(
    catalog_dir: &Path,
    retention_limit: usize,
) -> IngestResult<CatalogReport> {
    let logger = LogManager::new("catalog");
    fs::create_dir_all(catalog_dir).map_err(IngestError::io(catalog_dir))?;

    let mut retained = list_entries(catalog_dir)?;
    let excess = retained.len().saturating_sub(retention_limit);
    let removed: Vec<String> = retained.drain(..excess).collect();

    for name in &removed {
        let path = catalog_dir.join(name);
        let result = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.map_err(IngestError::io(&path))?;
        logger.debug(&format!("rotated out {}", name));
    }

    manifest::publish(catalog_dir, &retained)?;
    logger.record(&format!(
        "catalog {} holds {} products ({} removed)",
        catalog_dir.display(),
        retained.len(),
        removed.len()
    ));

    Ok(CatalogReport { removed, retained })
}
