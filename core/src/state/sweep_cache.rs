use std::fs;
use std::path::{Path, PathBuf};

use crate::prelude::{IngestError, IngestResult};
use crate::scan::record::ScanRecord;
use crate::telemetry::log::LogManager;

const DATA_FILE: &str = "last_sweep";
const METADATA_FILE: &str = "last_sweep.json";

/// Holds the most recently processed single-sweep scan between runs.
///
/// The raw sweep is copied to a fixed path inside the cache directory and its
/// metadata is kept next to it as JSON, with `sources` rewritten to point at
/// the cached copy. Storing always replaces the previous entry.
pub struct SweepCache {
    dir: PathBuf,
    current: Option<ScanRecord>,
    logger: LogManager,
}

impl SweepCache {
    /// Opens the cache in `dir`. Missing or unreadable metadata yields an empty cache.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let logger = LogManager::new("sweep_cache");
        let current = match load_metadata(&dir) {
            Ok(current) => current,
            Err(err) => {
                logger.warn(&format!("discarding sweep cache: {}", err));
                None
            }
        };
        Self {
            dir,
            current,
            logger,
        }
    }

    pub fn current(&self) -> Option<&ScanRecord> {
        self.current.as_ref()
    }

    pub fn data_path(&self) -> PathBuf {
        self.dir.join(DATA_FILE)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join(METADATA_FILE)
    }

    /// Replaces the cached sweep with `scan`, copying its first source file.
    pub fn store(&mut self, scan: &ScanRecord) -> IngestResult<()> {
        fs::create_dir_all(&self.dir).map_err(IngestError::io(&self.dir))?;

        let source = scan.sources.first().ok_or_else(|| IngestError::Unreadable {
            path: scan.name.clone(),
            message: "scan has no source file to cache".into(),
        })?;
        let data_path = self.data_path();
        let metadata_path = self.metadata_path();

        // Drop the old metadata first so a failed copy never pairs stale
        // metadata with new data.
        self.current = None;
        remove_if_present(&metadata_path)?;
        fs::copy(source, &data_path).map_err(IngestError::io(source))?;

        let mut cached = scan.clone();
        cached.sources = vec![data_path];
        let json = serde_json::to_string_pretty(&cached).map_err(|source| IngestError::Cache {
            path: metadata_path.display().to_string(),
            source,
        })?;
        fs::write(&metadata_path, json).map_err(IngestError::io(&metadata_path))?;

        self.logger.debug(&format!(
            "cached {} at {:.1} deg",
            cached.name,
            cached.elevation_deg()
        ));
        self.current = Some(cached);
        Ok(())
    }
}

fn load_metadata(dir: &Path) -> IngestResult<Option<ScanRecord>> {
    let metadata_path = dir.join(METADATA_FILE);
    if !metadata_path.exists() || !dir.join(DATA_FILE).exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(&metadata_path).map_err(IngestError::io(&metadata_path))?;
    let record = serde_json::from_str(&contents).map_err(|source| IngestError::Cache {
        path: metadata_path.display().to_string(),
        source,
    })?;
    Ok(Some(record))
}

fn remove_if_present(path: &Path) -> IngestResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(IngestError::io(path)(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::record::Sweep;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn single_sweep(source: PathBuf, elevation: f64) -> ScanRecord {
        ScanRecord {
            name: source
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned(),
            sources: vec![source],
            timestamp: NaiveDate::from_ymd_opt(2022, 4, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            sweeps: vec![Sweep {
                fixed_angle_deg: elevation,
            }],
            prt_samples: Some(vec![0.004]),
        }
    }

    #[test]
    fn empty_directory_opens_empty_cache() {
        let dir = tempdir().unwrap();
        let cache = SweepCache::open(dir.path().join("cache"));
        assert!(cache.current().is_none());
    }

    #[test]
    fn store_copies_sweep_and_survives_reopen() {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("TAM220401120000.RAW");
        fs::write(&raw, b"sweep-bytes").unwrap();

        let cache_dir = dir.path().join("cache");
        let mut cache = SweepCache::open(&cache_dir);
        cache.store(&single_sweep(raw.clone(), 0.5)).unwrap();

        let cached = cache.current().unwrap();
        assert_eq!(cached.sources, vec![cache.data_path()]);
        assert_eq!(fs::read(cache.data_path()).unwrap(), b"sweep-bytes");

        let reopened = SweepCache::open(&cache_dir);
        let cached = reopened.current().unwrap();
        assert_eq!(cached.name, "TAM220401120000.RAW");
        assert_eq!(cached.elevation_deg(), 0.5);
    }

    #[test]
    fn store_overwrites_previous_entry() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.RAW");
        let second = dir.path().join("b.RAW");
        fs::write(&first, b"first").unwrap();
        fs::write(&second, b"second").unwrap();

        let mut cache = SweepCache::open(dir.path().join("cache"));
        cache.store(&single_sweep(first, 0.5)).unwrap();
        cache.store(&single_sweep(second, 0.9)).unwrap();

        assert_eq!(cache.current().unwrap().name, "b.RAW");
        assert_eq!(fs::read(cache.data_path()).unwrap(), b"second");
    }

    #[test]
    fn corrupt_metadata_is_discarded() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DATA_FILE), b"x").unwrap();
        fs::write(dir.path().join(METADATA_FILE), b"{not json").unwrap();
        let cache = SweepCache::open(dir.path());
        assert!(cache.current().is_none());
    }
}
