use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use sweepcore::dispatch::ProfileSet;
use sweepcore::pipeline::{ArchiveSettings, RealtimeSettings};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeConfig {
    pub input_dir: PathBuf,
    pub archive_mirror: Option<PathBuf>,
    pub output_root: PathBuf,
    pub scratch_dir: PathBuf,
    pub ledger_path: PathBuf,
    pub cache_dir: PathBuf,
    pub window: usize,
    pub retention: usize,
    pub correct_azimuth: bool,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input-realtime"),
            archive_mirror: Some(PathBuf::from("input-archive")),
            output_root: PathBuf::from("output-realtime"),
            scratch_dir: PathBuf::from("scratch"),
            ledger_path: PathBuf::from("processed.csv"),
            cache_dir: PathBuf::from("sweep-cache"),
            window: sweepcore::pipeline::DEFAULT_WINDOW,
            retention: sweepcore::catalog::DEFAULT_RETENTION,
            correct_azimuth: true,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input-archive"),
            output_dir: PathBuf::from("output-archive"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub binary: PathBuf,
    /// Passed when several sweep files are joined into one volume.
    pub aggregate_flag: Option<String>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("/usr/local/lrose/bin/RadxConvert"),
            aggregate_flag: Some("-ag_all".to_string()),
        }
    }
}

/// Command that prints a scan header as JSON for the file given last.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("sweep-probe"),
            args: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub site: String,
    pub realtime: RealtimeConfig,
    pub archive: ArchiveConfig,
    pub converter: ConverterConfig,
    pub probe: ProbeConfig,
    pub profiles: ProfileSet,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            site: "TAMU".to_string(),
            realtime: RealtimeConfig::default(),
            archive: ArchiveConfig::default(),
            converter: ConverterConfig::default(),
            probe: ProbeConfig::default(),
            profiles: ProfileSet::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Real-time settings with relative paths anchored at `base`.
    ///
    /// `output_root` overrides the configured root; the catalog is the
    /// `<site>` directory beneath it.
    pub fn to_realtime_settings(
        &self,
        base: &Path,
        output_root: Option<&Path>,
    ) -> RealtimeSettings {
        let rt = &self.realtime;
        let output_root = output_root
            .map(Path::to_path_buf)
            .unwrap_or_else(|| base.join(&rt.output_root));
        RealtimeSettings {
            input_dir: base.join(&rt.input_dir),
            archive_mirror: rt.archive_mirror.as_ref().map(|dir| base.join(dir)),
            catalog_dir: output_root.join(&self.site),
            scratch_dir: base.join(&rt.scratch_dir),
            ledger_path: base.join(&rt.ledger_path),
            cache_dir: base.join(&rt.cache_dir),
            window: rt.window,
            retention: rt.retention,
            site: self.site.clone(),
            correct_azimuth: rt.correct_azimuth,
            profiles: self.profiles.resolve(base),
        }
    }

    pub fn to_archive_settings(&self, base: &Path, correct_azimuth: bool) -> ArchiveSettings {
        ArchiveSettings {
            input_dir: base.join(&self.archive.input_dir),
            output_root: base.join(&self.archive.output_dir),
            site: self.site.clone(),
            correct_azimuth,
            profiles: self.profiles.resolve(base),
        }
    }
}
