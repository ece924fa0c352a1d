use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{rotate_and_publish, DEFAULT_RETENTION};
use crate::dispatch::{ConversionDispatcher, DispatchOutcome, OutputLayout, ProfileSet};
use crate::pipeline::{list_inputs, newest, DEFAULT_WINDOW};
use crate::prelude::{Converter, IngestError, IngestResult, ScanReader};
use crate::scan::{classify, maybe_merge, ScanRecord};
use crate::state::{ProcessedLedger, SweepCache};
use crate::telemetry::{LogManager, MetricsRecorder, RunSummary};

/// Everything a real-time run needs to know about its surroundings.
#[derive(Debug, Clone)]
pub struct RealtimeSettings {
    pub input_dir: PathBuf,
    /// Every new input is copied here so a later archive run reprocesses it.
    pub archive_mirror: Option<PathBuf>,
    pub catalog_dir: PathBuf,
    pub scratch_dir: PathBuf,
    pub ledger_path: PathBuf,
    pub cache_dir: PathBuf,
    pub window: usize,
    pub retention: usize,
    pub site: String,
    pub correct_azimuth: bool,
    pub profiles: ProfileSet,
}

impl RealtimeSettings {
    /// Settings rooted at `base` using the conventional directory names.
    pub fn rooted_at(base: &Path, output_root: &Path, site: &str) -> Self {
        Self {
            input_dir: base.join("input-realtime"),
            archive_mirror: Some(base.join("input-archive")),
            catalog_dir: output_root.join(site),
            scratch_dir: base.join("scratch"),
            ledger_path: base.join("processed.csv"),
            cache_dir: base.join("sweep-cache"),
            window: DEFAULT_WINDOW,
            retention: DEFAULT_RETENTION,
            site: site.to_string(),
            correct_azimuth: true,
            profiles: ProfileSet::default(),
        }
    }
}

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    AlreadyProcessed,
    Dispatched {
        outcome: DispatchOutcome,
        merged: bool,
    },
    Skipped(String),
    Failed(String),
}

/// Real-time ingest loop over the newest files of the input directory.
///
/// Each file moves through read, classify, optional sweep join and dispatch,
/// and is then written to the ledger whatever the outcome, so no file is ever
/// attempted twice.
pub struct Pipeline<R, C> {
    settings: RealtimeSettings,
    reader: R,
    dispatcher: ConversionDispatcher<C>,
    ledger: ProcessedLedger,
    cache: SweepCache,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl<R: ScanReader, C: Converter> Pipeline<R, C> {
    /// Builds the pipeline, loading the ledger and sweep cache from disk.
    pub fn new(settings: RealtimeSettings, reader: R, converter: C) -> Self {
        let dispatcher = ConversionDispatcher::new(
            converter,
            &settings.profiles,
            settings.correct_azimuth,
            OutputLayout::Realtime {
                catalog_dir: settings.catalog_dir.clone(),
                scratch_dir: settings.scratch_dir.clone(),
            },
            settings.site.clone(),
        );
        let ledger = ProcessedLedger::load(&settings.ledger_path);
        let cache = SweepCache::open(&settings.cache_dir);

        Self {
            settings,
            reader,
            dispatcher,
            ledger,
            cache,
            metrics: MetricsRecorder::new(),
            logger: LogManager::new("pipeline"),
        }
    }

    pub fn ledger(&self) -> &ProcessedLedger {
        &self.ledger
    }

    pub fn cache(&self) -> &SweepCache {
        &self.cache
    }

    /// Processes the current input window, then rotates the catalog once.
    pub fn run(&mut self) -> IngestResult<RunSummary> {
        self.metrics = MetricsRecorder::new();
        let names = list_inputs(&self.settings.input_dir)?;
        let window = newest(&names, self.settings.window);
        self.logger.record(&format!(
            "{} input files, considering newest {}",
            names.len(),
            window.len()
        ));

        for name in window {
            self.metrics.record_considered();
            let outcome = self.process(name)?;
            self.logger.debug(&format!("{} -> {:?}", name, outcome));
        }

        let report = rotate_and_publish(&self.settings.catalog_dir, self.settings.retention)?;
        self.metrics
            .record_catalog(report.retained.len(), report.removed.len());
        Ok(self.metrics.snapshot())
    }

    /// Runs one input through the pipeline and records it in the ledger.
    ///
    /// Only ledger persistence errors are returned; scan-level failures are
    /// logged and reported through the outcome.
    pub fn process(&mut self, name: &str) -> IngestResult<FileOutcome> {
        if self.ledger.is_processed(name) {
            self.metrics.record_already_processed();
            return Ok(FileOutcome::AlreadyProcessed);
        }

        let path = self.settings.input_dir.join(name);
        self.mirror(name, &path);
        let outcome = self.ingest(&path);
        self.ledger.mark_processed(name)?;
        Ok(outcome)
    }

    fn mirror(&self, name: &str, path: &Path) {
        let Some(mirror) = &self.settings.archive_mirror else {
            return;
        };
        let copied = fs::create_dir_all(mirror).and_then(|_| fs::copy(path, mirror.join(name)));
        if let Err(err) = copied {
            self.logger.warn(&format!(
                "could not copy {} to {}: {}",
                name,
                mirror.display(),
                err
            ));
        }
    }

    fn ingest(&mut self, path: &Path) -> FileOutcome {
        self.logger.record(&format!("reading {}", path.display()));
        let scan = match self.reader.read(path) {
            Ok(scan) => scan,
            Err(err) => return self.fail(err),
        };
        self.logger.record(&format!(
            "{} scanned at {}",
            scan.name,
            scan.timestamp.format("%Y-%m-%d %H:%M:%S")
        ));

        let scan_type = match classify(&scan) {
            Ok(scan_type) => scan_type,
            Err(IngestError::MissingTimingData(name)) => {
                self.logger
                    .warn(&format!("unable to determine PRF from {}, skipping", name));
                self.metrics.record_skipped();
                return FileOutcome::Skipped(name);
            }
            Err(err) => return self.fail(err),
        };

        if !scan.is_single_sweep() {
            return self.finish(self.dispatcher.dispatch(&scan, scan_type), false);
        }

        let candidate = maybe_merge(&scan, self.cache.current());
        let merged = candidate.sweep_count() > scan.sweep_count();
        let dispatch_type = if merged {
            self.logger.record(&format!(
                "joining {:.1} deg sweep {} onto cached lower sweep",
                scan.elevation_deg(),
                scan.name
            ));
            classify(&candidate).unwrap_or(scan_type)
        } else {
            scan_type
        };

        let result = self.dispatcher.dispatch(&candidate, dispatch_type);
        self.remember(&scan);
        self.finish(result, merged)
    }

    /// Caches the pre-join sweep; later joins are judged against it.
    fn remember(&mut self, scan: &ScanRecord) {
        if let Err(err) = self.cache.store(scan) {
            self.logger
                .warn(&format!("could not cache sweep {}: {}", scan.name, err));
        }
    }

    fn finish(&self, result: IngestResult<DispatchOutcome>, merged: bool) -> FileOutcome {
        match result {
            Ok(outcome) => {
                self.metrics.record_dispatched();
                if merged {
                    self.metrics.record_merged();
                }
                FileOutcome::Dispatched { outcome, merged }
            }
            Err(err) => self.fail(err),
        }
    }

    fn fail(&self, err: IngestError) -> FileOutcome {
        self.logger.error(&err.to_string());
        self.metrics.record_failed();
        FileOutcome::Failed(err.to_string())
    }
}
