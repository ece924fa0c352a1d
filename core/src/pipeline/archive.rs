use std::fs;
use std::path::{Path, PathBuf};

use crate::dispatch::{ConversionDispatcher, OutputLayout, ProfileSet};
use crate::pipeline::list_inputs;
use crate::prelude::{Converter, IngestError, IngestResult, ScanReader};
use crate::scan::classify;
use crate::telemetry::{LogManager, MetricsRecorder, RunSummary};

#[derive(Debug, Clone)]
pub struct ArchiveSettings {
    pub input_dir: PathBuf,
    pub output_root: PathBuf,
    pub site: String,
    pub correct_azimuth: bool,
    pub profiles: ProfileSet,
}

/// Batch conversion of an archive directory into the dated UF/L2 tree.
///
/// Inputs are consumed: each file is deleted once handled, including files
/// that could not be classified or converted.
pub struct ArchiveRun<R, C> {
    input_dir: PathBuf,
    reader: R,
    dispatcher: ConversionDispatcher<C>,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl<R: ScanReader, C: Converter> ArchiveRun<R, C> {
    pub fn new(settings: ArchiveSettings, reader: R, converter: C) -> Self {
        let dispatcher = ConversionDispatcher::new(
            converter,
            &settings.profiles,
            settings.correct_azimuth,
            OutputLayout::Archive {
                root: settings.output_root,
            },
            settings.site,
        );
        Self {
            input_dir: settings.input_dir,
            reader,
            dispatcher,
            metrics: MetricsRecorder::new(),
            logger: LogManager::new("archive"),
        }
    }

    pub fn run(&self) -> IngestResult<RunSummary> {
        if !self.input_dir.exists() {
            fs::create_dir_all(&self.input_dir).map_err(IngestError::io(&self.input_dir))?;
            self.logger.warn(&format!(
                "created {}; place files to be converted there",
                self.input_dir.display()
            ));
            return Ok(self.metrics.snapshot());
        }

        for name in list_inputs(&self.input_dir)? {
            self.metrics.record_considered();
            let path = self.input_dir.join(&name);
            self.convert(&path);
            if let Err(err) = fs::remove_file(&path) {
                self.logger
                    .warn(&format!("could not remove {}: {}", path.display(), err));
            }
        }
        Ok(self.metrics.snapshot())
    }

    fn convert(&self, path: &Path) {
        self.logger.record(&format!("reading {}", path.display()));
        let result = self.reader.read(path).and_then(|scan| {
            let scan_type = classify(&scan)?;
            self.dispatcher.dispatch(&scan, scan_type)
        });

        match result {
            Ok(outcome) => {
                self.logger.record(&format!(
                    "wrote {} {} products",
                    outcome.product_name, outcome.scan_type
                ));
                self.metrics.record_dispatched();
            }
            Err(IngestError::MissingTimingData(name)) => {
                self.logger
                    .warn(&format!("unable to determine PRF from {}, skipping", name));
                self.metrics.record_skipped();
            }
            Err(err) => {
                self.logger.error(&err.to_string());
                self.metrics.record_failed();
            }
        }
    }
}
