use crate::external::{ProbeReader, RadxConverter};
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use log::info;
use std::path::{Path, PathBuf};
use sweepcore::pipeline::{ArchiveRun, Pipeline};
use sweepcore::telemetry::RunSummary;

/// Wires the configured external programs into the sweep core run loops.
#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    base_dir: PathBuf,
}

impl Runner {
    pub fn new(config: WorkflowConfig, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            base_dir: base_dir.into(),
        }
    }

    fn reader(&self) -> ProbeReader {
        ProbeReader::new(&self.config.probe.program, self.config.probe.args.clone())
    }

    fn converter(&self) -> RadxConverter {
        RadxConverter::new(
            &self.config.converter.binary,
            self.config.converter.aggregate_flag.clone(),
        )
    }

    pub fn realtime(&self, output_root: Option<&Path>) -> anyhow::Result<RunSummary> {
        let settings = self
            .config
            .to_realtime_settings(&self.base_dir, output_root);
        info!(
            "real-time run: {} -> {}",
            settings.input_dir.display(),
            settings.catalog_dir.display()
        );
        let input_dir = settings.input_dir.clone();
        let mut pipeline = Pipeline::new(settings, self.reader(), self.converter());
        pipeline
            .run()
            .with_context(|| format!("real-time run over {}", input_dir.display()))
    }

    pub fn archive(&self, correct_azimuth: bool) -> anyhow::Result<RunSummary> {
        let settings = self
            .config
            .to_archive_settings(&self.base_dir, correct_azimuth);
        info!(
            "archive run: {} -> {} (azimuth correction {})",
            settings.input_dir.display(),
            settings.output_root.display(),
            if correct_azimuth { "on" } else { "off" }
        );
        let input_dir = settings.input_dir.clone();
        let run = ArchiveRun::new(settings, self.reader(), self.converter());
        run.run()
            .with_context(|| format!("archive run over {}", input_dir.display()))
    }
}
