use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::dispatch::paths::{product_name, OutputFormat, OutputLayout};
use crate::dispatch::profiles::{ParamProfiles, ProfileSet};
use crate::prelude::{Converter, IngestError, IngestResult};
use crate::scan::{ScanRecord, ScanType};
use crate::telemetry::log::LogManager;

/// Products written for one dispatched scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub scan_type: ScanType,
    pub product_name: String,
    /// Files left on disk after the run.
    pub retained: Vec<PathBuf>,
}

/// Chooses parameters and output paths for a scan and runs the converter.
///
/// Every scan goes through two conversions: its raw source files to UF, then
/// that UF file to L2.
pub struct ConversionDispatcher<C> {
    converter: C,
    profiles: ParamProfiles,
    layout: OutputLayout,
    site: String,
    logger: LogManager,
}

impl<C: Converter> ConversionDispatcher<C> {
    pub fn new(
        converter: C,
        profiles: &ProfileSet,
        correct_azimuth: bool,
        layout: OutputLayout,
        site: impl Into<String>,
    ) -> Self {
        Self {
            converter,
            profiles: profiles.select(correct_azimuth).clone(),
            layout,
            site: site.into(),
            logger: LogManager::new("dispatch"),
        }
    }

    pub fn output_path(
        &self,
        format: OutputFormat,
        scan: &ScanRecord,
        scan_type: ScanType,
    ) -> PathBuf {
        self.layout
            .output_path(format, scan_type, &self.site, &scan.timestamp)
    }

    pub fn dispatch(
        &self,
        scan: &ScanRecord,
        scan_type: ScanType,
    ) -> IngestResult<DispatchOutcome> {
        let uf_path = self.output_path(OutputFormat::Uf, scan, scan_type);
        let l2_path = self.output_path(OutputFormat::L2, scan, scan_type);

        self.logger.record(&format!(
            "converting {} ({}, {} sweeps) to UF",
            scan.name,
            scan_type,
            scan.sweep_count()
        ));
        ensure_parent(&uf_path)?;
        self.converter
            .convert(&scan.sources, &self.profiles.uf, &uf_path)?;

        self.logger.record(&format!("converting {} to L2", scan.name));
        ensure_parent(&l2_path)?;
        let l2_result = self
            .converter
            .convert(&[uf_path.clone()], &self.profiles.l2, &l2_path);

        let mut retained = Vec::new();
        if self.layout.retains(OutputFormat::Uf) {
            retained.push(uf_path);
        } else {
            self.discard(&uf_path);
        }
        l2_result?;
        retained.push(l2_path);

        Ok(DispatchOutcome {
            scan_type,
            product_name: product_name(&self.site, &scan.timestamp),
            retained,
        })
    }

    fn discard(&self, path: &Path) {
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => self
                .logger
                .warn(&format!("could not remove {}: {}", path.display(), err)),
        }
    }
}

fn ensure_parent(path: &Path) -> IngestResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(IngestError::io(parent))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::ConversionError;
    use crate::scan::record::Sweep;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingConverter {
        calls: RefCell<Vec<(Vec<PathBuf>, PathBuf, PathBuf)>>,
        fail_params: Option<PathBuf>,
    }

    impl Converter for RecordingConverter {
        fn convert(
            &self,
            inputs: &[PathBuf],
            params: &Path,
            output: &Path,
        ) -> Result<(), ConversionError> {
            self.calls
                .borrow_mut()
                .push((inputs.to_vec(), params.to_path_buf(), output.to_path_buf()));
            if self.fail_params.as_deref() == Some(params) {
                return Err(ConversionError::ExitStatus {
                    status: "exit status: 1".into(),
                    output: output.display().to_string(),
                });
            }
            fs::write(output, b"product").unwrap();
            Ok(())
        }
    }

    fn scan(sources: Vec<PathBuf>) -> ScanRecord {
        ScanRecord {
            name: "TAM220718090542.RAW".into(),
            sources,
            timestamp: NaiveDate::from_ymd_opt(2022, 7, 18)
                .unwrap()
                .and_hms_opt(9, 5, 42)
                .unwrap(),
            sweeps: vec![Sweep {
                fixed_angle_deg: 0.5,
            }],
            prt_samples: Some(vec![0.001]),
        }
    }

    #[test]
    fn archive_dispatch_keeps_both_formats() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("output-archive");
        let dispatcher = ConversionDispatcher::new(
            RecordingConverter::default(),
            &ProfileSet::default(),
            false,
            OutputLayout::Archive { root: root.clone() },
            "TAMU",
        );

        let raw = PathBuf::from("input-archive/TAM220718090542.RAW");
        let outcome = dispatcher
            .dispatch(&scan(vec![raw.clone()]), ScanType::Volume)
            .unwrap();

        let uf = root.join("UF/20220718/vol/TAMU_20220718_0905");
        let l2 = root.join("L2/20220718/vol/TAMU_20220718_0905");
        assert_eq!(outcome.retained, vec![uf.clone(), l2.clone()]);
        assert_eq!(outcome.product_name, "TAMU_20220718_0905");
        assert!(uf.exists() && l2.exists());

        let calls = dispatcher.converter.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0],
            (vec![raw], PathBuf::from("uf_params.txt"), uf.clone())
        );
        assert_eq!(calls[1], (vec![uf], PathBuf::from("l2_params.txt"), l2));
    }

    #[test]
    fn realtime_dispatch_discards_uf_intermediate() {
        let dir = tempdir().unwrap();
        let catalog = dir.path().join("TAMU");
        let scratch = dir.path().join("scratch");
        let dispatcher = ConversionDispatcher::new(
            RecordingConverter::default(),
            &ProfileSet::default(),
            true,
            OutputLayout::Realtime {
                catalog_dir: catalog.clone(),
                scratch_dir: scratch.clone(),
            },
            "TAMU",
        );

        let sources = vec![
            PathBuf::from("cache/last_sweep"),
            PathBuf::from("in/b.RAW"),
        ];
        let outcome = dispatcher
            .dispatch(&scan(sources.clone()), ScanType::Survey)
            .unwrap();

        assert_eq!(outcome.retained, vec![catalog.join("TAMU_20220718_0905")]);
        assert!(!scratch.join("TAMU_20220718_0905").exists());

        let calls = dispatcher.converter.calls.borrow();
        assert_eq!(calls[0].0, sources);
        assert_eq!(calls[0].1, PathBuf::from("params_UF_az-offset.txt"));
        assert_eq!(calls[1].1, PathBuf::from("params_L2_az-offset.txt"));
    }

    #[test]
    fn converter_failure_is_surfaced() {
        let dir = tempdir().unwrap();
        let converter = RecordingConverter {
            fail_params: Some(PathBuf::from("l2_params.txt")),
            ..Default::default()
        };
        let dispatcher = ConversionDispatcher::new(
            converter,
            &ProfileSet::default(),
            false,
            OutputLayout::Realtime {
                catalog_dir: dir.path().join("TAMU"),
                scratch_dir: dir.path().join("scratch"),
            },
            "TAMU",
        );

        let err = dispatcher
            .dispatch(&scan(vec![PathBuf::from("a.RAW")]), ScanType::Volume)
            .unwrap_err();
        assert!(matches!(err, IngestError::Conversion(_)));
        assert!(!dir.path().join("scratch/TAMU_20220718_0905").exists());
    }
}
