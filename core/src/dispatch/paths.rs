use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scan::ScanType;

/// The two product formats written for every scan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Universal Format, kept for the climate toolkit.
    Uf,
    /// Level-II message 31, read by the display client.
    L2,
}

impl OutputFormat {
    pub fn dir_name(self) -> &'static str {
        match self {
            OutputFormat::Uf => "UF",
            OutputFormat::L2 => "L2",
        }
    }
}

/// `<SITE>_<YYYYMMDD>_<HHMM>` name for a product starting at `timestamp`.
pub fn product_name(site: &str, timestamp: &NaiveDateTime) -> String {
    format!("{}_{}", site, timestamp.format("%Y%m%d_%H%M"))
}

/// Where products land for a given run mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLayout {
    /// `<root>/<FORMAT>/<YYYYMMDD>/<vol|surv>/<name>`, both formats kept.
    Archive { root: PathBuf },
    /// L2 straight into the catalog, UF into a scratch directory and discarded.
    Realtime {
        catalog_dir: PathBuf,
        scratch_dir: PathBuf,
    },
}

impl OutputLayout {
    pub fn output_path(
        &self,
        format: OutputFormat,
        scan_type: ScanType,
        site: &str,
        timestamp: &NaiveDateTime,
    ) -> PathBuf {
        let name = product_name(site, timestamp);
        match self {
            OutputLayout::Archive { root } => root
                .join(format.dir_name())
                .join(timestamp.format("%Y%m%d").to_string())
                .join(scan_type.dir_name())
                .join(name),
            OutputLayout::Realtime {
                catalog_dir,
                scratch_dir,
            } => match format {
                OutputFormat::L2 => catalog_dir.join(name),
                OutputFormat::Uf => scratch_dir.join(name),
            },
        }
    }

    /// Whether products of `format` are kept after the run.
    pub fn retains(&self, format: OutputFormat) -> bool {
        match self {
            OutputLayout::Archive { .. } => true,
            OutputLayout::Realtime { .. } => format == OutputFormat::L2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn scan_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 7, 18)
            .unwrap()
            .and_hms_opt(9, 5, 42)
            .unwrap()
    }

    #[test]
    fn product_name_is_zero_padded() {
        assert_eq!(product_name("TAMU", &scan_time()), "TAMU_20220718_0905");
    }

    #[test]
    fn archive_paths_split_by_format_date_and_type() {
        let layout = OutputLayout::Archive {
            root: PathBuf::from("/data/output-archive"),
        };
        assert_eq!(
            layout.output_path(OutputFormat::Uf, ScanType::Volume, "TAMU", &scan_time()),
            PathBuf::from("/data/output-archive/UF/20220718/vol/TAMU_20220718_0905")
        );
        assert_eq!(
            layout.output_path(OutputFormat::L2, ScanType::Survey, "TAMU", &scan_time()),
            PathBuf::from("/data/output-archive/L2/20220718/surv/TAMU_20220718_0905")
        );
    }

    #[test]
    fn realtime_paths_put_only_l2_in_catalog() {
        let layout = OutputLayout::Realtime {
            catalog_dir: PathBuf::from("/srv/rt/TAMU"),
            scratch_dir: PathBuf::from("/srv/scratch"),
        };
        assert_eq!(
            layout.output_path(OutputFormat::L2, ScanType::Survey, "TAMU", &scan_time()),
            PathBuf::from("/srv/rt/TAMU/TAMU_20220718_0905")
        );
        assert_eq!(
            layout.output_path(OutputFormat::Uf, ScanType::Survey, "TAMU", &scan_time()),
            PathBuf::from("/srv/scratch/TAMU_20220718_0905")
        );
        assert!(layout.retains(OutputFormat::L2));
        assert!(!layout.retains(OutputFormat::Uf));
    }

    #[test]
    fn path_construction_is_reproducible() {
        let layout = OutputLayout::Archive {
            root: PathBuf::from("out"),
        };
        let first = layout.output_path(OutputFormat::L2, ScanType::Volume, "TAMU", &scan_time());
        let second = layout.output_path(OutputFormat::L2, ScanType::Volume, "TAMU", &scan_time());
        assert_eq!(first, second);
    }
}
