use serde::{Deserialize, Serialize};
use std::fmt;

use crate::math::stats::StatsHelper;
use crate::prelude::{IngestError, IngestResult};
use crate::scan::record::ScanRecord;

/// PRF boundary between the two ADRAD scan strategies, in Hz.
///
/// Volume coverage patterns run short-range high-PRF sweeps while the
/// long-range surveillance scan drops well below this value; 623.5 sits
/// between the slowest volume PRF and the fastest survey PRF observed.
pub const VOLUME_PRF_THRESHOLD_HZ: f64 = 623.5;

/// Scan strategy derived from pulse-repetition timing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ScanType {
    Volume,
    Survey,
}

impl ScanType {
    /// Subdirectory name used in the archive output tree.
    pub fn dir_name(self) -> &'static str {
        match self {
            ScanType::Volume => "vol",
            ScanType::Survey => "surv",
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanType::Volume => f.write_str("volume"),
            ScanType::Survey => f.write_str("survey"),
        }
    }
}

/// Average PRF of a scan in whole Hz.
pub fn prf_hz(scan: &ScanRecord) -> IngestResult<f64> {
    let missing = || IngestError::MissingTimingData(scan.name.clone());
    let samples = scan.prt_samples.as_deref().ok_or_else(missing)?;
    let mean_prt = StatsHelper::mean(samples).ok_or_else(missing)?;
    if !mean_prt.is_finite() || mean_prt <= 0.0 {
        return Err(missing());
    }
    Ok(StatsHelper::round_half_even(1.0 / mean_prt, 0))
}

pub fn classify(scan: &ScanRecord) -> IngestResult<ScanType> {
    let prf = prf_hz(scan)?;
    if prf > VOLUME_PRF_THRESHOLD_HZ {
        Ok(ScanType::Volume)
    } else {
        Ok(ScanType::Survey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::record::Sweep;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn scan_with_prt(prt: Option<Vec<f64>>) -> ScanRecord {
        ScanRecord {
            name: "TAM220401123456.RAW".into(),
            sources: vec![PathBuf::from("TAM220401123456.RAW")],
            timestamp: NaiveDate::from_ymd_opt(2022, 4, 1)
                .unwrap()
                .and_hms_opt(12, 34, 56)
                .unwrap(),
            sweeps: vec![Sweep { fixed_angle_deg: 0.5 }],
            prt_samples: prt,
        }
    }

    #[test]
    fn high_prf_is_volume() {
        let scan = scan_with_prt(Some(vec![1.0 / 1000.0, 1.0 / 1000.0]));
        assert_eq!(classify(&scan).unwrap(), ScanType::Volume);
    }

    #[test]
    fn low_prf_is_survey() {
        let scan = scan_with_prt(Some(vec![1.0 / 250.0; 4]));
        assert_eq!(classify(&scan).unwrap(), ScanType::Survey);
    }

    #[test]
    fn prf_is_rounded_before_threshold() {
        // 623.6 Hz rounds to 624
        let scan = scan_with_prt(Some(vec![1.0 / 623.6]));
        assert_eq!(prf_hz(&scan).unwrap(), 624.0);
        assert_eq!(classify(&scan).unwrap(), ScanType::Volume);

        // 623.4 Hz rounds to 623
        let scan = scan_with_prt(Some(vec![1.0 / 623.4]));
        assert_eq!(classify(&scan).unwrap(), ScanType::Survey);
    }

    #[test]
    fn prf_uses_mean_of_all_samples() {
        // mean PRT of 1/500 and 1/1000 is 0.0015 s -> 667 Hz
        let scan = scan_with_prt(Some(vec![1.0 / 500.0, 1.0 / 1000.0]));
        assert_eq!(prf_hz(&scan).unwrap(), 667.0);
        assert_eq!(classify(&scan).unwrap(), ScanType::Volume);
    }

    #[test]
    fn classification_matches_rounded_prf_rule() {
        for hz in [300.0_f64, 600.0, 623.0, 623.49, 623.51, 624.0, 650.0, 1200.0] {
            let scan = scan_with_prt(Some(vec![1.0 / hz, 1.0 / hz]));
            let expected = if hz.round_ties_even() > VOLUME_PRF_THRESHOLD_HZ {
                ScanType::Volume
            } else {
                ScanType::Survey
            };
            assert_eq!(classify(&scan).unwrap(), expected, "prf {hz}");
        }
    }

    #[test]
    fn missing_or_empty_prt_is_reported() {
        let err = classify(&scan_with_prt(None)).unwrap_err();
        assert!(matches!(err, IngestError::MissingTimingData(_)));

        let err = classify(&scan_with_prt(Some(Vec::new()))).unwrap_err();
        assert!(matches!(err, IngestError::MissingTimingData(_)));

        let err = classify(&scan_with_prt(Some(vec![0.0]))).unwrap_err();
        assert!(matches!(err, IngestError::MissingTimingData(_)));
    }

    #[test]
    fn scan_type_maps_to_archive_subdirectory() {
        assert_eq!(ScanType::Volume.dir_name(), "vol");
        assert_eq!(ScanType::Survey.dir_name(), "surv");
    }
}
