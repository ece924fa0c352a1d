use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::prelude::{IngestError, IngestResult};

/// Scan metadata as reported by a scan reader for one raw file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanHeader {
    /// Scan start time, timezone-naive.
    pub timestamp: NaiveDateTime,
    /// Fixed elevation angle of every sweep, in degrees.
    pub fixed_angles: Vec<f64>,
    /// Pulse-repetition time samples in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prt: Option<Vec<f64>>,
}

/// A single sweep at a fixed elevation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Sweep {
    pub fixed_angle_deg: f64,
}

/// Metadata for one scan, possibly the join of two single-sweep scans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanRecord {
    /// Input filename the scan was read from.
    pub name: String,
    /// Raw files backing this record, in sweep order.
    pub sources: Vec<PathBuf>,
    pub timestamp: NaiveDateTime,
    pub sweeps: Vec<Sweep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prt_samples: Option<Vec<f64>>,
}

impl ScanRecord {
    pub fn from_header(
        name: impl Into<String>,
        source: &Path,
        header: ScanHeader,
    ) -> IngestResult<Self> {
        let name = name.into();
        if header.fixed_angles.is_empty() {
            return Err(IngestError::EmptyScan(name));
        }

        Ok(Self {
            name,
            sources: vec![source.to_path_buf()],
            timestamp: header.timestamp,
            sweeps: header
                .fixed_angles
                .into_iter()
                .map(|fixed_angle_deg| Sweep { fixed_angle_deg })
                .collect(),
            prt_samples: header.prt,
        })
    }

    pub fn sweep_count(&self) -> usize {
        self.sweeps.len()
    }

    /// Elevation of the first sweep.
    pub fn elevation_deg(&self) -> f64 {
        self.sweeps
            .first()
            .map(|sweep| sweep.fixed_angle_deg)
            .unwrap_or_default()
    }

    pub fn is_single_sweep(&self) -> bool {
        self.sweeps.len() == 1
    }
}
