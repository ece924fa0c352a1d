use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Converter parameter files for the two output formats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParamProfiles {
    pub uf: PathBuf,
    pub l2: PathBuf,
}

impl ParamProfiles {
    fn resolve(&self, base: &Path) -> Self {
        Self {
            uf: base.join(&self.uf),
            l2: base.join(&self.l2),
        }
    }
}

/// Plain and azimuth-corrected profile pairs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProfileSet {
    pub default: ParamProfiles,
    pub azimuth_corrected: ParamProfiles,
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self {
            default: ParamProfiles {
                uf: PathBuf::from("uf_params.txt"),
                l2: PathBuf::from("l2_params.txt"),
            },
            azimuth_corrected: ParamProfiles {
                uf: PathBuf::from("params_UF_az-offset.txt"),
                l2: PathBuf::from("params_L2_az-offset.txt"),
            },
        }
    }
}

impl ProfileSet {
    pub fn select(&self, correct_azimuth: bool) -> &ParamProfiles {
        if correct_azimuth {
            &self.azimuth_corrected
        } else {
            &self.default
        }
    }

    /// Anchors relative parameter paths at `base`; absolute paths are kept.
    pub fn resolve(&self, base: &Path) -> Self {
        Self {
            default: self.default.resolve(base),
            azimuth_corrected: self.azimuth_corrected.resolve(base),
        }
    }
}
