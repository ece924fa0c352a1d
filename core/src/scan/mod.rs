pub mod classify;
pub mod merge;
pub mod record;

pub use classify::{classify, prf_hz, ScanType, VOLUME_PRF_THRESHOLD_HZ};
pub use merge::maybe_merge;
pub use record::{ScanHeader, ScanRecord, Sweep};
