//! Decision core for the ADRAD sweep ingest pipeline.
//!
//! Raw sweep files are classified as volume or survey scans, low-level
//! single sweeps are joined with their predecessor when they continue the same
//! volume, and the converted products are kept in a bounded catalog with a
//! manifest for the real-time display client.

pub mod catalog;
pub mod dispatch;
pub mod math;
pub mod pipeline;
pub mod prelude;
pub mod scan;
pub mod state;
pub mod telemetry;

pub use prelude::{ConversionError, Converter, IngestError, IngestResult, ScanReader};
pub use scan::{ScanRecord, ScanType};
