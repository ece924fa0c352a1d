//! Adapters for the external programs the ingest core delegates to.

pub mod probe;
pub mod radx;

pub use probe::ProbeReader;
pub use radx::RadxConverter;
