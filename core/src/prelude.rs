use std::io;
use std::path::{Path, PathBuf};

pub use crate::scan::{ScanRecord, ScanType};

/// Errors raised by the external conversion step.
#[derive(thiserror::Error, Debug)]
pub enum ConversionError {
    #[error("failed to launch converter '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("converter exited with {status} while writing '{output}'")]
    ExitStatus { status: String, output: String },
    #[error("converter produced no output at '{0}'")]
    MissingOutput(String),
}

/// Common error type for ingest operations.
#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("unable to determine PRF from {0}")]
    MissingTimingData(String),
    #[error("scan {0} contains no sweeps")]
    EmptyScan(String),
    #[error("failed to read scan '{path}': {message}")]
    Unreadable { path: String, message: String },
    #[error("io error at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("ledger error at '{path}': {source}")]
    Ledger {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("sweep cache error at '{path}': {source}")]
    Cache {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl IngestError {
    /// Wraps an `io::Error` with the path it occurred on, for use with `map_err`.
    pub fn io(path: &Path) -> impl FnOnce(io::Error) -> IngestError {
        let path = path.display().to_string();
        move |source| IngestError::Io { path, source }
    }
}

pub type IngestResult<T> = Result<T, IngestError>;

/// Capability that turns one or more raw scan files into an output product.
pub trait Converter {
    fn convert(
        &self,
        inputs: &[PathBuf],
        params: &Path,
        output: &Path,
    ) -> Result<(), ConversionError>;
}

/// Capability that reads scan metadata from a raw sweep file.
pub trait ScanReader {
    fn read(&self, path: &Path) -> IngestResult<ScanRecord>;
}

impl<T: Converter + ?Sized> Converter for &T {
    fn convert(
        &self,
        inputs: &[PathBuf],
        params: &Path,
        output: &Path,
    ) -> Result<(), ConversionError> {
        (**self).convert(inputs, params, output)
    }
}

impl<T: ScanReader + ?Sized> ScanReader for &T {
    fn read(&self, path: &Path) -> IngestResult<ScanRecord> {
        (**self).read(path)
    }
}
