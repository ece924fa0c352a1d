use std::path::{Path, PathBuf};
use std::process::Command;
use sweepcore::prelude::{IngestError, IngestResult, ScanReader};
use sweepcore::scan::{ScanHeader, ScanRecord};

/// Reads scan metadata by running a probe command that prints a JSON header.
pub struct ProbeReader {
    program: PathBuf,
    args: Vec<String>,
}

impl ProbeReader {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl ScanReader for ProbeReader {
    fn read(&self, path: &Path) -> IngestResult<ScanRecord> {
        let unreadable = |message: String| IngestError::Unreadable {
            path: path.display().to_string(),
            message,
        };

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|err| {
                unreadable(format!("running {}: {}", self.program.display(), err))
            })?;
        if !output.status.success() {
            return Err(unreadable(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim_end()
            )));
        }

        let header: ScanHeader = serde_json::from_slice(&output.stdout)
            .map_err(|err| unreadable(format!("parsing scan header: {}", err)))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        ScanRecord::from_header(name, path, header)
    }
}
