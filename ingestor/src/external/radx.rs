use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;
use sweepcore::prelude::{ConversionError, Converter};

/// Runs LROSE `RadxConvert` once per conversion.
pub struct RadxConverter {
    binary: PathBuf,
    aggregate_flag: Option<String>,
}

impl RadxConverter {
    pub fn new(binary: impl Into<PathBuf>, aggregate_flag: Option<String>) -> Self {
        Self {
            binary: binary.into(),
            aggregate_flag,
        }
    }

    pub fn command(&self, inputs: &[PathBuf], params: &Path, output: &Path) -> Command {
        let mut command = Command::new(&self.binary);
        command.arg("-f").args(inputs);
        if inputs.len() > 1 {
            if let Some(flag) = &self.aggregate_flag {
                command.arg(flag);
            }
        }
        command.arg("-params").arg(params);
        if let Some(dir) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            command.arg("-outdir").arg(dir);
        }
        if let Some(name) = output.file_name() {
            command.arg("-outname").arg(name);
        }
        command
    }
}

impl Converter for RadxConverter {
    fn convert(
        &self,
        inputs: &[PathBuf],
        params: &Path,
        output: &Path,
    ) -> Result<(), ConversionError> {
        let result = self
            .command(inputs, params, output)
            .output()
            .map_err(|source| ConversionError::Launch {
                program: self.binary.display().to_string(),
                source,
            })?;

        debug!(
            "{} stdout: {}",
            self.binary.display(),
            String::from_utf8_lossy(&result.stdout).trim_end()
        );
        if !result.status.success() {
            debug!(
                "{} stderr: {}",
                self.binary.display(),
                String::from_utf8_lossy(&result.stderr).trim_end()
            );
            return Err(ConversionError::ExitStatus {
                status: result.status.to_string(),
                output: output.display().to_string(),
            });
        }
        if !output.exists() {
            return Err(ConversionError::MissingOutput(output.display().to_string()));
        }
        Ok(())
    }
}
