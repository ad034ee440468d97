//! Percent-script conversion, via jupytext or the built-in transform.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use teamsite_notebook::convert_percent_script;

/// Converter executable looked up on `PATH`.
pub const DEFAULT_CONVERTER: &str = "jupytext";

/// Target format and extension of converted documents.
pub const TARGET_FORMAT: &str = "qmd";

/// Errors that can occur when converting a script.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("{program} exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{program} succeeded but did not write {path}")]
    MissingOutput { program: String, path: PathBuf },

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Source has no usable file name: {0}")]
    InvalidSource(PathBuf),

    #[error(transparent)]
    Transform(#[from] teamsite_notebook::ConvertError),
}

/// Converts percent-format scripts to Quarto markdown.
#[derive(Debug, Clone)]
pub struct NotebookConverter {
    program: String,
}

impl NotebookConverter {
    /// Create a converter that prefers the given executable.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Convert `source` into `<output_dir>/<stem>.qmd`.
    ///
    /// The external tool is used whenever it can be located; its failures are
    /// returned as-is. The built-in transform runs only when it is absent.
    pub fn convert(&self, source: &Path, output_dir: &Path) -> Result<PathBuf, ConvertError> {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConvertError::InvalidSource(source.to_path_buf()))?;
        let output = output_dir.join(format!("{}.{}", stem, TARGET_FORMAT));

        match which::which(&self.program) {
            Ok(executable) => self.run_tool(&executable, source, &output)?,
            Err(_) => {
                tracing::debug!(
                    "{} not found, converting {} with the built-in transform",
                    self.program,
                    source.display()
                );
                convert_manually(source, &output, stem)?;
            }
        }

        Ok(output)
    }

    fn run_tool(&self, executable: &Path, source: &Path, output: &Path) -> Result<(), ConvertError> {
        let result = Command::new(executable)
            .args(["--to", TARGET_FORMAT, "-o"])
            .arg(output)
            .arg(source)
            .output()
            .map_err(|e| ConvertError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !result.status.success() {
            return Err(ConvertError::ToolFailed {
                program: self.program.clone(),
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        if !output.exists() {
            return Err(ConvertError::MissingOutput {
                program: self.program.clone(),
                path: output.to_path_buf(),
            });
        }

        Ok(())
    }
}

impl Default for NotebookConverter {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERTER)
    }
}

fn convert_manually(source: &Path, output: &Path, stem: &str) -> Result<(), ConvertError> {
    let text = fs::read_to_string(source).map_err(|e| ConvertError::Read {
        path: source.to_path_buf(),
        source: e,
    })?;

    let qmd = convert_percent_script(&text, stem)?;

    fs::write(output, qmd).map_err(|e| ConvertError::Write {
        path: output.to_path_buf(),
        source: e,
    })
}
