//! Renderer invocation.

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Renderer executable looked up on `PATH`.
pub const DEFAULT_RENDERER: &str = "quarto";

/// Errors that can occur when rendering the site.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("{0} not found on PATH")]
    NotFound(String),

    #[error("{program} exited with {status}")]
    Failed { program: String, status: ExitStatus },

    #[error("Failed to run {program}")]
    Spawn { program: String, source: io::Error },
}

/// Runs the external site renderer.
#[derive(Debug, Clone)]
pub struct Renderer {
    program: String,
}

impl Renderer {
    /// Create a renderer for the given executable.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run `<program> render` in `root`, blocking until it exits.
    ///
    /// Standard output is always echoed. Standard error is echoed only when
    /// the renderer fails.
    pub fn render(&self, root: &Path) -> Result<(), RenderError> {
        self.render_to(root, &mut io::stdout(), &mut io::stderr())
    }

    /// Like [`Renderer::render`], echoing the renderer's streams into `out` and `err`.
    pub fn render_to(
        &self,
        root: &Path,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> Result<(), RenderError> {
        let executable =
            which::which(&self.program).map_err(|_| RenderError::NotFound(self.program.clone()))?;

        tracing::info!("Running {} render in {}", self.program, root.display());

        let output = Command::new(executable)
            .arg("render")
            .current_dir(root)
            .output()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        echo(out, &output.stdout);

        if !output.status.success() {
            echo(err, &output.stderr);
            return Err(RenderError::Failed {
                program: self.program.clone(),
                status: output.status,
            });
        }

        Ok(())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_RENDERER)
    }
}

fn echo(stream: &mut impl Write, bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }
    let _ = stream.write_all(bytes);
    let _ = stream.flush();
}
