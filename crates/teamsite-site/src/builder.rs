//! Site build orchestration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::convert::{NotebookConverter, DEFAULT_CONVERTER};
use crate::discovery::{discover_teams, DiscoveryOptions, DocumentKind, Team};
use crate::landing::{landing_page, LegacyPage, DEFAULT_LEGACY_LANDING};
use crate::quarto::{site_config, GenerateError, SiteSettings};
use crate::render::{RenderError, Renderer, DEFAULT_RENDERER};

/// Site configuration file written at the root.
pub const CONFIG_FILE: &str = "_quarto.yml";

/// Landing page written at the root.
pub const LANDING_FILE: &str = "index.qmd";

/// Configuration for building the site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Site root; generated files land here and the renderer runs here
    pub root: PathBuf,

    /// Site-wide settings
    pub site: SiteSettings,

    /// Team discovery options
    pub discovery: DiscoveryOptions,

    /// Legacy HTML landing page, relative to the root
    pub legacy_landing: PathBuf,

    /// Script converter executable
    pub converter: String,

    /// Site renderer executable
    pub renderer: String,

    /// Run the renderer after generating files
    pub render: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            site: SiteSettings::default(),
            discovery: DiscoveryOptions::default(),
            legacy_landing: PathBuf::from(DEFAULT_LEGACY_LANDING),
            converter: DEFAULT_CONVERTER.to_string(),
            renderer: DEFAULT_RENDERER.to_string(),
            render: true,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of teams listed
    pub teams: usize,

    /// Number of documents listed
    pub documents: usize,

    /// Number of scripts converted
    pub converted: usize,

    /// Whether the renderer ran
    pub rendered: bool,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Rendered site directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to generate site files")]
    Generate(#[from] GenerateError),

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error("Render failed")]
    Render(#[from] RenderError),
}

/// Quarto site builder.
pub struct SiteBuilder {
    config: BuildConfig,
    converter: NotebookConverter,
    renderer: Renderer,
}

impl SiteBuilder {
    /// Create a new site builder.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            converter: NotebookConverter::new(config.converter.clone()),
            renderer: Renderer::new(config.renderer.clone()),
            config,
        }
    }

    /// Build the site.
    ///
    /// Discovery and conversion problems are logged per item. Only writing
    /// the generated files or rendering can fail the build.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let root = &self.config.root;

        let mut teams = discover_teams(root, &self.config.discovery);
        tracing::info!("Discovered {} teams", teams.len());

        let converted = self.convert_scripts(&mut teams);

        let config = site_config(&self.config.site, root, &teams)?;
        self.write(CONFIG_FILE, &config)?;

        let legacy = LegacyPage::load(&root.join(&self.config.legacy_landing));
        let landing = landing_page(&self.config.site, legacy.as_ref(), root, &teams)?;
        self.write(LANDING_FILE, &landing)?;

        let rendered = if self.config.render {
            self.renderer.render(root)?;
            true
        } else {
            tracing::info!("Skipping render");
            false
        };

        Ok(BuildResult {
            teams: teams.len(),
            documents: teams.iter().map(|t| t.documents.len()).sum(),
            converted,
            rendered,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: root.join(&self.config.site.output_dir),
        })
    }

    /// Convert every percent-format script in place, returning how many succeeded.
    fn convert_scripts(&self, teams: &mut [Team]) -> usize {
        let mut converted = 0;

        for team in teams.iter_mut() {
            for doc in team
                .documents
                .iter_mut()
                .filter(|d| d.kind == DocumentKind::ConvertibleCode)
            {
                let output_dir = doc.path.parent().unwrap_or(Path::new("")).to_path_buf();

                match self.converter.convert(&doc.path, &output_dir) {
                    Ok(output) => {
                        tracing::info!("Converted {}", output.display());
                        doc.mark_converted(output);
                        converted += 1;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to convert {}: {}", doc.path.display(), e);
                    }
                }
            }

            team.drop_superseded();
        }

        converted
    }

    fn write(&self, name: &str, contents: &str) -> Result<(), BuildError> {
        let path = self.config.root.join(name);
        fs::write(&path, contents)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))?;
        tracing::info!("Wrote {}", path.display());
        Ok(())
    }
}
