//! Optional `teamsite.toml` configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use teamsite_site::discovery::{DEFAULT_EXCLUDED_DIRS, DEFAULT_PROJECTS_DIR};
use teamsite_site::quarto::{DEFAULT_OUTPUT_DIR, DEFAULT_TITLE};
use teamsite_site::{BuildConfig, DiscoveryOptions, SiteSettings};

/// Configuration file structure (teamsite.toml).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    site: SiteSection,
    #[serde(default)]
    discovery: DiscoverySection,
    #[serde(default)]
    tools: ToolsSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SiteSection {
    #[serde(default = "default_title")]
    title: String,
    #[serde(default = "default_output_dir")]
    output_dir: String,
    #[serde(default = "default_projects_dir")]
    projects_dir: String,
    #[serde(default = "default_legacy_landing")]
    legacy_landing: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: default_title(),
            output_dir: default_output_dir(),
            projects_dir: default_projects_dir(),
            legacy_landing: default_legacy_landing(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct DiscoverySection {
    /// Directory names skipped in addition to the built-in list
    #[serde(default)]
    exclude: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ToolsSection {
    #[serde(default = "default_converter")]
    converter: String,
    #[serde(default = "default_renderer")]
    renderer: String,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            converter: default_converter(),
            renderer: default_renderer(),
        }
    }
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}
fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}
fn default_projects_dir() -> String {
    DEFAULT_PROJECTS_DIR.to_string()
}
fn default_legacy_landing() -> String {
    teamsite_site::landing::DEFAULT_LEGACY_LANDING.to_string()
}
fn default_converter() -> String {
    teamsite_site::convert::DEFAULT_CONVERTER.to_string()
}
fn default_renderer() -> String {
    teamsite_site::render::DEFAULT_RENDERER.to_string()
}

impl ConfigFile {
    /// Load configuration from `path` if it exists.
    /// Returns an error if the config file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Turn the file settings into a build configuration rooted at `root`.
    pub fn into_build_config(self, root: PathBuf, render: bool) -> BuildConfig {
        let mut excluded: Vec<String> = DEFAULT_EXCLUDED_DIRS
            .iter()
            .map(|s| s.to_string())
            .collect();
        excluded.extend(self.discovery.exclude);

        BuildConfig {
            root,
            site: SiteSettings {
                title: self.site.title,
                output_dir: self.site.output_dir,
            },
            discovery: DiscoveryOptions {
                projects_dir: PathBuf::from(self.site.projects_dir),
                excluded,
            },
            legacy_landing: PathBuf::from(self.site.legacy_landing),
            converter: self.tools.converter,
            renderer: self.tools.renderer,
            render,
        }
    }
}
