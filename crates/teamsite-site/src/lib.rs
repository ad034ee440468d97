//! Quarto site generation for team project directories.
//!
//! Discovers team documents, converts percent-format scripts, writes the site
//! configuration and landing page, then hands off to `quarto render`.

pub mod builder;
pub mod convert;
pub mod discovery;
pub mod landing;
pub mod quarto;
pub mod render;

pub use builder::{BuildConfig, BuildError, BuildResult, SiteBuilder};
pub use convert::{ConvertError, NotebookConverter};
pub use discovery::{discover_teams, DiscoveryOptions, Document, DocumentKind, Team};
pub use landing::{landing_page, LegacyPage};
pub use quarto::{site_config, GenerateError, SiteSettings};
pub use render::{RenderError, Renderer};
