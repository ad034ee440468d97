//! Landing page generation.

use std::fs;
use std::path::Path;

use minijinja::{context, Environment};
use serde::Serialize;

use crate::discovery::Team;
use crate::quarto::{GenerateError, SiteSettings};

/// Legacy landing file checked at the root.
pub const DEFAULT_LEGACY_LANDING: &str = "index.html";

/// Description used in the landing page front matter.
pub const DEFAULT_DESCRIPTION: &str = "Project showcase for all teams";

/// Tag rewrites applied to the legacy body, in order.
const BODY_REWRITES: [(&str, &str); 4] = [
    ("<h1>", "# "),
    ("</h1>", "\n"),
    ("<p>", ""),
    ("</p>", "\n"),
];

/// Content salvaged from a hand-written HTML landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyPage {
    /// Text of the `<title>` element
    pub title: Option<String>,

    /// Body fragment rewritten to line-based markup
    pub body: String,
}

impl LegacyPage {
    /// Pull the title and body out of an HTML document.
    pub fn extract(html: &str) -> Self {
        let title = between(html, "<title>", "</title>")
            .map(|t| t.replace("&mdash;", "—").trim().to_string())
            .filter(|t| !t.is_empty());

        let body = between(html, "<body>", "</body>")
            .map(|b| {
                BODY_REWRITES
                    .iter()
                    .fold(b.to_string(), |acc, (from, to)| acc.replace(from, to))
                    .trim()
                    .to_string()
            })
            .unwrap_or_default();

        Self { title, body }
    }

    /// Load the legacy page at `path`, if there is one.
    pub fn load(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match fs::read_to_string(path) {
            Ok(html) => {
                tracing::info!("Using legacy landing content from {}", path.display());
                Some(Self::extract(&html))
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Text between the first `open` and the next `close` after it.
fn between<'a>(text: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = text.find(open)? + open.len();
    let end = start + text[start..].find(close)?;
    Some(&text[start..end])
}

#[derive(Debug, Serialize)]
struct FrontMatter<'a> {
    title: &'a str,
    description: &'a str,
}

/// A team heading with its document links.
#[derive(Debug, Clone, Serialize)]
struct TeamLinks {
    name: String,
    links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize)]
struct Link {
    title: String,
    href: String,
}

/// Render `index.qmd`.
///
/// The legacy page supplies the title and leading body; without it the site
/// title is used and the body stays empty. The team listing is always added.
pub fn landing_page(
    settings: &SiteSettings,
    legacy: Option<&LegacyPage>,
    root: &Path,
    teams: &[Team],
) -> Result<String, GenerateError> {
    let title = legacy
        .and_then(|l| l.title.as_deref())
        .unwrap_or(&settings.title);
    let body = legacy.map(|l| l.body.as_str()).unwrap_or("");

    let front_matter = serde_yaml::to_string(&FrontMatter {
        title,
        description: DEFAULT_DESCRIPTION,
    })?;

    let teams: Vec<TeamLinks> = teams
        .iter()
        .map(|team| TeamLinks {
            name: team.name.clone(),
            links: team
                .documents
                .iter()
                .map(|d| Link {
                    title: d.display_name.clone(),
                    href: d.href(root),
                })
                .collect(),
        })
        .collect();

    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template("index.qmd", LANDING_TEMPLATE)?;

    let rendered = env.get_template("index.qmd")?.render(context! {
        front_matter => front_matter,
        body => body,
        teams => teams,
    })?;

    Ok(rendered)
}

const LANDING_TEMPLATE: &str = r#"---
{{ front_matter }}---

{% if body %}
{{ body }}

{% endif %}
## Team Projects
{% for team in teams %}

### {{ team.name }}

{% for link in team.links %}
- [{{ link.title }}]({{ link.href }})
{% endfor %}
{% else %}

_No team projects found._
{% endfor %}"#;
