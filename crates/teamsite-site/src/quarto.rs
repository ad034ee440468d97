//! `_quarto.yml` generation.

use std::path::Path;

use serde::Serialize;

use crate::discovery::Team;

/// Default site title, also used for the landing page.
pub const DEFAULT_TITLE: &str = "Team Projects";

/// Default render output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "_site";

/// Page every site links to when there is nothing else.
pub const HOME_PAGE: &str = "index.qmd";

const HEADER_COMMENT: &str = "# Generated by teamsite. Changes are overwritten on every build.\n";

/// Site-wide settings shared by the generated files.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    /// Website title
    pub title: String,

    /// Directory quarto renders into, relative to the root
    pub output_dir: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
        }
    }
}

/// Errors that can occur while generating site files.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Failed to serialize YAML")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to render template")]
    Template(#[from] minijinja::Error),
}

#[derive(Debug, Serialize)]
struct QuartoConfig<'a> {
    project: Project<'a>,
    website: Website<'a>,
    format: Format,
    execute: Execute,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct Project<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    output_dir: &'a str,
}

#[derive(Debug, Serialize)]
struct Website<'a> {
    title: &'a str,
    sidebar: Sidebar,
}

#[derive(Debug, Serialize)]
struct Sidebar {
    style: &'static str,
    search: bool,
    contents: Vec<SidebarEntry>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum SidebarEntry {
    Section { section: String, contents: Vec<String> },
    Link { text: String, href: String },
}

#[derive(Debug, Serialize)]
struct Format {
    html: HtmlFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct HtmlFormat {
    theme: &'static str,
    toc: bool,
    toc_depth: u8,
    code_fold: bool,
}

#[derive(Debug, Serialize)]
struct Execute {
    freeze: &'static str,
}

/// Build the `_quarto.yml` contents for the discovered teams.
///
/// Every team gets a sidebar section listing its documents. With no teams the
/// sidebar holds a single link to the home page.
pub fn site_config(
    settings: &SiteSettings,
    root: &Path,
    teams: &[Team],
) -> Result<String, GenerateError> {
    let mut contents: Vec<SidebarEntry> = teams
        .iter()
        .filter(|team| !team.documents.is_empty())
        .map(|team| SidebarEntry::Section {
            section: team.name.clone(),
            contents: team.documents.iter().map(|d| d.href(root)).collect(),
        })
        .collect();

    if contents.is_empty() {
        contents.push(SidebarEntry::Link {
            text: "Home".to_string(),
            href: HOME_PAGE.to_string(),
        });
    }

    let config = QuartoConfig {
        project: Project {
            kind: "website",
            output_dir: &settings.output_dir,
        },
        website: Website {
            title: &settings.title,
            sidebar: Sidebar {
                style: "docked",
                search: true,
                contents,
            },
        },
        format: Format {
            html: HtmlFormat {
                theme: "cosmo",
                toc: true,
                toc_depth: 3,
                code_fold: true,
            },
        },
        execute: Execute { freeze: "auto" },
    };

    let yaml = serde_yaml::to_string(&config)?;
    Ok(format!("{}{}", HEADER_COMMENT, yaml))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{Document, DocumentKind};
    use std::path::PathBuf;

    fn team(name: &str, files: &[(&str, DocumentKind)]) -> Team {
        let dir = PathBuf::from("/site/Team_Projects").join(name);
        Team {
            name: name.to_string(),
            path: PathBuf::from("Team_Projects").join(name),
            documents: files
                .iter()
                .map(|(f, k)| Document::new(dir.join(f), *k))
                .collect(),
        }
    }

    fn parse(yaml: &str) -> serde_yaml::Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn lists_team_sections() {
        let teams = vec![
            team(
                "Alpha",
                &[
                    ("notes.md", DocumentKind::Markdown),
                    ("report.qmd", DocumentKind::QuartoNative),
                ],
            ),
            team("Beta", &[("eda.ipynb", DocumentKind::Notebook)]),
        ];

        let yaml = site_config(&SiteSettings::default(), Path::new("/site"), &teams).unwrap();
        let value = parse(&yaml);
        let contents = &value["website"]["sidebar"]["contents"];

        assert_eq!(contents[0]["section"].as_str(), Some("Alpha"));
        assert_eq!(
            contents[0]["contents"][0].as_str(),
            Some("Team_Projects/Alpha/notes.md")
        );
        assert_eq!(
            contents[0]["contents"][1].as_str(),
            Some("Team_Projects/Alpha/report.qmd")
        );
        assert_eq!(contents[1]["section"].as_str(), Some("Beta"));
        assert_eq!(contents.as_sequence().unwrap().len(), 2);
    }

    #[test]
    fn falls_back_to_home_link() {
        let yaml = site_config(&SiteSettings::default(), Path::new("/site"), &[]).unwrap();
        let value = parse(&yaml);
        let contents = value["website"]["sidebar"]["contents"].as_sequence().unwrap();

        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["href"].as_str(), Some("index.qmd"));
        assert_eq!(contents[0]["text"].as_str(), Some("Home"));
    }

    #[test]
    fn carries_fixed_settings() {
        let settings = SiteSettings {
            title: "Capstone: 2026".to_string(),
            output_dir: "public".to_string(),
        };

        let yaml = site_config(&settings, Path::new("/site"), &[]).unwrap();
        let value = parse(&yaml);

        assert!(yaml.starts_with("# Generated by teamsite"));
        assert_eq!(value["project"]["type"].as_str(), Some("website"));
        assert_eq!(value["project"]["output-dir"].as_str(), Some("public"));
        assert_eq!(value["website"]["title"].as_str(), Some("Capstone: 2026"));
        assert_eq!(value["format"]["html"]["theme"].as_str(), Some("cosmo"));
        assert_eq!(value["format"]["html"]["toc-depth"].as_u64(), Some(3));
        assert_eq!(value["format"]["html"]["code-fold"].as_bool(), Some(true));
        assert_eq!(value["execute"]["freeze"].as_str(), Some("auto"));
    }
}
