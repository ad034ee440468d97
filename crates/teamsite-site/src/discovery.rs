//! Team and document discovery.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use teamsite_notebook::header::{is_percent_script, MARKER_WINDOW};

/// Directory holding one subdirectory per team, relative to the site root.
pub const DEFAULT_PROJECTS_DIR: &str = "Team_Projects";

/// Housekeeping directories that never count as teams.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "template",
    "_template",
    "templates",
    "__pycache__",
    "demo",
    "demos",
    "data",
    "_freeze",
];

/// Upper bound on bytes read when sniffing a script header.
const SNIFF_BYTES: u64 = (MARKER_WINDOW * 4) as u64;

/// Kind of renderable document.
///
/// Variant order is the order in which extension groups are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentKind {
    /// Plain markdown (`.md`)
    Markdown,
    /// Quarto markdown (`.qmd`)
    QuartoNative,
    /// Jupyter notebook (`.ipynb`)
    Notebook,
    /// Percent-format Python script (`.py`) awaiting conversion
    ConvertibleCode,
}

impl DocumentKind {
    /// Map a file extension to the kind it could be.
    ///
    /// `.py` maps to [`DocumentKind::ConvertibleCode`] before its header has
    /// been checked.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "md" => Some(Self::Markdown),
            "qmd" => Some(Self::QuartoNative),
            "ipynb" => Some(Self::Notebook),
            "py" => Some(Self::ConvertibleCode),
            _ => None,
        }
    }
}

/// A renderable file belonging to a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Filesystem location
    pub path: PathBuf,

    /// Document kind
    pub kind: DocumentKind,

    /// Human-readable name derived from the file stem
    pub display_name: String,

    /// Original script when this document was produced by conversion
    pub converted_from: Option<PathBuf>,
}

impl Document {
    /// Create a document for a discovered file.
    pub fn new(path: PathBuf, kind: DocumentKind) -> Self {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Untitled");
        let display_name = display_name(stem);

        Self {
            path,
            kind,
            display_name,
            converted_from: None,
        }
    }

    /// Point this document at its converted Quarto file.
    pub fn mark_converted(&mut self, output: PathBuf) {
        let source = std::mem::replace(&mut self.path, output);
        self.kind = DocumentKind::QuartoNative;
        self.converted_from = Some(source);
    }

    /// Root-relative, `/`-separated link target.
    pub fn href(&self, root: &Path) -> String {
        relative_href(root, &self.path)
    }
}

/// A team directory and its documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    /// Directory basename
    pub name: String,

    /// Location relative to the site root
    pub path: PathBuf,

    /// Documents ordered by kind, then filename
    pub documents: Vec<Document>,
}

impl Team {
    /// Drop stale entries that a conversion in this run has replaced.
    pub fn drop_superseded(&mut self) {
        let outputs: Vec<PathBuf> = self
            .documents
            .iter()
            .filter(|d| d.converted_from.is_some())
            .map(|d| d.path.clone())
            .collect();

        self.documents
            .retain(|d| d.converted_from.is_some() || !outputs.contains(&d.path));
    }
}

/// Options controlling discovery.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Directory of team folders, relative to the root
    pub projects_dir: PathBuf,

    /// Directory names that are never teams
    pub excluded: Vec<String>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            projects_dir: PathBuf::from(DEFAULT_PROJECTS_DIR),
            excluded: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Discover teams under `root`, ordered by directory name.
///
/// Teams without any renderable documents are left out.
pub fn discover_teams(root: &Path, options: &DiscoveryOptions) -> Vec<Team> {
    let projects = root.join(&options.projects_dir);

    if !projects.is_dir() {
        tracing::warn!("Projects directory not found: {}", projects.display());
        return Vec::new();
    }

    let mut teams = Vec::new();

    for entry in WalkDir::new(&projects)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if is_hidden(name) || options.excluded.iter().any(|x| x == name) {
            tracing::debug!("Skipping directory {}", path.display());
            continue;
        }

        let documents = discover_documents(path);
        if documents.is_empty() {
            tracing::debug!("No documents in {}", path.display());
            continue;
        }

        teams.push(Team {
            name: name.to_string(),
            path: path.strip_prefix(root).unwrap_or(path).to_path_buf(),
            documents,
        });
    }

    teams
}

/// List renderable files directly inside a team directory.
fn discover_documents(team_dir: &Path) -> Vec<Document> {
    let mut documents: Vec<Document> = WalkDir::new(team_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| !e.file_name().to_str().map(is_hidden).unwrap_or(true))
        .filter_map(|e| {
            let path = e.into_path();
            let ext = path.extension().and_then(|e| e.to_str())?;
            let kind = DocumentKind::from_extension(ext)?;

            if kind == DocumentKind::ConvertibleCode && !is_convertible(&path) {
                return None;
            }

            Some(Document::new(path, kind))
        })
        .collect();

    // Entries arrive in filename order; a stable sort keeps it within each kind.
    documents.sort_by_key(|d| d.kind);
    documents
}

/// Whether a `.py` file carries a percent-format notebook header.
///
/// Read failures count as "not convertible".
pub fn is_convertible(path: &Path) -> bool {
    match read_head(path) {
        Ok(head) => is_percent_script(&head),
        Err(e) => {
            tracing::debug!("Could not sniff {}: {}", path.display(), e);
            false
        }
    }
}

/// Read the start of a file as UTF-8, tolerating a character cut at the end.
fn read_head(path: &Path) -> io::Result<String> {
    let mut buf = Vec::new();
    File::open(path)?.take(SNIFF_BYTES).read_to_end(&mut buf)?;

    match String::from_utf8(buf) {
        Ok(text) => Ok(text),
        Err(e) if e.utf8_error().error_len().is_none() => {
            let valid = e.utf8_error().valid_up_to();
            let mut bytes = e.into_bytes();
            bytes.truncate(valid);
            String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
        }
        Err(e) => Err(io::Error::new(io::ErrorKind::InvalidData, e)),
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Turn a file stem into a title: separators become spaces, words are capitalized.
pub fn display_name(stem: &str) -> String {
    stem.split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalize first letter of a string.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Express `path` relative to `root` with `/` separators.
pub fn relative_href(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);

    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HEADER: &str = "# ---\n# jupyter:\n#   kernelspec:\n#     name: python3\n# ---\n\n# %%\nx = 1\n";

    fn touch(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn names(team: &Team) -> Vec<String> {
        team.documents
            .iter()
            .map(|d| d.path.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn discovers_teams_in_name_order() {
        let temp = tempdir().unwrap();
        let projects = temp.path().join(DEFAULT_PROJECTS_DIR);
        touch(&projects.join("Zeta/readme.md"), "# Z");
        touch(&projects.join("Alpha/report.qmd"), "# A");
        touch(&projects.join("Mu/notes.md"), "# M");

        let teams = discover_teams(temp.path(), &DiscoveryOptions::default());

        let team_names: Vec<_> = teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(team_names, vec!["Alpha", "Mu", "Zeta"]);
        assert_eq!(teams[0].path, PathBuf::from("Team_Projects/Alpha"));
    }

    #[test]
    fn orders_documents_by_kind_then_name() {
        let temp = tempdir().unwrap();
        let team = temp.path().join(DEFAULT_PROJECTS_DIR).join("Alpha");
        touch(&team.join("z_analysis.py"), HEADER);
        touch(&team.join("b.ipynb"), "{}");
        touch(&team.join("report.qmd"), "");
        touch(&team.join("intro.qmd"), "");
        touch(&team.join("notes.md"), "");
        touch(&team.join("a.md"), "");

        let teams = discover_teams(temp.path(), &DiscoveryOptions::default());

        assert_eq!(
            names(&teams[0]),
            vec![
                "a.md",
                "notes.md",
                "intro.qmd",
                "report.qmd",
                "b.ipynb",
                "z_analysis.py"
            ]
        );
        assert_eq!(teams[0].documents[5].kind, DocumentKind::ConvertibleCode);
    }

    #[test]
    fn skips_hidden_and_excluded_directories() {
        let temp = tempdir().unwrap();
        let projects = temp.path().join(DEFAULT_PROJECTS_DIR);
        touch(&projects.join(".git/notes.md"), "");
        touch(&projects.join("__pycache__/notes.md"), "");
        touch(&projects.join("template/index.qmd"), "");
        touch(&projects.join("data/readme.md"), "");
        touch(&projects.join("Scratch/readme.md"), "");
        touch(&projects.join("Beta/readme.md"), "");

        let options = DiscoveryOptions {
            excluded: vec![
                "template".into(),
                "__pycache__".into(),
                "data".into(),
                "Scratch".into(),
            ],
            ..Default::default()
        };
        let teams = discover_teams(temp.path(), &options);

        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "Beta");
    }

    #[test]
    fn omits_teams_without_documents() {
        let temp = tempdir().unwrap();
        let projects = temp.path().join(DEFAULT_PROJECTS_DIR);
        touch(&projects.join("Empty/script.py"), "print('not a notebook')\n");
        touch(&projects.join("Empty/data.csv"), "a,b\n");
        touch(&projects.join("Full/readme.md"), "");

        let teams = discover_teams(temp.path(), &DiscoveryOptions::default());

        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "Full");
    }

    #[test]
    fn does_not_recurse_into_team_subdirectories() {
        let temp = tempdir().unwrap();
        let team = temp.path().join(DEFAULT_PROJECTS_DIR).join("Alpha");
        touch(&team.join("nested/deep.md"), "");
        touch(&team.join("top.md"), "");
        touch(&team.join(".hidden.md"), "");

        let teams = discover_teams(temp.path(), &DiscoveryOptions::default());

        assert_eq!(names(&teams[0]), vec!["top.md"]);
    }

    #[test]
    fn missing_projects_dir_yields_nothing() {
        let temp = tempdir().unwrap();

        assert!(discover_teams(temp.path(), &DiscoveryOptions::default()).is_empty());
    }

    #[test]
    fn sniffs_python_headers() {
        let temp = tempdir().unwrap();
        let notebook = temp.path().join("nb.py");
        let late = temp.path().join("late.py");
        touch(&notebook, HEADER);
        touch(&late, &format!("{}{}", "x = 1\n".repeat(100), HEADER));

        assert!(is_convertible(&notebook));
        assert!(!is_convertible(&late));
        assert!(!is_convertible(&temp.path().join("missing.py")));
    }

    #[test]
    fn invalid_utf8_is_not_convertible() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bin.py");
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.insert(0, 0xff);
        fs::write(&path, bytes).unwrap();

        assert!(!is_convertible(&path));
    }

    #[test]
    fn derives_display_names() {
        assert_eq!(display_name("final_report"), "Final Report");
        assert_eq!(display_name("eda-notes"), "Eda Notes");
        assert_eq!(display_name("README"), "README");
        assert_eq!(display_name("week__2"), "Week 2");
    }

    #[test]
    fn builds_relative_hrefs() {
        let root = Path::new("/srv/site");
        let doc = Document::new(
            PathBuf::from("/srv/site/Team_Projects/Alpha/notes.md"),
            DocumentKind::Markdown,
        );

        assert_eq!(doc.href(root), "Team_Projects/Alpha/notes.md");
        assert_eq!(
            relative_href(Path::new("."), Path::new("./Team_Projects/A/x.qmd")),
            "Team_Projects/A/x.qmd"
        );
    }

    #[test]
    fn conversion_replaces_stale_output() {
        let team_dir = PathBuf::from("Team_Projects/Alpha");
        let mut team = Team {
            name: "Alpha".into(),
            path: team_dir.clone(),
            documents: vec![
                Document::new(team_dir.join("analysis.qmd"), DocumentKind::QuartoNative),
                Document::new(team_dir.join("notes.qmd"), DocumentKind::QuartoNative),
                Document::new(team_dir.join("analysis.py"), DocumentKind::ConvertibleCode),
            ],
        };

        team.documents[2].mark_converted(team_dir.join("analysis.qmd"));
        team.drop_superseded();

        assert_eq!(team.documents.len(), 2);
        assert_eq!(team.documents[0].path, team_dir.join("notes.qmd"));
        assert_eq!(
            team.documents[1].converted_from,
            Some(team_dir.join("analysis.py"))
        );
        assert_eq!(team.documents[1].kind, DocumentKind::QuartoNative);
    }
}
