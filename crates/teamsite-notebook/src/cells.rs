//! Cell marker classification for percent-format scripts.

/// Prefix shared by every cell marker line.
const CELL_PREFIX: &str = "# %%";

/// Cell-type annotations that mark a markdown cell.
const MARKDOWN_TAGS: [&str; 2] = ["[markdown]", "[md]"];

/// Kind of cell a marker line opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMarker {
    /// `# %% [markdown]` - commented prose follows
    Markdown,
    /// `# %%` with any other annotation - executable code follows
    Code,
}

impl CellMarker {
    /// Classify a source line, returning `None` for ordinary lines.
    pub fn from_line(line: &str) -> Option<Self> {
        let rest = line.strip_prefix(CELL_PREFIX)?;
        let annotation = rest.trim_start();

        if MARKDOWN_TAGS.iter().any(|tag| annotation.starts_with(tag)) {
            Some(Self::Markdown)
        } else {
            Some(Self::Code)
        }
    }
}

/// Strip a leading `"# "` or, failing that, a leading `"#"`.
pub fn uncomment(line: &str) -> &str {
    line.strip_prefix("# ")
        .or_else(|| line.strip_prefix('#'))
        .unwrap_or(line)
}
