//! Manual percent-script to Quarto markdown conversion.
//!
//! This is a lexical transform, not a parser. Stray or nested cell markers are
//! classified by their prefix alone and never rejected.

use serde::Serialize;

use crate::cells::{uncomment, CellMarker};
use crate::header::split_header;

/// Fence that opens an executable Python chunk.
const CODE_FENCE_OPEN: &str = "```{python}";

/// Fence that closes any chunk.
const CODE_FENCE_CLOSE: &str = "```";

/// Front matter synthesized when the script has no header block.
#[derive(Debug, Serialize)]
struct SyntheticFrontMatter<'a> {
    title: &'a str,
}

/// Errors that can occur when converting a script.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Failed to serialize front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),
}

/// Convert a percent-format Python script to Quarto markdown.
///
/// `stem` is used as the document title when the script carries no header.
pub fn convert_percent_script(source: &str, stem: &str) -> Result<String, ConvertError> {
    let (header, body) = split_header(source);

    let front_matter = match header {
        Some(header) => header.to_front_matter(),
        None => {
            let yaml = serde_yaml::to_string(&SyntheticFrontMatter { title: stem })?;
            format!("---\n{}---", yaml)
        }
    };

    let mut out = vec![front_matter, String::new()];
    let mut in_code = false;

    for line in body.lines() {
        match CellMarker::from_line(line) {
            Some(CellMarker::Markdown) => {
                if in_code {
                    close_code(&mut out);
                    in_code = false;
                }
            }
            Some(CellMarker::Code) => {
                if !in_code {
                    out.push(CODE_FENCE_OPEN.to_string());
                    in_code = true;
                }
            }
            None if in_code => out.push(line.to_string()),
            None if line.trim().is_empty() => out.push(String::new()),
            None => out.push(uncomment(line).to_string()),
        }
    }

    if in_code {
        close_code(&mut out);
    }

    let mut text = out.join("\n");
    text.push('\n');
    Ok(text)
}

/// Close an open chunk. Lines already inside it, blank ones included, stay as written.
fn close_code(out: &mut Vec<String>) {
    out.push(CODE_FENCE_CLOSE.to_string());
    out.push(String::new());
}
