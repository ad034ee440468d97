//! Commented YAML header detection and extraction.

use crate::cells::uncomment;

/// Line that opens and closes the commented header block.
pub const HEADER_DELIMITER: &str = "# ---";

/// Key that every jupytext header carries.
pub const METADATA_MARKER: &str = "jupyter:";

/// The delimiter must appear within this many leading characters.
pub const DELIMITER_WINDOW: usize = 500;

/// The metadata marker must appear within this many leading characters.
pub const MARKER_WINDOW: usize = 1000;

/// Decide whether the start of a `.py` file looks like a percent-format
/// notebook.
///
/// Only the first [`MARKER_WINDOW`] characters are considered, so callers can
/// pass a truncated read of the file.
pub fn is_percent_script(head: &str) -> bool {
    let delimiter_end = byte_offset(head, DELIMITER_WINDOW);
    let marker_end = byte_offset(head, MARKER_WINDOW);

    head[..delimiter_end].contains(HEADER_DELIMITER) && head[..marker_end].contains(METADATA_MARKER)
}

/// Byte offset of the `chars`-th character, clamped to the string length.
fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map(|(i, _)| i).unwrap_or(s.len())
}

/// A de-commented metadata block taken from the top of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// YAML lines with their comment prefix removed
    pub lines: Vec<String>,
}

impl Header {
    /// Render as a Quarto front matter block.
    pub fn to_front_matter(&self) -> String {
        let mut out = String::from("---\n");
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("---");
        out
    }
}

/// Split a leading commented header block from the rest of the script.
///
/// The block must be the first non-blank content and be closed by a second
/// delimiter line. Without a closing delimiter the whole source is returned
/// as the body.
pub fn split_header(source: &str) -> (Option<Header>, &str) {
    let mut offset = 0;
    let mut opened = false;
    let mut lines = Vec::new();

    for raw in source.split_inclusive('\n') {
        offset += raw.len();
        let line = raw.trim_end_matches(['\n', '\r']);

        if !opened {
            if line.trim().is_empty() {
                continue;
            }
            if line != HEADER_DELIMITER {
                return (None, source);
            }
            opened = true;
            continue;
        }

        if line == HEADER_DELIMITER {
            return (Some(Header { lines }), &source[offset..]);
        }
        lines.push(uncomment(line).to_string());
    }

    (None, source)
}
