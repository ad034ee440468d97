//! Percent-format notebook handling.
//!
//! This crate recognizes Python scripts written in the jupytext `py:percent`
//! notation (code cells delimited by `# %%` comments, with a commented YAML
//! header) and converts them to Quarto markdown without any external tooling.

pub mod cells;
pub mod convert;
pub mod header;

pub use cells::CellMarker;
pub use convert::{convert_percent_script, ConvertError};
pub use header::{is_percent_script, split_header, Header};
