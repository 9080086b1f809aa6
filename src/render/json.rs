//! JSON rendering for outlines.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::OutlineDocument;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline to JSON. Non-ASCII text is written as UTF-8.
pub fn to_json(doc: &OutlineDocument, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc)?,
        JsonFormat::Compact => serde_json::to_string(doc)?,
    };
    Ok(json)
}

/// Write an outline as JSON to `path`, replacing any existing file.
pub fn write_json<P: AsRef<Path>>(doc: &OutlineDocument, path: P, format: JsonFormat) -> Result<()> {
    let mut json = to_json(doc, format)?;
    json.push('\n');
    let path = path.as_ref();
    fs::write(path, json).map_err(|source| Error::Output {
        path: path.to_path_buf(),
        source,
    })
}
