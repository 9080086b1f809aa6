//! Document title inference.

use crate::model::{FontSize, LineRecord};

use super::normalize::normalize_text;

/// The line or lines chosen as document title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredTitle {
    /// Normalized title text
    pub text: String,
    /// Indices of the source lines in the document's line list, ascending
    pub line_indices: Vec<usize>,
}

/// Pick the title from the largest lines on page 1.
///
/// The title starts at the first line with the maximum font size and runs
/// through the lines that directly follow it at that same size, so a title
/// set over several lines is kept whole. Parts are joined with a space and
/// repeated parts are dropped. Lines that normalize to nothing (rules,
/// bullets, ornaments) never start a title.
pub fn infer_title(lines: &[LineRecord]) -> Option<InferredTitle> {
    let (start, size) = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.page() == 1 && !normalize_text(l.text()).is_empty())
        .fold(None, |best: Option<(usize, FontSize)>, (idx, line)| match best {
            Some((_, size)) if line.font_size() <= size => best,
            _ => Some((idx, line.font_size())),
        })?;

    let mut parts: Vec<String> = Vec::new();
    let mut line_indices = Vec::new();
    for (idx, line) in lines.iter().enumerate().skip(start) {
        if line.page() != 1 || line.font_size() != size {
            break;
        }
        line_indices.push(idx);
        let text = normalize_text(line.text());
        if !text.is_empty() && !parts.contains(&text) {
            parts.push(text);
        }
    }

    Some(InferredTitle {
        text: parts.join(" "),
        line_indices,
    })
}
