//! # pdf-outline
//!
//! Title and heading outline extraction from PDF documents.
//!
//! Headings are inferred from font sizes: the most common size is taken as
//! body text, the largest other sizes become H1, H2 and H3, and a light
//! language check decides whether heading candidates must also look like
//! headings (numbered, or ending with a colon).
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_outline::{process, render};
//!
//! fn main() -> pdf_outline::Result<()> {
//!     let outline = process("report.pdf")?;
//!
//!     let json = render::to_json(&outline, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Output
//!
//! ```json
//! {
//!   "title": "Annual Report",
//!   "outline": [
//!     { "level": "H1", "text": "1. Introduction", "page": 1 }
//!   ]
//! }
//! ```

pub mod analysis;
pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use analysis::{
    infer_outline, FrequencyWeight, OutlineOptions, PolicyMode, TitleFallback,
};
pub use batch::{run_batch, BatchOptions, BatchReport};
pub use detect::{sniff_file, sniff_header, PdfHeader};
pub use error::{Error, Result};
pub use model::{FontSize, HeadingEntry, HeadingLevel, LineRecord, OutlineDocument};
pub use parser::{ErrorMode, ExtractOptions, LineExtractor, LopdfBackend, PdfBackend};
pub use render::JsonFormat;

use std::path::Path;

/// Extract the outline of a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::process;
///
/// let outline = process("report.pdf").unwrap();
/// println!("{} ({} headings)", outline.title, outline.len());
/// ```
pub fn process<P: AsRef<Path>>(path: P) -> Result<OutlineDocument> {
    process_with_options(path, &OutlineOptions::default())
}

/// Extract the outline of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::{process_with_options, OutlineOptions, PolicyMode, TitleFallback};
///
/// let options = OutlineOptions::new()
///     .with_policy(PolicyMode::SizeOnly)
///     .with_title_fallback(TitleFallback::MetadataThenFileStem);
/// let outline = process_with_options("report.pdf", &options).unwrap();
/// ```
pub fn process_with_options<P: AsRef<Path>>(
    path: P,
    options: &OutlineOptions,
) -> Result<OutlineDocument> {
    let path = path.as_ref();
    let header = sniff_file(path)?;
    log::debug!("{}: {}", path.display(), header);

    let backend = LopdfBackend::load_file(path)?;
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned());
    outline_from_backend(&backend, options, stem.as_deref())
}

/// Extract the outline of a PDF held in memory.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::process_bytes;
///
/// let data = std::fs::read("report.pdf").unwrap();
/// let outline = process_bytes(&data).unwrap();
/// ```
pub fn process_bytes(data: &[u8]) -> Result<OutlineDocument> {
    process_bytes_with_options(data, &OutlineOptions::default())
}

/// Extract the outline of a PDF held in memory with custom options.
///
/// There is no file name, so [`TitleFallback::MetadataThenFileStem`] stops
/// at the metadata title.
pub fn process_bytes_with_options(data: &[u8], options: &OutlineOptions) -> Result<OutlineDocument> {
    sniff_header(data)?;
    let backend = LopdfBackend::load_bytes(data)?;
    outline_from_backend(&backend, options, None)
}

/// Extract the text lines of a PDF file without inferring an outline.
pub fn extract_lines<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<Vec<LineRecord>> {
    let path = path.as_ref();
    sniff_file(path)?;
    let backend = LopdfBackend::load_file(path)?;
    LineExtractor::with_options(&backend, options.clone()).extract()
}

/// Run the full pipeline over an opened document.
///
/// `file_stem` is the last resort for the title when the title fallback is
/// enabled.
pub fn outline_from_backend<B: PdfBackend + ?Sized>(
    backend: &B,
    options: &OutlineOptions,
    file_stem: Option<&str>,
) -> Result<OutlineDocument> {
    let lines = LineExtractor::with_options(backend, options.extract.clone()).extract()?;
    log::debug!("Extracted {} lines", lines.len());

    let mut outline = infer_outline(&lines, options);

    if outline.title.is_empty() && options.title_fallback == TitleFallback::MetadataThenFileStem {
        outline.title = backend
            .info_title()
            .map(|t| analysis::normalize_text(&t))
            .filter(|t| !t.is_empty())
            .or_else(|| file_stem.map(str::to_string))
            .unwrap_or_default();
    }

    log::info!(
        "Outline ready: {:?} with {} headings",
        outline.title,
        outline.len()
    );
    Ok(outline)
}

/// Builder for outline extraction.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::OutlineExtractor;
///
/// let outline = OutlineExtractor::new()
///     .size_only()
///     .with_max_levels(2)
///     .strict()
///     .process("report.pdf")?;
/// # Ok::<(), pdf_outline::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor {
    options: OutlineOptions,
}

impl OutlineExtractor {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Always require numbering or a trailing colon.
    pub fn english_cues(mut self) -> Self {
        self.options = self.options.with_policy(PolicyMode::EnglishCues);
        self
    }

    /// Accept heading candidates on size alone.
    pub fn size_only(mut self) -> Self {
        self.options = self.options.with_policy(PolicyMode::SizeOnly);
        self
    }

    /// Set the policy mode.
    pub fn with_policy(mut self, policy: PolicyMode) -> Self {
        self.options = self.options.with_policy(policy);
        self
    }

    /// Set histogram weighting.
    pub fn with_weight(mut self, weight: FrequencyWeight) -> Self {
        self.options = self.options.with_weight(weight);
        self
    }

    /// Fall back to the metadata title, then the file name.
    pub fn with_title_fallback(mut self) -> Self {
        self.options = self
            .options
            .with_title_fallback(TitleFallback::MetadataThenFileStem);
        self
    }

    /// Limit the number of heading levels.
    pub fn with_max_levels(mut self, levels: u8) -> Self {
        self.options = self.options.with_max_levels(levels);
        self
    }

    /// Only read the first `pages` pages.
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.options.extract = self.options.extract.with_max_pages(pages);
        self
    }

    /// Fail on unreadable page content instead of skipping the page.
    pub fn strict(mut self) -> Self {
        self.options.extract = self.options.extract.strict();
        self
    }

    /// The accumulated options.
    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Extract the outline of a PDF file.
    pub fn process<P: AsRef<Path>>(&self, path: P) -> Result<OutlineDocument> {
        process_with_options(path, &self.options)
    }

    /// Extract the outline of a PDF held in memory.
    pub fn process_bytes(&self, data: &[u8]) -> Result<OutlineDocument> {
        process_bytes_with_options(data, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ContentOp, PageId};
    use std::collections::BTreeMap;

    #[test]
    fn test_builder_chained() {
        let builder = OutlineExtractor::new()
            .size_only()
            .with_weight(FrequencyWeight::Words)
            .with_title_fallback()
            .with_max_levels(2)
            .with_max_pages(10)
            .strict();

        let options = builder.options();
        assert_eq!(options.policy, PolicyMode::SizeOnly);
        assert_eq!(options.weight, FrequencyWeight::Words);
        assert_eq!(options.title_fallback, TitleFallback::MetadataThenFileStem);
        assert_eq!(options.max_levels, 2);
        assert_eq!(options.extract.max_pages, Some(10));
        assert_eq!(options.extract.error_mode, ErrorMode::Strict);
    }

    #[test]
    fn test_builder_default() {
        let builder = OutlineExtractor::default();
        assert_eq!(builder.options(), &OutlineOptions::default());
        assert_eq!(builder.options().max_levels, 3);
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_process_bytes_empty_data() {
        let result = process_bytes(&[]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_process_bytes_unknown_magic() {
        let result = process_bytes(b"<!DOCTYPE html><html></html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_process_bytes_header_only() {
        let result = process_bytes(b"%PDF-1.7\n%%EOF");
        assert!(result.is_err());
        assert!(result.unwrap_err().is_unreadable());
    }

    #[test]
    fn test_process_missing_file() {
        let result = process("definitely/not/here.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    /// Backend with no pages and an optional metadata title.
    struct EmptyBackend {
        title: Option<String>,
    }

    impl PdfBackend for EmptyBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::new()
        }

        fn page_content(&self, _page: PageId) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }

        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>> {
            Ok(Vec::new())
        }

        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            String::from_utf8_lossy(bytes).into_owned()
        }

        fn info_title(&self) -> Option<String> {
            self.title.clone()
        }
    }

    #[test]
    fn test_empty_document_keeps_empty_title_by_default() {
        let backend = EmptyBackend {
            title: Some("Metadata Title".to_string()),
        };
        let outline =
            outline_from_backend(&backend, &OutlineOptions::default(), Some("file")).unwrap();
        assert_eq!(outline, OutlineDocument::default());
    }

    #[test]
    fn test_title_fallback_prefers_metadata_then_stem() {
        let options = OutlineOptions::new().with_title_fallback(TitleFallback::MetadataThenFileStem);

        let with_meta = EmptyBackend {
            title: Some("  Metadata Title ".to_string()),
        };
        let outline = outline_from_backend(&with_meta, &options, Some("file")).unwrap();
        assert_eq!(outline.title, "Metadata Title");

        let blank_meta = EmptyBackend {
            title: Some("   ".to_string()),
        };
        let outline = outline_from_backend(&blank_meta, &options, Some("file")).unwrap();
        assert_eq!(outline.title, "file");

        let nothing = EmptyBackend { title: None };
        let outline = outline_from_backend(&nothing, &options, None).unwrap();
        assert_eq!(outline.title, "");
    }
}
