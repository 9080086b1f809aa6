//! Extraction options.

/// Options for extracting lines from a PDF document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Error handling mode for unreadable page content
    pub error_mode: ErrorMode,

    /// Stop after this many pages (None = all pages)
    pub max_pages: Option<u32>,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail the document when a page's content cannot be read.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Limit extraction to the first `pages` pages.
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.max_pages = Some(pages);
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            max_pages: None,
        }
    }
}

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any unreadable page
    Strict,
    /// Skip unreadable pages and continue
    #[default]
    Lenient,
}
