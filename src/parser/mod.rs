//! PDF parsing module.

pub mod backend;
mod extractor;
mod options;

pub use backend::{ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue};
pub use extractor::LineExtractor;
pub use options::{ErrorMode, ExtractOptions};
