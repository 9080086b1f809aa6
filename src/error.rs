//! Error types for pdf-outline.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdf-outline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting an outline.
///
/// Conditions the pipeline can degrade around (no text, inconclusive
/// language detection, lines without a usable font size) are not errors;
/// they produce a smaller [`OutlineDocument`](crate::OutlineDocument).
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An output file or directory could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Output {
        /// Output path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The input is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF header announces a version we do not understand.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page content could not be read (strict mode only).
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Error serializing the outline.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether the input document could not be opened or parsed at all.
    ///
    /// Output, serialization and strict-mode page failures are not counted.
    pub fn is_unreadable(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::UnknownFormat
                | Error::UnsupportedVersion(_)
                | Error::PdfParse(_)
                | Error::Encrypted
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}
