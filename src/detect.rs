//! PDF header sniffing.
//!
//! Rejects non-PDF input before the backend spends time on it. Writers are
//! allowed to put junk before the `%PDF-` marker, so the marker is searched
//! for in the first kilobyte rather than required at offset zero.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Information read from a PDF header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfHeader {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
    /// Byte offset of the `%PDF-` marker
    pub offset: usize,
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Sniff the PDF header of a file on disk.
pub fn sniff_file<P: AsRef<Path>>(path: P) -> Result<PdfHeader> {
    let file = File::open(path)?;
    let mut head = Vec::with_capacity(HEADER_SEARCH_WINDOW);
    file.take(HEADER_SEARCH_WINDOW as u64)
        .read_to_end(&mut head)?;
    sniff_header(&head)
}

/// Sniff the PDF header from the leading bytes of a document.
///
/// Returns [`Error::UnknownFormat`] when no marker is found in the first
/// kilobyte, and [`Error::UnsupportedVersion`] when the marker is followed by
/// something that is not a `major.minor` version.
pub fn sniff_header(data: &[u8]) -> Result<PdfHeader> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    let offset = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let start = offset + PDF_MAGIC.len();
    let version_bytes = data
        .get(start..start + VERSION_LEN)
        .ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_known_version(version_bytes) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfHeader { version, offset })
}

/// Versions 1.0 through 2.x.
fn is_known_version(v: &[u8]) -> bool {
    matches!(v, [major @ (b'1' | b'2'), b'.', minor] if minor.is_ascii_digit() && (*major == b'1' || *minor == b'0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_valid_header() {
        let header = sniff_header(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap();
        assert_eq!(header.version, "1.7");
        assert_eq!(header.offset, 0);
        assert_eq!(header.to_string(), "PDF 1.7");
    }

    #[test]
    fn test_sniff_pdf_2_0() {
        let header = sniff_header(b"%PDF-2.0\n").unwrap();
        assert_eq!(header.version, "2.0");
    }

    #[test]
    fn test_sniff_leading_garbage() {
        let header = sniff_header(b"\x00\x01junk%PDF-1.4\n").unwrap();
        assert_eq!(header.version, "1.4");
        assert_eq!(header.offset, 6);
    }

    #[test]
    fn test_sniff_not_pdf() {
        assert!(matches!(
            sniff_header(b"<!DOCTYPE html>"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(sniff_header(b""), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_sniff_truncated_version() {
        assert!(matches!(sniff_header(b"%PDF-1"), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_sniff_unsupported_version() {
        assert!(matches!(
            sniff_header(b"%PDF-3.1\n"),
            Err(Error::UnsupportedVersion(v)) if v == "3.1"
        ));
        assert!(matches!(
            sniff_header(b"%PDF-x.y\n"),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_known_versions() {
        assert!(is_known_version(b"1.0"));
        assert!(is_known_version(b"1.7"));
        assert!(is_known_version(b"2.0"));
        assert!(!is_known_version(b"2.1"));
        assert!(!is_known_version(b"0.9"));
    }
}
