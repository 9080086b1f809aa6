//! Data model for outline extraction.
//!
//! [`LineRecord`]s are produced once at the extraction boundary and read by
//! every later stage; [`OutlineDocument`] is the only type that leaves the
//! pipeline.

mod line;
mod outline;

pub use line::{FontSize, LineRecord};
pub use outline::{HeadingEntry, HeadingLevel, OutlineDocument};
