//! Error types for bookmeta operations.

use thiserror::Error;

/// Errors that can occur while extracting ebook metadata.
///
/// Structural problems abort extraction for one file only. Per-field decode
/// problems never surface here; they are recovered in place with replacement
/// characters.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Not a PDB/MOBI container, truncated section table, or the EXTH block
    /// is flagged but cannot be located.
    #[error("Header missing: {0}")]
    HeaderMissing(String),

    /// A valid container that yielded no metadata at all.
    #[error("No metadata found: {0}")]
    MetadataAbsent(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid EPUB: {0}")]
    InvalidEpub(String),
}

impl Error {
    /// True for errors raised by the format dispatcher before any parsing.
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, Error::UnsupportedFormat(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
