//! Export module for writing extracted metadata.
//!
//! Provides the `Exporter` trait and format-specific implementations:
//! a human-readable text table, plus JSON and CSV files (behind the `cli`
//! feature).
//!
//! # Example
//!
//! ```no_run
//! use bookmeta::export::{Exporter, TextExporter};
//!
//! let meta = bookmeta::read_metadata("book.mobi")?;
//! let mut out = std::io::stdout();
//! TextExporter::new().export(&[meta], &mut out)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::{self, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::metadata::MetadataMap;

#[cfg(feature = "cli")]
mod csv;
#[cfg(feature = "cli")]
mod json;
mod text;

#[cfg(feature = "cli")]
pub use self::csv::CsvExporter;
#[cfg(feature = "cli")]
pub use self::json::JsonExporter;
pub use self::text::{TABLE_FIELDS, TextExporter, format_table};

/// Trait for writing the metadata of a set of books.
///
/// The writer can be a `File`, `Vec<u8>`, stdout or anything else that
/// implements `Write`.
pub trait Exporter {
    fn export<W: Write>(&self, books: &[MetadataMap], writer: &mut W) -> io::Result<()>;
}

/// File format of an `--output` destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    /// Pick the format from the output path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(OutputFormat::Json),
            Some("csv") => Ok(OutputFormat::Csv),
            _ => Err(Error::UnsupportedFormat(format!(
                "output must be .json or .csv: {}",
                path.display()
            ))),
        }
    }
}
