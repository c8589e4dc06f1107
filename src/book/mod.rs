//! Format dispatch, path metadata and batch reading.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::epub::read_epub_metadata;
use crate::error::{Error, Result};
use crate::metadata::{DEFAULT_JOIN_SEPARATOR, MetadataMap};
use crate::mobi::read_mobi_metadata;

/// Container family, chosen from the file extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.mobi`, `.azw`, `.azw3`, `.kfx`
    Mobi,
    /// `.epub`
    Epub,
}

impl Format {
    /// Match an extension (without the dot), ignoring ASCII case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mobi" | "azw" | "azw3" | "kfx" => Some(Format::Mobi),
            "epub" => Some(Format::Epub),
            _ => None,
        }
    }

    /// Select the handler for `path`. Never touches the file.
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))
    }
}

/// Options for [`read_metadata_with`].
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Separator used when multi-valued fields are collapsed for output.
    pub join_separator: String,
    /// Append `filename`, `path`, `extension` and `size`.
    pub include_path_metadata: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            join_separator: DEFAULT_JOIN_SEPARATOR.to_string(),
            include_path_metadata: true,
        }
    }
}

impl ReadOptions {
    /// Collapse `meta` into `(field, value)` pairs using the configured separator.
    pub fn finalize(&self, meta: &MetadataMap) -> Vec<(String, String)> {
        meta.finalize(&self.join_separator)
    }
}

/// Read the metadata of one ebook with default options.
///
/// # Example
///
/// ```no_run
/// let meta = bookmeta::read_metadata("book.azw3")?;
/// for (field, values) in meta.iter() {
///     println!("{field}: {}", values.join("; "));
/// }
/// # Ok::<(), bookmeta::Error>(())
/// ```
pub fn read_metadata<P: AsRef<Path>>(path: P) -> Result<MetadataMap> {
    read_metadata_with(path, &ReadOptions::default())
}

/// Read the metadata of one ebook.
///
/// Dispatches on the extension before any byte is read. A container that
/// decodes but yields no fields is [`Error::MetadataAbsent`]; callers that
/// still want the path fields can use [`path_metadata`]. MOBI files with a
/// record 0 always carry header fields (`uid`, `codec`, ...), so for them
/// this only happens when the file has fewer than two records.
pub fn read_metadata_with<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<MetadataMap> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    debug!(path = %path.display(), ?format, "reading metadata");

    let mut meta = match format {
        Format::Mobi => read_mobi_metadata(path)?,
        Format::Epub => read_epub_metadata(path)?,
    };

    if meta.is_empty() {
        return Err(Error::MetadataAbsent(path.display().to_string()));
    }

    if options.include_path_metadata {
        meta.merge(path_metadata(path)?);
    }
    Ok(meta)
}

/// File-level fields: `filename`, `path`, `extension` (with the dot), `size`.
pub fn path_metadata<P: AsRef<Path>>(path: P) -> Result<MetadataMap> {
    let path = path.as_ref();
    let size = std::fs::metadata(path)?.len();

    let mut meta = MetadataMap::new();
    meta.add(
        "filename",
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    );
    meta.add("path", path.display().to_string());
    meta.add(
        "extension",
        path.extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default(),
    );
    meta.add("size", size.to_string());
    Ok(meta)
}

/// Outcome for one file of a batch.
#[derive(Debug)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub result: Result<MetadataMap>,
}

/// Read many files in parallel.
///
/// Results come back in input order. A failure only affects its own entry.
pub fn read_batch<P>(paths: &[P], options: &ReadOptions) -> Vec<BatchEntry>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            let result = read_metadata_with(path, options);
            if let Err(e) = &result {
                warn!(path = %path.display(), error = %e, "skipping file");
            }
            BatchEntry {
                path: path.to_path_buf(),
                result,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_extension("mobi"), Some(Format::Mobi));
        assert_eq!(Format::from_extension("AZW3"), Some(Format::Mobi));
        assert_eq!(Format::from_extension("azw"), Some(Format::Mobi));
        assert_eq!(Format::from_extension("kfx"), Some(Format::Mobi));
        assert_eq!(Format::from_extension("Epub"), Some(Format::Epub));
        assert_eq!(Format::from_extension("pdf"), None);
    }

    #[test]
    fn test_unsupported_extension_is_not_read() {
        // The file does not exist; dispatch must fail before any I/O
        let err = read_metadata("/nonexistent/notes.txt").unwrap_err();
        assert!(err.is_unsupported_format());

        let err = read_metadata("/nonexistent/README").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_default_options() {
        let options = ReadOptions::default();
        assert_eq!(options.join_separator, "; ");
        assert!(options.include_path_metadata);
    }

    #[test]
    fn test_options_finalize_uses_separator() {
        let mut meta = MetadataMap::new();
        meta.add("author", "A");
        meta.add("author", "B");
        meta.add("author", "A");

        let options = ReadOptions {
            join_separator: " / ".to_string(),
            ..ReadOptions::default()
        };
        assert_eq!(
            options.finalize(&meta),
            vec![("author".to_string(), "A / B".to_string())]
        );
    }
}
