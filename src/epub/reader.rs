use std::io::{Read, Seek};
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{Error, Result};
use crate::metadata::MetadataMap;
use crate::util::{decode_text, extract_xml_encoding};

use super::parser::{parse_container_xml, parse_opf_metadata, strip_bom};

const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Read the Dublin Core metadata of an EPUB file.
///
/// # Example
///
/// ```no_run
/// use bookmeta::read_epub_metadata;
///
/// let meta = read_epub_metadata("path/to/book.epub")?;
/// println!("Title: {:?}", meta.first("title"));
/// # Ok::<(), bookmeta::Error>(())
/// ```
pub fn read_epub_metadata<P: AsRef<Path>>(path: P) -> Result<MetadataMap> {
    let file = std::fs::File::open(path)?;
    read_epub_metadata_from_reader(file)
}

/// Read EPUB metadata from any [`Read`] + [`Seek`] source.
///
/// Fails with [`Error::MetadataAbsent`] when the archive has no OPF package
/// document.
pub fn read_epub_metadata_from_reader<R: Read + Seek>(reader: R) -> Result<MetadataMap> {
    let mut archive = ZipArchive::new(reader)?;

    let opf_path = find_opf_path(&mut archive)?
        .ok_or_else(|| Error::MetadataAbsent("no OPF package document in archive".into()))?;
    let opf = read_archive_text(&mut archive, &opf_path)?;
    parse_opf_metadata(&opf)
}

/// OPF path from container.xml, else the first `*.opf` entry.
fn find_opf_path<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Option<String>> {
    match read_archive_text(archive, CONTAINER_PATH) {
        Ok(container) => match parse_container_xml(&container) {
            Ok(path) if archive.index_for_name(&path).is_some() => return Ok(Some(path)),
            Ok(path) => debug!(%path, "rootfile listed in container.xml is missing"),
            Err(e) => debug!(error = %e, "unusable container.xml"),
        },
        Err(Error::Zip(ZipError::FileNotFound)) => debug!("no container.xml"),
        Err(e) => return Err(e),
    }

    Ok(archive
        .file_names()
        .find(|name| name.to_ascii_lowercase().ends_with(".opf"))
        .map(String::from))
}

fn read_archive_text<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive.by_name(path)?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)?;

    let bytes = strip_bom(&contents);
    Ok(decode_text(bytes, extract_xml_encoding(bytes)).into_owned())
}
