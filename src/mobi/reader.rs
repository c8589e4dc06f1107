use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::metadata::MetadataMap;

use super::exth::{ExthHeader, ExthInfo};
use super::headers::MobiHeader;
use super::pdb::PdbHeader;

/// Container flavour of a BOOKMOBI file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindleFormat {
    /// Legacy MOBI6 (or PalmDoc) - single text stream
    Mobi6,
    /// Pure KF8 (AZW3) - version 8 header with a skeleton index
    Kf8Standalone,
    /// Hybrid file with a MOBI6 part followed by a BOUNDARY record and KF8
    Kf8Joint,
}

impl KindleFormat {
    pub fn is_kf8(self) -> bool {
        matches!(self, KindleFormat::Kf8Standalone | KindleFormat::Kf8Joint)
    }

    /// Value of the `kf8_type` field, `None` for MOBI6.
    pub fn kf8_type(self) -> Option<&'static str> {
        match self {
            KindleFormat::Mobi6 => None,
            KindleFormat::Kf8Standalone => Some("standalone"),
            KindleFormat::Kf8Joint => Some("joint"),
        }
    }
}

/// Full byte content of an ebook file.
#[derive(Debug, Clone)]
pub struct RawContainer {
    data: Vec<u8>,
}

impl RawContainer {
    /// Read the whole file into memory. The handle is closed on return.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            data: std::fs::read(path)?,
        })
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Decode the container's headers.
    pub fn document(&self) -> Result<MobiDocument<'_>> {
        MobiDocument::parse(&self.data)
    }
}

/// Decoded PDB, MOBI and EXTH headers of one file.
///
/// Borrows from the container; nothing here outlives the raw bytes.
#[derive(Debug, Clone)]
pub struct MobiDocument<'a> {
    data: &'a [u8],
    pub pdb: PdbHeader,
    /// `None` when the file has fewer than two records.
    pub header: Option<MobiHeader>,
    pub exth: Option<ExthHeader<'a>>,
}

impl<'a> MobiDocument<'a> {
    /// Parse the PDB table, record 0 and the EXTH block.
    ///
    /// Structural problems (unknown identity, truncated section table,
    /// unreadable record 0, EXTH flag set without an EXTH block) are errors.
    /// A file with fewer than two records parses to an identity-only document.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let pdb = PdbHeader::parse(data)?;

        if !pdb.has_mobi_header() {
            debug!(
                record_count = pdb.record_count,
                "no MOBI header region, identity only"
            );
            return Ok(Self {
                data,
                pdb,
                header: None,
                exth: None,
            });
        }

        let record0 = pdb
            .section(0, data)
            .ok_or_else(|| Error::HeaderMissing("record 0 is out of range".into()))?;
        let header = MobiHeader::parse(record0, pdb.identity);

        let exth = if header.has_exth() {
            let region = header.exth_region(record0).ok_or_else(|| {
                Error::HeaderMissing("EXTH flag set but record 0 ends at the MOBI header".into())
            })?;
            Some(ExthHeader::parse(region)?)
        } else {
            None
        };

        Ok(Self {
            data,
            pdb,
            header: Some(header),
            exth,
        })
    }

    /// Raw bytes of PDB section `index`.
    pub fn section(&self, index: usize) -> Option<&'a [u8]> {
        self.pdb.section(index, self.data)
    }

    /// Classify the file as MOBI6, standalone KF8 or joint MOBI6/KF8.
    pub fn format(&self) -> KindleFormat {
        let Some(header) = &self.header else {
            return KindleFormat::Mobi6;
        };
        if header.is_standalone_kf8() {
            return KindleFormat::Kf8Standalone;
        }

        let boundary = self
            .exth
            .as_ref()
            .and_then(ExthHeader::kf8_header_index)
            .and_then(|index| index.checked_sub(1))
            .and_then(|index| self.section(index as usize));
        if boundary == Some(b"BOUNDARY".as_slice()) {
            KindleFormat::Kf8Joint
        } else {
            KindleFormat::Mobi6
        }
    }

    /// Decode the metadata carried by the headers.
    ///
    /// Order: header title, EXTH fields (503 replaces the title), header
    /// language when EXTH has none, then header bookkeeping fields.
    /// Identity-only documents yield an empty map.
    pub fn metadata(&self) -> MetadataMap {
        self.metadata_with_info().0
    }

    /// Like [`metadata`](Self::metadata), also returning the typed EXTH view.
    pub fn metadata_with_info(&self) -> (MetadataMap, ExthInfo) {
        let mut meta = MetadataMap::new();
        let Some(header) = &self.header else {
            return (meta, ExthInfo::default());
        };

        meta.set("title", header.title.as_str());

        let info = match &self.exth {
            Some(exth) => exth.decode(header.encoding, &mut meta),
            None => ExthInfo::default(),
        };

        if !meta.contains("language")
            && let Some(tag) = header.language()
        {
            meta.set("language", tag);
        }

        meta.set("uid", header.unique_id.to_string());
        meta.set("mobi_version", header.mobi_version.to_string());
        meta.set("codec", header.encoding.name());
        meta.set("compression", header.compression.name());
        meta.set("encryption", header.encryption.to_string());
        if let Some(kf8_type) = self.format().kf8_type() {
            meta.set("kf8_type", kf8_type);
        }

        (meta, info)
    }
}

/// Decode metadata from the bytes of a MOBI-family file.
pub fn decode_mobi(data: &[u8]) -> Result<MetadataMap> {
    Ok(MobiDocument::parse(data)?.metadata())
}

/// Read a MOBI/AZW/AZW3/KFX file and decode its metadata.
pub fn read_mobi_metadata<P: AsRef<Path>>(path: P) -> Result<MetadataMap> {
    let container = RawContainer::open(path)?;
    Ok(container.document()?.metadata())
}
