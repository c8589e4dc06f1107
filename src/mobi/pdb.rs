//! Palm Database (PDB) header and section table.

use std::ops::Range;

use crate::error::{Error, Result};
use crate::io::ByteCursor;
use crate::util::sanitize_palm_name;

/// Fixed size of the PDB header, before the section table.
pub const PDB_HEADER_LEN: usize = 78;

const IDENTITY_OFFSET: usize = 60;
const RECORD_COUNT_OFFSET: usize = 76;
const SECTION_ENTRY_LEN: usize = 8;

/// Database type/creator tag at bytes 60..68.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// `BOOKMOBI`: MOBI6, KF8 and hybrid files.
    BookMobi,
    /// `TEXtREAd`: plain PalmDoc.
    TextRead,
}

impl Identity {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        if tag.eq_ignore_ascii_case(b"BOOKMOBI") {
            Some(Identity::BookMobi)
        } else if tag.eq_ignore_ascii_case(b"TEXTREAD") {
            Some(Identity::TextRead)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Identity::BookMobi => "BOOKMOBI",
            Identity::TextRead => "TEXTREAD",
        }
    }
}

/// One entry of the section table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionEntry {
    pub offset: u32,
    pub attributes: [u8; 4],
}

/// Parsed PDB header.
#[derive(Debug, Clone)]
pub struct PdbHeader {
    /// Database name, NUL padded.
    pub name: [u8; 32],
    pub identity: Identity,
    pub record_count: u16,
    pub sections: Vec<SectionEntry>,
}

impl PdbHeader {
    /// Parse the PDB header and its section table.
    ///
    /// Fails with [`Error::HeaderMissing`] when the buffer is shorter than
    /// the fixed header, the identity tag is not recognized, or the section
    /// table is truncated.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < PDB_HEADER_LEN {
            return Err(Error::HeaderMissing(format!(
                "PDB header too short ({} bytes)",
                data.len()
            )));
        }

        let mut cursor = ByteCursor::new(data);
        let name = cursor.read_array::<32>()?;

        let tag = &data[IDENTITY_OFFSET..IDENTITY_OFFSET + 8];
        let identity = Identity::from_tag(tag).ok_or_else(|| {
            Error::HeaderMissing(format!(
                "Unknown book type: {:?}",
                String::from_utf8_lossy(tag)
            ))
        })?;

        cursor.seek(std::io::SeekFrom::Start(RECORD_COUNT_OFFSET as u64))?;
        let record_count = cursor.read_u16()?;

        let table_end = PDB_HEADER_LEN + record_count as usize * SECTION_ENTRY_LEN;
        if data.len() < table_end {
            return Err(Error::HeaderMissing(format!(
                "PDB section table truncated: {record_count} records need {table_end} bytes, have {}",
                data.len()
            )));
        }

        let mut sections = Vec::with_capacity(record_count as usize);
        for _ in 0..record_count {
            let offset = cursor.read_u32()?;
            let attributes = cursor.read_array::<4>()?;
            sections.push(SectionEntry { offset, attributes });
        }

        Ok(Self {
            name,
            identity,
            record_count,
            sections,
        })
    }

    /// Database name up to the first NUL.
    pub fn database_name(&self) -> String {
        let end = memchr::memchr(0, &self.name).unwrap_or(self.name.len());
        String::from_utf8_lossy(&self.name[..end]).into_owned()
    }

    /// Database name with punctuation runs replaced by `_`.
    pub fn palm_name(&self) -> String {
        sanitize_palm_name(&self.name)
    }

    /// Whether record 0 can hold a MOBI header at all.
    pub fn has_mobi_header(&self) -> bool {
        self.record_count >= 2
    }

    /// Byte range of section `index`.
    ///
    /// Section i spans `[offset_i, offset_{i+1})`; the last section runs to
    /// end of file. Ranges are clamped to `file_len`; a section starting past
    /// the end or after its successor yields `None`.
    pub fn section_range(&self, index: usize, file_len: usize) -> Option<Range<usize>> {
        let start = self.sections.get(index)?.offset as usize;
        let end = match self.sections.get(index + 1) {
            Some(next) => (next.offset as usize).min(file_len),
            None => file_len,
        };
        (start <= end).then_some(start..end)
    }

    /// Bytes of section `index` within `data`.
    pub fn section<'a>(&self, index: usize, data: &'a [u8]) -> Option<&'a [u8]> {
        self.section_range(index, data.len())
            .and_then(|range| data.get(range))
    }
}
