//! EXTH (extended header) record list.
//!
//! The block follows the MOBI header in record 0:
//!
//! ```text
//! "EXTH" | u32 length | u32 count | count x (u32 type | u32 size | payload)
//! ```
//!
//! `size` includes the 8-byte record header. Records are packed densely.

use tracing::debug;

use crate::error::{Error, Result};
use crate::io::ByteCursor;
use crate::metadata::MetadataMap;

use super::headers::{Encoding, NULL_INDEX};
use super::patterns::AUTHOR_SORT_RE;
use super::registry::{self, ExthField, ValueKind};

const EXTH_PROLOGUE_LEN: usize = 12;
const RECORD_HEADER_LEN: usize = 8;

/// One raw EXTH record, borrowing its payload from record 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExthRecord<'a> {
    pub type_id: u32,
    pub payload: &'a [u8],
}

impl ExthRecord<'_> {
    /// Registry entry for this record type, if known.
    pub fn field(&self) -> Option<&'static ExthField> {
        registry::lookup(self.type_id)
    }

    /// Payload read as a big-endian u32.
    pub fn u32_value(&self) -> Option<u32> {
        ByteCursor::new(self.payload).u32_at(0)
    }

    fn ascii(&self) -> Option<&str> {
        std::str::from_utf8(self.payload)
            .ok()
            .filter(|s| s.is_ascii())
            .map(clean)
            .filter(|s| !s.is_empty())
    }
}

/// Typed view of the EXTH records that drive format detection and layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExthInfo {
    /// Updated title (503).
    pub title: Option<String>,
    pub kf8_header_index: Option<u32>,
    pub start_offset: Option<u32>,
    pub cover_offset: Option<u32>,
    pub thumbnail_offset: Option<u32>,
    pub has_fake_cover: bool,
    pub cdetype: Option<String>,
    pub primary_writing_mode: Option<String>,
    pub page_progression_direction: Option<String>,
    pub asin: Option<String>,
}

impl Default for ExthInfo {
    fn default() -> Self {
        Self {
            title: None,
            kf8_header_index: None,
            start_offset: None,
            cover_offset: None,
            thumbnail_offset: None,
            has_fake_cover: true,
            cdetype: None,
            primary_writing_mode: None,
            page_progression_direction: None,
            asin: None,
        }
    }
}

/// Parsed EXTH block.
#[derive(Debug, Clone)]
pub struct ExthHeader<'a> {
    /// Total length declared in the prologue.
    pub declared_length: u32,
    /// Record count declared in the prologue.
    pub declared_count: u32,
    /// Records in file order, up to the first corrupt one.
    pub records: Vec<ExthRecord<'a>>,
    /// False when iteration stopped before `declared_count` records.
    pub complete: bool,
}

impl<'a> ExthHeader<'a> {
    /// Parse the EXTH block at the start of `data`.
    ///
    /// A missing `EXTH` tag is a structural error. A record whose size is
    /// below 8 or runs past the end of the block ends iteration; records
    /// already read are kept.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < EXTH_PROLOGUE_LEN || &data[0..4] != b"EXTH" {
            return Err(Error::HeaderMissing("EXTH tag not found".into()));
        }

        let mut cursor = ByteCursor::at(data, 4);
        let declared_length = cursor.read_u32()?;
        let declared_count = cursor.read_u32()?;

        let region_end = if (declared_length as usize) < EXTH_PROLOGUE_LEN {
            data.len()
        } else {
            (declared_length as usize).min(data.len())
        };

        let mut records = Vec::new();
        let mut complete = true;
        for index in 0..declared_count {
            let pos = cursor.position();
            let Some(header) = data.get(pos..region_end).filter(|r| r.len() >= RECORD_HEADER_LEN)
            else {
                debug!(index, declared_count, "EXTH block ends before declared count");
                complete = false;
                break;
            };
            let header = ByteCursor::new(header);
            let (Some(type_id), Some(size)) = (header.u32_at(0), header.u32_at(4)) else {
                complete = false;
                break;
            };

            let size = size as usize;
            if size < RECORD_HEADER_LEN || size > region_end - pos {
                debug!(index, type_id, size, "corrupt EXTH record size, stopping");
                complete = false;
                break;
            }

            let payload = &data[pos + RECORD_HEADER_LEN..pos + size];
            records.push(ExthRecord { type_id, payload });
            cursor.seek(std::io::SeekFrom::Start((pos + size) as u64))?;
        }

        Ok(Self {
            declared_length,
            declared_count,
            records,
            complete,
        })
    }

    /// KF8 boundary record index (121), with the sentinel mapped to `None`.
    pub fn kf8_header_index(&self) -> Option<u32> {
        self.records
            .iter()
            .rev()
            .find(|r| r.type_id == 121)
            .and_then(ExthRecord::u32_value)
            .filter(|&idx| idx != NULL_INDEX)
    }

    /// Decode every record into `meta`, text in `encoding`.
    ///
    /// Records that fail to decode under their expected type are logged and
    /// skipped.
    pub fn decode(&self, encoding: Encoding, meta: &mut MetadataMap) -> ExthInfo {
        let mut info = ExthInfo::default();
        let mut author_sort = Vec::new();

        for record in &self.records {
            if decode_record(record, encoding, meta, &mut info, &mut author_sort).is_none() {
                debug!(
                    type_id = record.type_id,
                    len = record.payload.len(),
                    "skipping undecodable EXTH record"
                );
            }
        }

        if !author_sort.is_empty() {
            meta.set("author_sort", author_sort.join(" & "));
        }
        info
    }
}

fn clean(s: &str) -> &str {
    s.trim_matches(|c: char| c == '\0' || c.is_whitespace())
}

fn lossy_text(encoding: Encoding, payload: &[u8]) -> Option<String> {
    let text = encoding.decode_lossy(payload);
    let text = clean(&text);
    (!text.is_empty()).then(|| text.to_string())
}

fn strict_text(encoding: Encoding, payload: &[u8]) -> Option<String> {
    let text = encoding.decode_strict(payload)?;
    let text = clean(&text);
    (!text.is_empty()).then(|| text.to_string())
}

/// Returns `None` when the record could not be decoded.
fn decode_record(
    record: &ExthRecord<'_>,
    encoding: Encoding,
    meta: &mut MetadataMap,
    info: &mut ExthInfo,
    author_sort: &mut Vec<String>,
) -> Option<()> {
    let payload = record.payload;
    match record.type_id {
        100 => {
            let author = lossy_text(encoding, payload)?;
            if let Some(caps) = AUTHOR_SORT_RE.captures(&author) {
                author_sort.push(format!("{}, {}", &caps[1], &caps[2]));
            }
            meta.add("author", author);
        }
        101 => {
            let publisher = lossy_text(encoding, payload)?;
            if publisher != "Unknown" {
                meta.set("publisher", publisher);
            }
        }
        103 => meta.set("description", lossy_text(encoding, payload)?),
        104 => {
            let isbn = lossy_text(encoding, payload)?.replace('-', "");
            if !isbn.is_empty() {
                meta.set("isbn", isbn);
            }
        }
        105 => {
            let text = lossy_text(encoding, payload)?;
            for subject in text.split(';').map(str::trim).filter(|s| !s.is_empty()) {
                meta.add("subject", subject);
            }
        }
        106 => meta.set("pubdate", lossy_text(encoding, payload)?),
        108 => meta.set("book_producer", lossy_text(encoding, payload)?),
        109 => meta.set("rights", lossy_text(encoding, payload)?),
        112 => {
            let source = lossy_text(encoding, payload)?;
            let lower = source.to_ascii_lowercase();
            if lower.starts_with("urn:isbn:") {
                if let Some(isbn) = source.get(9..).map(str::trim).filter(|s| !s.is_empty()) {
                    meta.set_if_absent("isbn", isbn);
                }
            } else if source.starts_with("calibre:")
                && let Some(uuid) = source.get(8..).map(str::trim).filter(|s| !s.is_empty())
            {
                meta.set("uuid", uuid);
                meta.set("application_id", uuid);
            }
            meta.add("source", source);
        }
        113 => {
            let asin = record.ascii()?.to_string();
            meta.set("mobi-asin", asin.as_str());
            info.asin = Some(asin);
        }
        116 => {
            let offset = record.u32_value()?;
            meta.set("start_reading", offset.to_string());
            info.start_offset = Some(offset);
        }
        121 => {
            let index = record.u32_value()?;
            if index != NULL_INDEX {
                meta.set("kf8_header_index", index.to_string());
                info.kf8_header_index = Some(index);
            } else {
                meta.remove("kf8_header_index");
                info.kf8_header_index = None;
            }
        }
        201 | 202 => {
            let offset = record.u32_value().filter(|&v| v < NULL_INDEX)?;
            if record.type_id == 201 {
                meta.set("cover_offset", offset.to_string());
                info.cover_offset = Some(offset);
            } else {
                meta.set("thumbnail_offset", offset.to_string());
                info.thumbnail_offset = Some(offset);
            }
        }
        203 => {
            let fake = record.u32_value()? != 0;
            meta.set("has_fake_cover", if fake { "true" } else { "false" });
            info.has_fake_cover = fake;
        }
        501 => {
            let cdetype = record.ascii()?.to_string();
            if cdetype == "EBSP" {
                meta.add("subject", "Sample Book");
            }
            meta.set("cdetype", cdetype.as_str());
            info.cdetype = Some(cdetype);
        }
        503 => {
            let title = lossy_text(encoding, payload)?;
            meta.set("title", title.as_str());
            info.title = Some(title);
        }
        504 => {
            let key = lossy_text(encoding, payload)?;
            if meta.set_if_absent("mobi-asin", key.as_str()) {
                info.asin = Some(key.clone());
            }
            meta.add("cde_content_key", key);
        }
        524 => meta.set("language", strict_text(encoding, payload)?),
        525 => {
            let mode = strict_text(encoding, payload)?;
            meta.set("primary_writing_mode", mode.as_str());
            info.primary_writing_mode = Some(mode);
        }
        527 => {
            let direction = strict_text(encoding, payload)?;
            meta.set("page_progression_direction", direction.as_str());
            info.page_progression_direction = Some(direction);
        }
        type_id => match record.field() {
            Some(field) => {
                let value = match field.kind {
                    ValueKind::Text => lossy_text(encoding, payload)?,
                    ValueKind::Number => record.u32_value()?.to_string(),
                    ValueKind::Hex => hex::encode(payload),
                };
                meta.add(field.name, value);
            }
            None => {
                if payload.is_empty() {
                    return None;
                }
                let value =
                    strict_text(encoding, payload).unwrap_or_else(|| hex::encode(payload));
                meta.add(type_id.to_string(), value);
            }
        },
    }
    Some(())
}
