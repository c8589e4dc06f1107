use std::borrow::Cow;

use tracing::debug;

use crate::io::ByteCursor;

use super::language;
use super::pdb::Identity;

pub const NULL_INDEX: u32 = 0xFFFFFFFF;

/// Title used when the header does not carry a usable one.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Bit in `exth_flags` announcing an EXTH block after the MOBI header.
pub const EXTH_FLAG: u32 = 0x40;

/// Offset of the MOBI header inside record 0 (after the PalmDoc header).
pub const MOBI_HEADER_OFFSET: usize = 16;

const MAX_HEADER_LENGTH: u32 = 500;

/// MOBI Header (Record 0)
#[derive(Debug, Clone)]
pub struct MobiHeader {
    pub compression: Compression,
    pub text_length: u32,
    pub text_record_count: u16,
    pub text_record_size: u16,
    pub encryption: u16,
    /// PalmDoc-only record 0 with no MOBI extension.
    pub ancient: bool,
    /// Repeats the identity ("MOBI" for BOOKMOBI files).
    pub doctype: String,
    pub header_length: u32,
    pub mobi_type: u32,
    pub codepage: u32,
    pub encoding: Encoding,
    pub unique_id: u32,
    pub mobi_version: u32,
    pub min_version: u32,
    pub first_image_index: u32,
    pub title: String,
    pub language_code: u32,
    pub exth_flags: u32,
    pub extra_data_flags: u16,
    // HUFF/CDIC indices (for Huffman compression)
    pub huff_record_index: u32,
    pub huff_record_count: u32,
    pub ncx_index: u32,
    // KF8 indices
    pub div_index: u32,
    pub skel_index: u32,
    pub datp_index: u32,
    pub oth_index: u32,
    pub fdst_index: u32,
    pub fdst_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    PalmDoc,
    Huffman,
    Unknown(u16),
}

impl Compression {
    fn from_raw(raw: u16) -> Self {
        match raw {
            1 => Compression::None,
            2 => Compression::PalmDoc,
            0x4448 => Compression::Huffman, // "DH"
            n => Compression::Unknown(n),
        }
    }

    pub fn name(self) -> Cow<'static, str> {
        match self {
            Compression::None => "none".into(),
            Compression::PalmDoc => "palmdoc".into(),
            Compression::Huffman => "huffcdic".into(),
            Compression::Unknown(n) => format!("unknown({n})").into(),
        }
    }
}

/// Text encoding declared by the header codepage.
///
/// Unknown codepages decode as Windows-1252.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Cp1252,
    Utf8,
    Unknown(u32),
}

impl Encoding {
    pub fn from_codepage(codepage: u32) -> Self {
        match codepage {
            1252 => Encoding::Cp1252,
            65001 => Encoding::Utf8,
            n => Encoding::Unknown(n),
        }
    }

    fn codec(self) -> &'static encoding_rs::Encoding {
        match self {
            Encoding::Utf8 => encoding_rs::UTF_8,
            Encoding::Cp1252 | Encoding::Unknown(_) => encoding_rs::WINDOWS_1252,
        }
    }

    /// Codec label used for the `codec` metadata field.
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Cp1252 | Encoding::Unknown(_) => "cp1252",
        }
    }

    /// Decode, substituting U+FFFD for undecodable sequences.
    pub fn decode_lossy(self, bytes: &[u8]) -> Cow<'_, str> {
        let (text, malformed) = self.codec().decode_without_bom_handling(bytes);
        if malformed {
            debug!(codec = self.name(), len = bytes.len(), "lossy text decode");
        }
        text
    }

    /// Decode, or `None` if any sequence is invalid in this codec.
    pub fn decode_strict(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        self.codec()
            .decode_without_bom_handling_and_without_replacement(bytes)
    }
}

impl MobiHeader {
    /// Decode record 0.
    ///
    /// Record 0 of 16 bytes or less is a bare PalmDoc header; defaults are
    /// synthesized for everything the MOBI extension would carry. Fields
    /// whose offsets fall outside a short record keep their defaults.
    pub fn parse(data: &[u8], identity: Identity) -> Self {
        let cursor = ByteCursor::new(data);
        let u32_or = |offset: usize, default: u32| cursor.u32_at(offset).unwrap_or(default);

        let compression = Compression::from_raw(cursor.u16_at(0).unwrap_or(1));
        let text_length = u32_or(4, 0);
        let text_record_count = cursor.u16_at(8).unwrap_or(0);
        let text_record_size = cursor.u16_at(10).unwrap_or(0);
        let encryption = cursor.u16_at(12).unwrap_or(0);

        if data.len() <= MOBI_HEADER_OFFSET {
            return Self {
                compression,
                text_length,
                text_record_count,
                text_record_size,
                encryption,
                ancient: true,
                doctype: String::new(),
                header_length: 0,
                mobi_type: 0,
                codepage: 1252,
                encoding: Encoding::Cp1252,
                unique_id: 0,
                mobi_version: 1,
                min_version: 1,
                first_image_index: NULL_INDEX,
                title: UNKNOWN_TITLE.to_string(),
                language_code: 0,
                exth_flags: 0,
                extra_data_flags: 0,
                huff_record_index: NULL_INDEX,
                huff_record_count: 0,
                ncx_index: NULL_INDEX,
                div_index: NULL_INDEX,
                skel_index: NULL_INDEX,
                datp_index: NULL_INDEX,
                oth_index: NULL_INDEX,
                fdst_index: NULL_INDEX,
                fdst_count: 0,
            };
        }

        let doctype = cursor
            .slice(0x10, 4)
            .map(|tag| String::from_utf8_lossy(tag).into_owned())
            .unwrap_or_default();
        let header_length = u32_or(0x14, 0);
        let mobi_type = u32_or(0x18, 0);
        let codepage = match identity {
            Identity::TextRead => 1252,
            Identity::BookMobi => u32_or(0x1C, 1252),
        };
        let encoding = Encoding::from_codepage(codepage);
        let unique_id = u32_or(0x20, 0);
        let mobi_version = u32_or(0x24, 1);

        let title = match (cursor.u32_at(0x54), cursor.u32_at(0x58)) {
            (Some(offset), Some(length)) => {
                match cursor.slice(offset as usize, length as usize) {
                    Some(raw) => encoding.decode_lossy(raw).into_owned(),
                    None => {
                        debug!(offset, length, record_len = data.len(), "title out of range");
                        UNKNOWN_TITLE.to_string()
                    }
                }
            }
            _ => UNKNOWN_TITLE.to_string(),
        };

        let language_code = u32_or(0x5C, 0);
        let min_version = u32_or(0x68, mobi_version);
        let first_image_index = u32_or(0x6C, NULL_INDEX);

        let (huff_record_index, huff_record_count) = match compression {
            Compression::Huffman => (u32_or(0x70, NULL_INDEX), u32_or(0x74, 0)),
            _ => (NULL_INDEX, 0),
        };

        let exth_flags = u32_or(0x80, 0);

        let extra_data_flags = if identity == Identity::BookMobi
            && (0xE4..=MAX_HEADER_LENGTH).contains(&header_length)
        {
            cursor.u16_at(0xF2).unwrap_or(0)
        } else {
            0
        };

        let ncx_index = if data.len() >= 0xF8 {
            u32_or(0xF4, NULL_INDEX)
        } else {
            NULL_INDEX
        };

        let (div_index, skel_index, datp_index, oth_index, fdst_index, fdst_count) =
            if mobi_version == 8 && data.len() >= 0xF8 + 16 {
                let fdst_count = u32_or(0xC4, 0);
                let fdst_index = if fdst_count <= 1 {
                    NULL_INDEX
                } else {
                    u32_or(0xC0, NULL_INDEX)
                };
                (
                    u32_or(0xF8, NULL_INDEX),
                    u32_or(0xFC, NULL_INDEX),
                    u32_or(0x100, NULL_INDEX),
                    u32_or(0x104, NULL_INDEX),
                    fdst_index,
                    fdst_count,
                )
            } else {
                (NULL_INDEX, NULL_INDEX, NULL_INDEX, NULL_INDEX, NULL_INDEX, 0)
            };

        Self {
            compression,
            text_length,
            text_record_count,
            text_record_size,
            encryption,
            ancient: false,
            doctype,
            header_length,
            mobi_type,
            codepage,
            encoding,
            unique_id,
            mobi_version,
            min_version,
            first_image_index,
            title,
            language_code,
            exth_flags,
            extra_data_flags,
            huff_record_index,
            huff_record_count,
            ncx_index,
            div_index,
            skel_index,
            datp_index,
            oth_index,
            fdst_index,
            fdst_count,
        }
    }

    pub fn has_exth(&self) -> bool {
        self.exth_flags & EXTH_FLAG != 0
    }

    /// Bytes following the MOBI header, where the EXTH block lives.
    pub fn exth_region<'a>(&self, record0: &'a [u8]) -> Option<&'a [u8]> {
        let start = MOBI_HEADER_OFFSET.checked_add(self.header_length as usize)?;
        record0.get(start..).filter(|rest| !rest.is_empty())
    }

    /// Version 8 header with a skeleton index: a standalone KF8 book.
    pub fn is_standalone_kf8(&self) -> bool {
        self.mobi_version == 8 && self.skel_index != NULL_INDEX
    }

    /// Language tag resolved from the packed header language code.
    pub fn language(&self) -> Option<&'static str> {
        language::language_from_code(self.language_code)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A record 0 carrying a 0xF8-byte MOBI header, followed by the title.
    pub(crate) fn build_record0(version: u32, codepage: u32, exth_flags: u32, title: &[u8]) -> Vec<u8> {
        let header_length = 0xF8u32;
        let title_offset = MOBI_HEADER_OFFSET as u32 + header_length;
        let mut data = vec![0u8; title_offset as usize];
        data[0..2].copy_from_slice(&2u16.to_be_bytes());
        data[0x10..0x14].copy_from_slice(b"MOBI");
        data[0x14..0x18].copy_from_slice(&header_length.to_be_bytes());
        data[0x18..0x1C].copy_from_slice(&2u32.to_be_bytes());
        data[0x1C..0x20].copy_from_slice(&codepage.to_be_bytes());
        data[0x20..0x24].copy_from_slice(&0x1234u32.to_be_bytes());
        data[0x24..0x28].copy_from_slice(&version.to_be_bytes());
        data[0x54..0x58].copy_from_slice(&title_offset.to_be_bytes());
        data[0x58..0x5C].copy_from_slice(&(title.len() as u32).to_be_bytes());
        data[0x5C..0x60].copy_from_slice(&(9u32 | (2 << 10)).to_be_bytes());
        data[0x68..0x6C].copy_from_slice(&version.to_be_bytes());
        data[0x80..0x84].copy_from_slice(&exth_flags.to_be_bytes());
        data[0xF4..0xF8].copy_from_slice(&NULL_INDEX.to_be_bytes());
        data[0xF8..0x108].fill(0xFF);
        data.extend_from_slice(title);
        data
    }

    /// Like [`build_record0`], with an EXTH block between header and title.
    pub(crate) fn build_record0_with_exth(version: u32, codepage: u32, exth: &[u8], title: &[u8]) -> Vec<u8> {
        let mut data = build_record0(version, codepage, EXTH_FLAG, b"");
        let title_offset = (data.len() + exth.len()) as u32;
        data[0x54..0x58].copy_from_slice(&title_offset.to_be_bytes());
        data[0x58..0x5C].copy_from_slice(&(title.len() as u32).to_be_bytes());
        data.extend_from_slice(exth);
        data.extend_from_slice(title);
        data
    }

    #[test]
    fn test_mobi_header_parse_minimal() {
        let mut data = vec![0u8; 16];
        data[0..2].copy_from_slice(&2u16.to_be_bytes()); // PalmDoc compression
        data[8..10].copy_from_slice(&10u16.to_be_bytes()); // text_record_count
        data[10..12].copy_from_slice(&4096u16.to_be_bytes()); // text_record_size

        let header = MobiHeader::parse(&data, Identity::BookMobi);
        assert!(header.ancient);
        assert_eq!(header.compression, Compression::PalmDoc);
        assert_eq!(header.text_record_count, 10);
        assert_eq!(header.text_record_size, 4096);
        assert_eq!(header.encoding, Encoding::Cp1252);
        assert_eq!(header.title, "Unknown");
        assert_eq!(header.mobi_version, 1);
        assert!(!header.has_exth());
    }

    #[test]
    fn test_mobi_header_tiny_record_does_not_panic() {
        let header = MobiHeader::parse(&[0, 2, 0], Identity::BookMobi);
        assert!(header.ancient);
        assert_eq!(header.title, "Unknown");
    }

    #[test]
    fn test_mobi_header_parse_fields() {
        let data = build_record0(6, 65001, EXTH_FLAG, "Tést".as_bytes());
        let header = MobiHeader::parse(&data, Identity::BookMobi);

        assert!(!header.ancient);
        assert_eq!(header.doctype, "MOBI");
        assert_eq!(header.header_length, 0xF8);
        assert_eq!(header.mobi_type, 2);
        assert_eq!(header.encoding, Encoding::Utf8);
        assert_eq!(header.unique_id, 0x1234);
        assert_eq!(header.mobi_version, 6);
        assert_eq!(header.title, "Tést");
        assert_eq!(header.language(), Some("en-gb"));
        assert!(header.has_exth());
        assert_eq!(header.ncx_index, NULL_INDEX);
        assert_eq!(header.skel_index, NULL_INDEX);
        assert!(!header.is_standalone_kf8());
    }

    #[test]
    fn test_mobi_header_unknown_codepage_falls_back() {
        let data = build_record0(6, 28591, 0, b"Caf\xE9");
        let header = MobiHeader::parse(&data, Identity::BookMobi);
        assert_eq!(header.encoding, Encoding::Unknown(28591));
        assert_eq!(header.encoding.name(), "cp1252");
        assert_eq!(header.title, "Café");
    }

    #[test]
    fn test_textread_forces_cp1252() {
        let data = build_record0(6, 65001, 0, b"Caf\xE9");
        let header = MobiHeader::parse(&data, Identity::TextRead);
        assert_eq!(header.encoding, Encoding::Cp1252);
        assert_eq!(header.title, "Café");
    }

    #[test]
    fn test_mobi_header_title_out_of_range() {
        let mut data = build_record0(6, 65001, 0, b"Title");
        data[0x58..0x5C].copy_from_slice(&10_000u32.to_be_bytes());
        let header = MobiHeader::parse(&data, Identity::BookMobi);
        assert_eq!(header.title, "Unknown");
    }

    #[test]
    fn test_mobi_header_invalid_utf8_title_is_replaced() {
        let data = build_record0(6, 65001, 0, b"Bad\xFFTitle");
        let header = MobiHeader::parse(&data, Identity::BookMobi);
        assert_eq!(header.title, "Bad\u{FFFD}Title");
    }

    #[test]
    fn test_mobi_header_huffman_compression() {
        let mut data = build_record0(6, 65001, 0, b"T");
        data[0..2].copy_from_slice(&0x4448u16.to_be_bytes()); // "DH" = Huffman
        data[0x70..0x74].copy_from_slice(&40u32.to_be_bytes());
        data[0x74..0x78].copy_from_slice(&3u32.to_be_bytes());

        let header = MobiHeader::parse(&data, Identity::BookMobi);
        assert_eq!(header.compression, Compression::Huffman);
        assert_eq!(header.huff_record_index, 40);
        assert_eq!(header.huff_record_count, 3);
    }

    #[test]
    fn test_kf8_indices() {
        let mut data = build_record0(8, 65001, 0, b"T");
        data[0xF8..0xFC].copy_from_slice(&5u32.to_be_bytes()); // div
        data[0xFC..0x100].copy_from_slice(&6u32.to_be_bytes()); // skel
        data[0x100..0x104].copy_from_slice(&7u32.to_be_bytes()); // datp
        data[0x104..0x108].copy_from_slice(&8u32.to_be_bytes()); // oth
        data[0xC0..0xC4].copy_from_slice(&20u32.to_be_bytes());
        data[0xC4..0xC8].copy_from_slice(&3u32.to_be_bytes());

        let header = MobiHeader::parse(&data, Identity::BookMobi);
        assert_eq!(header.div_index, 5);
        assert_eq!(header.skel_index, 6);
        assert_eq!(header.datp_index, 7);
        assert_eq!(header.oth_index, 8);
        assert_eq!(header.fdst_index, 20);
        assert!(header.is_standalone_kf8());
    }

    #[test]
    fn test_single_flow_fdst_is_absent() {
        let mut data = build_record0(8, 65001, 0, b"T");
        data[0xC0..0xC4].copy_from_slice(&20u32.to_be_bytes());
        data[0xC4..0xC8].copy_from_slice(&1u32.to_be_bytes());

        let header = MobiHeader::parse(&data, Identity::BookMobi);
        assert_eq!(header.fdst_index, NULL_INDEX);
    }

    #[test]
    fn test_kf8_indices_ignored_for_mobi6() {
        let mut data = build_record0(6, 65001, 0, b"T");
        data[0xFC..0x100].copy_from_slice(&6u32.to_be_bytes());
        let header = MobiHeader::parse(&data, Identity::BookMobi);
        assert_eq!(header.skel_index, NULL_INDEX);
    }

    #[test]
    fn test_exth_region() {
        let data = build_record0(6, 65001, EXTH_FLAG, b"Title");
        let header = MobiHeader::parse(&data, Identity::BookMobi);
        assert_eq!(header.exth_region(&data), Some(&b"Title"[..]));

        let mut short = data.clone();
        short.truncate(0xF8);
        assert_eq!(header.exth_region(&short), None);
    }

    #[test]
    fn test_decode_strict_rejects_invalid_utf8() {
        assert!(Encoding::Utf8.decode_strict(b"ok").is_some());
        assert!(Encoding::Utf8.decode_strict(b"\xFF").is_none());
        assert_eq!(Encoding::Cp1252.decode_strict(b"\xE9").as_deref(), Some("é"));
    }
}
