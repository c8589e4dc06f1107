//! Synthetic ebook builders shared by the integration tests.
#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const MOBI_HEADER_LEN: usize = 0xF8;

/// EXTH block from `(type, payload)` pairs.
pub fn exth(records: &[(u32, &[u8])]) -> Vec<u8> {
    let body: usize = records.iter().map(|(_, p)| p.len() + 8).sum();
    let mut data = b"EXTH".to_vec();
    data.extend_from_slice(&((body + 12) as u32).to_be_bytes());
    data.extend_from_slice(&(records.len() as u32).to_be_bytes());
    for (type_id, payload) in records {
        data.extend_from_slice(&type_id.to_be_bytes());
        data.extend_from_slice(&((payload.len() + 8) as u32).to_be_bytes());
        data.extend_from_slice(payload);
    }
    data
}

/// Record 0: PalmDoc header, UTF-8 MOBI header, optional EXTH, title.
pub fn record0(version: u32, exth: Option<&[u8]>, title: &str) -> Vec<u8> {
    let mut data = vec![0u8; 16 + MOBI_HEADER_LEN];
    data[0..2].copy_from_slice(&2u16.to_be_bytes());
    data[0x10..0x14].copy_from_slice(b"MOBI");
    data[0x14..0x18].copy_from_slice(&(MOBI_HEADER_LEN as u32).to_be_bytes());
    data[0x18..0x1C].copy_from_slice(&2u32.to_be_bytes());
    data[0x1C..0x20].copy_from_slice(&65001u32.to_be_bytes());
    data[0x20..0x24].copy_from_slice(&7u32.to_be_bytes());
    data[0x24..0x28].copy_from_slice(&version.to_be_bytes());
    data[0x5C..0x60].copy_from_slice(&9u32.to_be_bytes());
    data[0xF4..0x108].fill(0xFF);

    if let Some(exth) = exth {
        data[0x80..0x84].copy_from_slice(&0x40u32.to_be_bytes());
        data.extend_from_slice(exth);
    }
    let title_offset = data.len() as u32;
    data[0x54..0x58].copy_from_slice(&title_offset.to_be_bytes());
    data[0x58..0x5C].copy_from_slice(&(title.len() as u32).to_be_bytes());
    data.extend_from_slice(title.as_bytes());
    data
}

/// PDB container around `sections`.
pub fn pdb(sections: &[&[u8]]) -> Vec<u8> {
    let mut data = vec![0u8; 78];
    data[..9].copy_from_slice(b"Test Book");
    data[60..68].copy_from_slice(b"BOOKMOBI");
    data[76..78].copy_from_slice(&(sections.len() as u16).to_be_bytes());

    let mut offset = 78 + sections.len() * 8;
    for section in sections {
        data.extend_from_slice(&(offset as u32).to_be_bytes());
        data.extend_from_slice(&[0; 4]);
        offset += section.len();
    }
    for section in sections {
        data.extend_from_slice(section);
    }
    data
}

/// Complete MOBI6 file with the given EXTH records.
pub fn mobi(records: &[(u32, &[u8])], title: &str) -> Vec<u8> {
    let exth = exth(records);
    pdb(&[&record0(6, Some(&exth), title), b"text record"])
}

/// EPUB archive with a container.xml pointing at `OEBPS/content.opf`.
pub fn epub(opf: &str) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("mimetype", stored).unwrap();
    zip.write_all(b"application/epub+zip").unwrap();
    zip.start_file("META-INF/container.xml", deflated).unwrap();
    zip.write_all(
        br#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#,
    )
    .unwrap();
    zip.start_file("OEBPS/content.opf", deflated).unwrap();
    zip.write_all(opf.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

pub fn opf(title: &str, creator: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>{title}</dc:title>
    <dc:creator>{creator}</dc:creator>
    <dc:language>en</dc:language>
    <dc:date>2001-01-01</dc:date>
  </metadata>
</package>"#
    )
}

/// Write `data` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}
