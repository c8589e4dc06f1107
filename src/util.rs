//! Text decoding helpers shared by the MOBI and EPUB readers.

use std::borrow::Cow;

/// Decode an archive entry: UTF-8 first, then the declared XML encoding,
/// then Windows-1252. Valid UTF-8 is returned without copying.
pub fn decode_text<'a>(bytes: &'a [u8], declared: Option<&str>) -> Cow<'a, str> {
    let (text, _, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return text;
    }

    let fallback = declared
        .and_then(|label| encoding_rs::Encoding::for_label(label.as_bytes()))
        .unwrap_or(encoding_rs::WINDOWS_1252);
    fallback.decode(bytes).0
}

/// Value of `encoding="..."` in an XML declaration within the first 100 bytes.
pub fn extract_xml_encoding(bytes: &[u8]) -> Option<&str> {
    let head = &bytes[..bytes.len().min(100)];
    let decl = &head[memchr::memmem::find(head, b"<?xml")?..];

    let attr = decl
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?;
    let (&quote, rest) = decl[attr + 9..].split_first()?;
    if !matches!(quote, b'"' | b'\'') {
        return None;
    }

    let len = memchr::memchr(quote, rest)?;
    std::str::from_utf8(&rest[..len]).ok()
}

/// Replace each run of characters outside `[-A-Za-z0-9 ]` with `_`.
///
/// Used for the Palm database name, which is NUL padded and frequently
/// contains raw punctuation from the source file name.
pub fn sanitize_palm_name(raw: &[u8]) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_run = false;
    for &b in raw.iter().filter(|&&b| b != 0) {
        if b.is_ascii_alphanumeric() || b == b'-' || b == b' ' {
            out.push(b as char);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}
