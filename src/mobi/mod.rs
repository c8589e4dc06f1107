//! MOBI-family (PalmDOC, MOBI6, KF8/AZW3, KFX) header decoding.
//!
//! Data flows one way: raw bytes → PDB section table → record 0 → MOBI
//! header + EXTH block → [`MetadataMap`](crate::MetadataMap).

mod exth;
mod headers;
mod language;
mod patterns;
mod pdb;
mod reader;
mod registry;

pub use exth::{ExthHeader, ExthInfo, ExthRecord};
pub use headers::{Compression, Encoding, MobiHeader, NULL_INDEX};
pub use language::{language_from_code, language_tag, unpack_language_code};
pub use pdb::{Identity, PdbHeader, SectionEntry};
pub use reader::{decode_mobi, read_mobi_metadata, KindleFormat, MobiDocument, RawContainer};
pub use registry::{lookup as lookup_exth_field, ExthField, ValueKind, EXTH_FIELDS};
