//! # bookmeta
//!
//! Bibliographic metadata extraction for EPUB and the Kindle family of
//! ebook containers (MOBI6, KF8/AZW3, AZW, KFX).
//!
//! ## Features
//!
//! - Byte-exact decoding of the PDB section table, MOBI header and EXTH
//!   record list, including KF8 standalone/joint detection
//! - Full EXTH registry; unknown records are preserved under their numeric id
//! - Dublin Core metadata from the EPUB OPF package document
//! - Malformed input degrades to partial metadata or a typed error, never a panic
//!
//! ## Quick Start
//!
//! ```no_run
//! use bookmeta::read_metadata;
//!
//! let meta = read_metadata("book.azw3")?;
//! println!("{:?}", meta.get("author"));
//! # Ok::<(), bookmeta::Error>(())
//! ```
//!
//! ## Decoding bytes
//!
//! The MOBI decoder is a pure function of its input:
//!
//! ```no_run
//! let data = std::fs::read("book.mobi")?;
//! let meta = bookmeta::decode_mobi(&data)?;
//! for (field, value) in meta.finalize("; ") {
//!     println!("{field}: {value}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod book;
pub mod epub;
pub mod error;
pub mod export;
pub mod io;
pub mod metadata;
pub mod mobi;
pub(crate) mod util;

pub use book::{
    BatchEntry, Format, ReadOptions, path_metadata, read_batch, read_metadata, read_metadata_with,
};
pub use epub::read_epub_metadata;
pub use error::{Error, Result};
pub use metadata::{DEFAULT_JOIN_SEPARATOR, MetadataMap};
pub use mobi::{KindleFormat, MobiDocument, RawContainer, decode_mobi, read_mobi_metadata};
