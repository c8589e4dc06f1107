//! EPUB metadata: container.xml → OPF → Dublin Core elements.

mod parser;
mod reader;

pub use parser::{DC_ELEMENTS, parse_container_xml, parse_opf_metadata};
pub use reader::{read_epub_metadata, read_epub_metadata_from_reader};

#[cfg(test)]
pub(crate) use reader::tests::{CONTAINER_XML, CONTENT_OPF, build_epub};
