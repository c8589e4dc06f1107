use std::io::{self, Write};

use crate::metadata::MetadataMap;

use super::Exporter;

/// Writes one CSV row per book.
///
/// The header is the union of field names in first-seen order. Missing
/// fields are blank and only the first value of a field is written.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }
}

/// Union of field names across `books`, in first-seen order.
fn header(books: &[MetadataMap]) -> Vec<&str> {
    let mut fields: Vec<&str> = Vec::new();
    for key in books.iter().flat_map(MetadataMap::keys) {
        if !fields.contains(&key) {
            fields.push(key);
        }
    }
    fields
}

impl Exporter for CsvExporter {
    fn export<W: Write>(&self, books: &[MetadataMap], writer: &mut W) -> io::Result<()> {
        let fields = header(books);
        if fields.is_empty() {
            return Ok(());
        }
        let mut wtr = csv::Writer::from_writer(writer);

        wtr.write_record(&fields)?;
        for meta in books {
            wtr.write_record(fields.iter().map(|f| meta.first(f).unwrap_or("")))?;
        }
        wtr.flush()
    }
}
