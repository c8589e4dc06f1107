//! Plain-text table for terminal output.

use std::io::{self, Write};

use crate::metadata::{DEFAULT_JOIN_SEPARATOR, MetadataMap};

use super::Exporter;

/// Fields shown in the table, in display order.
pub const TABLE_FIELDS: &[&str] = &[
    "filename",
    "path",
    "extension",
    "size",
    "author",
    "title",
    "publisher",
    "creator",
    "language",
    "contributor",
    "date",
];

/// Writes one table per book.
#[derive(Debug, Clone)]
pub struct TextExporter {
    separator: String,
}

impl Default for TextExporter {
    fn default() -> Self {
        Self {
            separator: DEFAULT_JOIN_SEPARATOR.to_string(),
        }
    }
}

impl TextExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Separator for fields with several values.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

impl Exporter for TextExporter {
    fn export<W: Write>(&self, books: &[MetadataMap], writer: &mut W) -> io::Result<()> {
        for meta in books {
            writer.write_all(format_table(meta, &self.separator).as_bytes())?;
        }
        Ok(())
    }
}

/// Render the table fields present in `meta`.
///
/// Each line is the title-cased label, padding to the longest label, a tab
/// and the value. A dashed rule as wide as the longest line closes the block.
pub fn format_table(meta: &MetadataMap, separator: &str) -> String {
    let label_width = TABLE_FIELDS.iter().map(|f| f.len()).max().unwrap_or(0);

    let mut out = String::new();
    let mut longest_line = 0;
    for field in TABLE_FIELDS {
        let Some(value) = meta.joined(field, separator) else {
            continue;
        };
        let line = format!(
            "{}{}\t{}",
            title_case(field),
            " ".repeat(label_width - field.len()),
            value
        );
        longest_line = longest_line.max(line.chars().count());
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(&"-".repeat(longest_line));
    out.push('\n');
    out
}

fn title_case(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
