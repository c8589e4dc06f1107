use std::io::{self, Write};

use crate::metadata::MetadataMap;

use super::Exporter;

/// Writes a JSON array with one object per book.
///
/// Fields keep their extraction order. A single value is a string, several
/// values are an array.
#[derive(Debug, Clone, Default)]
pub struct JsonExporter {
    pretty: bool,
}

impl JsonExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, books: &[MetadataMap], writer: &mut W) -> io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, books)?;
        } else {
            serde_json::to_writer(&mut *writer, books)?;
        }
        writer.write_all(b"\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_array_of_objects() {
        let books: Vec<MetadataMap> = vec![
            [("title", "One"), ("subject", "A"), ("subject", "B")]
                .into_iter()
                .collect(),
            [("title", "Two")].into_iter().collect(),
        ];
        let mut out = Vec::new();
        JsonExporter::new().export(&books, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "[{\"title\":\"One\",\"subject\":[\"A\",\"B\"]},{\"title\":\"Two\"}]\n"
        );
    }

    #[test]
    fn test_pretty_output_parses_back() {
        let books: Vec<MetadataMap> = vec![[("title", "One")].into_iter().collect()];
        let mut out = Vec::new();
        JsonExporter::new().pretty(true).export(&books, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["title"], "One");
    }
}
