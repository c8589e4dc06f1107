mod common;

use bookmeta::{Error, Format, ReadOptions, path_metadata, read_batch, read_metadata_with};
use tempfile::TempDir;

#[test]
fn test_unsupported_extension_never_reads_bytes() {
    let dir = TempDir::new().unwrap();
    // Valid MOBI bytes under the wrong extension
    let path = common::write_file(dir.path(), "book.txt", &common::mobi(&[], "T"));

    let err = read_metadata_with(&path, &ReadOptions::default()).unwrap_err();
    assert!(err.is_unsupported_format());
    assert!(matches!(Format::from_path(&path), Err(Error::UnsupportedFormat(_))));
}

#[test]
fn test_without_path_metadata() {
    let dir = TempDir::new().unwrap();
    let path = common::write_file(dir.path(), "book.mobi", &common::mobi(&[], "T"));

    let options = ReadOptions {
        include_path_metadata: false,
        ..ReadOptions::default()
    };
    let meta = read_metadata_with(&path, &options).unwrap();
    assert!(meta.contains("title"));
    assert!(!meta.contains("filename"));
}

#[test]
fn test_path_metadata() {
    let dir = TempDir::new().unwrap();
    let path = common::write_file(dir.path(), "notes.kfx", b"12345");

    let meta = path_metadata(&path).unwrap();
    assert_eq!(meta["filename"], ["notes.kfx"]);
    assert_eq!(meta["extension"], [".kfx"]);
    assert_eq!(meta["size"], ["5"]);
}

#[test]
fn test_batch_isolates_failures_and_keeps_order() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        common::write_file(dir.path(), "a.mobi", &common::mobi(&[(100, b"First")], "A")),
        common::write_file(dir.path(), "b.txt", b"plain text"),
        common::write_file(dir.path(), "c.mobi", &[0u8; 10]),
        common::write_file(
            dir.path(),
            "d.epub",
            &common::epub(&common::opf("D", "Fourth")),
        ),
    ];

    let results = read_batch(&paths, &ReadOptions::default());
    assert_eq!(results.len(), 4);
    for (entry, path) in results.iter().zip(&paths) {
        assert_eq!(&entry.path, path);
    }

    assert_eq!(results[0].result.as_ref().unwrap()["author"], ["First"]);
    assert!(matches!(results[1].result, Err(Error::UnsupportedFormat(_))));
    assert!(matches!(results[2].result, Err(Error::HeaderMissing(_))));
    assert_eq!(results[3].result.as_ref().unwrap()["author"], ["Fourth"]);
}
