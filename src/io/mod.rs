//! Byte-level reading helpers.

mod cursor;

pub use cursor::ByteCursor;
