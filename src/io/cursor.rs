use std::io::{self, SeekFrom};

/// A positioned big-endian reader over an in-memory byte buffer.
///
/// The only mutable state is the read position. Absolute `*_at` accessors
/// never move the cursor, so the same buffer can be probed at fixed header
/// offsets while a sequential walk is in progress.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Create a cursor already positioned at `position`.
    pub fn at(data: &'a [u8], position: usize) -> Self {
        Self { data, position }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes from the current position to the end of the buffer.
    pub fn remaining(&self) -> &'a [u8] {
        self.data.get(self.position..).unwrap_or(&[])
    }

    pub fn seek(&mut self, pos: SeekFrom) -> io::Result<usize> {
        let total_len = self.data.len() as i64;
        let current_pos = self.position as i64;

        let new_pos = match pos {
            SeekFrom::Start(p) => p as i64,
            SeekFrom::End(p) => total_len + p,
            SeekFrom::Current(p) => current_pos + p,
        };

        if new_pos < 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "Seek before 0"));
        }

        self.position = new_pos as usize;
        Ok(self.position)
    }

    /// Read exactly `len` bytes and advance.
    pub fn read_bytes(&mut self, len: usize) -> io::Result<&'a [u8]> {
        let bytes = self.slice(self.position, len).ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "not enough data")
        })?;
        self.position += len;
        Ok(bytes)
    }

    /// Read a fixed-size tag such as `b"EXTH"` or `b"BOOKMOBI"`.
    pub fn read_array<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u16(&mut self) -> io::Result<u16> {
        self.read_array::<2>().map(u16::from_be_bytes)
    }

    pub fn read_u32(&mut self) -> io::Result<u32> {
        self.read_array::<4>().map(u32::from_be_bytes)
    }

    /// Borrow `len` bytes at an absolute offset without moving the cursor.
    pub fn slice(&self, offset: usize, len: usize) -> Option<&'a [u8]> {
        let end = offset.checked_add(len)?;
        self.data.get(offset..end)
    }

    pub fn u16_at(&self, offset: usize) -> Option<u16> {
        self.slice(offset, 2)
            .map(|b| u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn u32_at(&self, offset: usize) -> Option<u32> {
        self.slice(offset, 4)
            .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}
