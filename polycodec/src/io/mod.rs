//! [`BinaryBuffer`], the byte cursor every binary codec reads from and writes to.
//!
//! A buffer is a growable byte sequence with two independent cursors. Writes always
//! append at the write cursor (which is the length of the written contents), reads
//! consume from the read cursor. Fixed-width primitives are encoded big-endian.
//!
//! ```
//! use polycodec::io::BinaryBuffer;
//!
//! let mut buffer = BinaryBuffer::new();
//! buffer.write_int(0x01020304);
//! assert_eq!(buffer.as_slice(), &[0x01, 0x02, 0x03, 0x04]);
//! assert_eq!(buffer.read_int().unwrap(), 0x01020304);
//! assert!(buffer.read_byte().is_err());
//! ```
use crate::error::{end_of_data, invalid_bool_encoding, Result};

mod std_io;

/// Growable byte sequence with separate read and write cursors.
///
/// Not thread-safe by design: each encode or decode call should own its buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryBuffer {
    data: Vec<u8>,
    reader_index: usize,
}

impl BinaryBuffer {
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            reader_index: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            reader_index: 0,
        }
    }

    /// Create a buffer whose written contents are a copy of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_vec(bytes.to_vec())
    }

    /// Create a buffer that takes ownership of `data` as its written contents.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            data,
            reader_index: 0,
        }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn reader_index(&self) -> usize {
        self.reader_index
    }

    /// Move the read cursor. Positions past the end are allowed; the next read fails.
    #[inline]
    pub fn set_reader_index(&mut self, index: usize) {
        self.reader_index = index;
    }

    /// The write cursor always sits at the end of the written contents.
    #[inline]
    pub fn writer_index(&self) -> usize {
        self.data.len()
    }

    /// Bytes between the read cursor and the write cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.reader_index)
    }

    #[inline]
    pub fn can_read(&self, count: usize) -> bool {
        self.remaining() >= count
    }

    /// The full written contents, independent of either cursor.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// The bytes not yet consumed by the read cursor.
    #[inline]
    pub fn unread(&self) -> &[u8] {
        self.data.get(self.reader_index..).unwrap_or(&[])
    }

    /// Snapshot copy of the full written contents.
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.clone()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Reset both cursors and discard the contents.
    pub fn clear(&mut self) {
        self.data.clear();
        self.reader_index = 0;
    }

    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    #[inline]
    pub fn write_byte(&mut self, value: u8) {
        self.data.push(value);
    }

    #[inline]
    pub fn write_boolean(&mut self, value: bool) {
        self.write_byte(value as u8);
    }

    #[inline]
    pub fn write_short(&mut self, value: i16) {
        self.write_bytes(&value.to_be_bytes());
    }

    #[inline]
    pub fn write_int(&mut self, value: i32) {
        self.write_bytes(&value.to_be_bytes());
    }

    #[inline]
    pub fn write_long(&mut self, value: i64) {
        self.write_bytes(&value.to_be_bytes());
    }

    #[inline]
    pub fn write_float(&mut self, value: f32) {
        self.write_bytes(&value.to_be_bytes());
    }

    #[inline]
    pub fn write_double(&mut self, value: f64) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Advance the read cursor by `count` bytes without bounds validation.
    ///
    /// A subsequent read past the end fails with [`Error::EndOfData`](crate::Error::EndOfData).
    #[inline]
    pub fn skip(&mut self, count: usize) {
        self.reader_index = self.reader_index.saturating_add(count);
    }

    #[inline]
    pub fn read_byte(&mut self) -> Result<u8> {
        let Some(&byte) = self.data.get(self.reader_index) else {
            return Err(end_of_data(1, self.remaining()));
        };
        self.reader_index += 1;
        Ok(byte)
    }

    /// Borrow the next `count` bytes and advance past them.
    ///
    /// Fails without moving the cursor if fewer than `count` bytes remain.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&[u8]> {
        if !self.can_read(count) {
            return Err(end_of_data(count, self.remaining()));
        }
        let start = self.reader_index;
        self.reader_index += count;
        Ok(&self.data[start..self.reader_index])
    }

    /// Consume every unread byte.
    #[inline]
    pub fn read_remaining(&mut self) -> &[u8] {
        let start = self.reader_index.min(self.data.len());
        self.reader_index = self.data.len();
        &self.data[start..]
    }

    #[inline(always)]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut ar = [0u8; N];
        ar.copy_from_slice(self.read_bytes(N)?);
        Ok(ar)
    }

    #[inline]
    pub fn read_boolean(&mut self) -> Result<bool> {
        match self.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(invalid_bool_encoding(byte)),
        }
    }

    #[inline]
    pub fn read_short(&mut self) -> Result<i16> {
        self.read_array().map(i16::from_be_bytes)
    }

    #[inline]
    pub fn read_int(&mut self) -> Result<i32> {
        self.read_array().map(i32::from_be_bytes)
    }

    #[inline]
    pub fn read_long(&mut self) -> Result<i64> {
        self.read_array().map(i64::from_be_bytes)
    }

    #[inline]
    pub fn read_float(&mut self) -> Result<f32> {
        self.read_array().map(f32::from_be_bytes)
    }

    #[inline]
    pub fn read_double(&mut self) -> Result<f64> {
        self.read_array().map(f64::from_be_bytes)
    }
}

impl From<Vec<u8>> for BinaryBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::from_vec(data)
    }
}

impl From<&[u8]> for BinaryBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<BinaryBuffer> for Vec<u8> {
    fn from(buffer: BinaryBuffer) -> Self {
        buffer.into_vec()
    }
}
