//! Binary reader for positional parsing of byte slices.
//!
//! Sprite files are laid out as outer record tables that point into inner
//! record tables, so decoding jumps around the buffer. [`BinaryReader`] keeps
//! an explicit cursor that can be saved, moved with [`BinaryReader::seek`] and
//! restored.

use zerocopy::FromBytes;

use crate::{Error, Result};

/// A reader over a byte slice that decodes fixed-layout records.
///
/// # Example
///
/// ```
/// use bland_common::BinaryReader;
/// use zerocopy::byteorder::little_endian::U16;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_struct::<U16>().unwrap().get(), 0x0201);
/// reader.seek(4);
/// assert_eq!(reader.read_struct::<U16>().unwrap().get(), 0x0605);
/// assert_eq!(reader.remaining(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Seek to an absolute position.
    ///
    /// Seeking past the end is allowed; the next read fails instead.
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    #[inline]
    fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                position: self.position,
                needed: count,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    /// Read a fixed-layout record using zerocopy.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let position = self.position;
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            position,
            needed: size,
            available: bytes.len(),
        })
    }

    /// Read `count` consecutive records.
    pub fn read_array<T: FromBytes>(&mut self, count: usize) -> Result<Vec<T>> {
        let mut records = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            records.push(self.read_struct::<T>()?);
        }
        Ok(records)
    }
}
