//! Positioned little-endian reads over an in-memory buffer.

use byteorder::{ByteOrder, LittleEndian};

use super::types::error::{MdplistError, Result};

/// A seekable read position over a borrowed byte buffer.
///
/// Reads never run short: a read that would pass the end of the buffer fails
/// with [`MdplistError::OutOfBounds`].
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: u64,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Moves to an absolute position. Seeking past the end is allowed; the next read fails.
    pub fn seek(&mut self, pos: u64) {
        self.pos = pos;
    }

    fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.pos)
    }

    /// Reads `n` raw bytes and advances past them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let needed = n as u64;
        if needed > self.remaining() {
            return Err(MdplistError::OutOfBounds {
                offset: self.pos,
                needed,
                available: self.remaining(),
            });
        }
        let data: &'a [u8] = self.data;
        let start = self.pos as usize;
        self.pos += needed;
        Ok(&data[start..start + n])
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.read_bytes(8)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.read_bytes(8)?))
    }

    /// Reads a u32 length followed by that many bytes.
    pub fn read_length_prefixed(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u32()?;
        self.read_bytes(len as usize)
    }

    /// Reads a u32 length that counts a trailing terminator, returning the
    /// payload without it. The terminator itself is not consumed.
    pub fn read_length_prefixed_terminated(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u32()?;
        self.read_bytes(len.saturating_sub(1) as usize)
    }
}
