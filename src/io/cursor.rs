//! Endianness-aware byte cursor with bit-level reads.
//!
//! All three format readers drive decoding through a `ByteCursor`: a borrowed
//! byte buffer, a read offset, a switchable endianness mode, and a bit cursor
//! for sub-byte fields. The cursor is created fresh for every decode call and
//! owned exclusively by that call; no state outlives it.
//!
//! Failure semantics: every read that would pass the buffer end fails with
//! [`DecodeError::OutOfBounds`] and leaves the offset at its pre-read value,
//! so a caller that reports the error does not corrupt later seeks.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use encoding_rs::Encoding;

use crate::error::{DecodeError, Result};

/// Byte order for multi-byte primitive reads.
///
/// All three formats switch order mid-stream at documented points (shapefile
/// record headers are big-endian while bodies are little-endian, DBF counts
/// flip per header layout), so the mode is mutable cursor state rather than a
/// type parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Big,
    Little,
}

/// Sequential, offset-tracked reader over an in-memory byte buffer.
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
    endian: Endianness,
    encoding: &'static Encoding,
    /// Bits consumed from the byte at `offset` (0 = byte-aligned).
    bit_pos: u8,
    /// Buffered 16-bit word for `read_bits16`; the source bytes are already
    /// consumed from the stream when a word is buffered.
    word: u16,
    word_pos: u8,
    word_loaded: bool,
}

impl<'a> ByteCursor<'a> {
    /// Wrap a byte buffer, starting at offset 0 in the given byte order.
    pub fn new(data: &'a [u8], endian: Endianness) -> Self {
        Self {
            data,
            offset: 0,
            endian,
            encoding: encoding_rs::WINDOWS_1252,
            bit_pos: 0,
            word: 0,
            word_pos: 0,
            word_loaded: false,
        }
    }

    /// Switch byte order for subsequent multi-byte reads. Takes effect
    /// immediately; already-read values are unaffected.
    pub fn set_endianness(&mut self, endian: Endianness) {
        self.endian = endian;
    }

    /// Current byte order.
    pub fn endianness(&self) -> Endianness {
        self.endian
    }

    /// Set the text encoding used by [`read_fixed_string`](Self::read_fixed_string).
    pub fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = encoding;
    }

    /// Get the text encoding.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Current byte offset. While a bit read is in progress this is the
    /// offset of the partially consumed byte.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Total buffer length.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True iff the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True iff the offset has reached the buffer end.
    pub fn at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Bytes left between the next byte-aligned position and the buffer end.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.aligned_offset())
    }

    /// Where the next byte-aligned read starts: a partial bit remainder is
    /// discarded and reading resumes at the next whole byte.
    fn aligned_offset(&self) -> usize {
        if self.bit_pos > 0 {
            self.offset + 1
        } else {
            self.offset
        }
    }

    fn out_of_bounds(&self, wanted: usize) -> DecodeError {
        DecodeError::OutOfBounds {
            offset: self.offset,
            wanted,
            len: self.data.len(),
        }
    }

    /// Take `n` bytes at the next aligned position, advancing past them.
    /// The offset is untouched when the read would pass the buffer end.
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let start = self.aligned_offset();
        let end = start
            .checked_add(n)
            .ok_or_else(|| self.out_of_bounds(n))?;
        if end > self.data.len() {
            return Err(self.out_of_bounds(n));
        }
        self.offset = end;
        self.bit_pos = 0;
        self.word_loaded = false;
        self.word_pos = 0;
        Ok(&self.data[start..end])
    }

    // ---------------------------------------------------------------
    // Fixed-width primitives
    // ---------------------------------------------------------------

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(match self.endian {
            Endianness::Big => BigEndian::read_u16(b),
            Endianness::Little => LittleEndian::read_u16(b),
        })
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(match self.endian {
            Endianness::Big => BigEndian::read_u32(b),
            Endianness::Little => LittleEndian::read_u32(b),
        })
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let b = self.take(8)?;
        Ok(match self.endian {
            Endianness::Big => BigEndian::read_u64(b),
            Endianness::Little => LittleEndian::read_u64(b),
        })
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Read exactly one byte as a character.
    pub fn read_char(&mut self) -> Result<char> {
        Ok(self.take(1)?[0] as char)
    }

    /// Read `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    /// Read `n` bytes and decode them as text using the cursor's encoding.
    ///
    /// Trailing NUL/space padding is preserved; stripping it is the caller's
    /// job since padding rules differ per format (DBF pads with NUL or
    /// space, LAS pads with NUL).
    pub fn read_fixed_string(&mut self, n: usize) -> Result<String> {
        let bytes = self.take(n)?;
        let (decoded, _, _) = self.encoding.decode(bytes);
        Ok(decoded.into_owned())
    }

    /// Advance `n` bytes without reading.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Set the offset directly. Seeking backward is allowed (DBF and LAS
    /// jump to record-start boundaries declared in their headers); seeking
    /// past the buffer end is not.
    pub fn seek_to(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(DecodeError::OutOfBounds {
                offset,
                wanted: 0,
                len: self.data.len(),
            });
        }
        self.offset = offset;
        self.bit_pos = 0;
        self.word_loaded = false;
        self.word_pos = 0;
        Ok(())
    }

    // ---------------------------------------------------------------
    // Bit-level reads
    // ---------------------------------------------------------------

    /// Read a single bit from the current byte, least significant first.
    /// After the eighth bit the cursor rolls over to the next byte.
    pub fn read_bit(&mut self) -> Result<bool> {
        self.word_loaded = false;
        self.word_pos = 0;
        if self.offset >= self.data.len() {
            return Err(self.out_of_bounds(1));
        }
        let bit = (self.data[self.offset] >> self.bit_pos) & 1;
        self.bit_pos += 1;
        if self.bit_pos == 8 {
            self.bit_pos = 0;
            self.offset += 1;
        }
        Ok(bit == 1)
    }

    /// Read `n` bits (n ≤ 8), least significant first, continuing into the
    /// next byte when the current one is exhausted.
    pub fn read_bits(&mut self, n: u32) -> Result<u8> {
        debug_assert!(n <= 8, "read_bits supports at most 8 bits");
        // Pre-check so a failure never consumes a partial bit prefix.
        let needed = ((self.bit_pos as u32 + n) as usize + 7) / 8;
        if self.offset + needed > self.data.len() {
            return Err(self.out_of_bounds(needed));
        }
        let mut value = 0u8;
        for i in 0..n {
            if self.read_bit()? {
                value |= 1 << i;
            }
        }
        Ok(value)
    }

    /// Read `n` bits (n ≤ 16) from a 2-byte word loaded in the current byte
    /// order, least significant first. The LAS extended point formats (6-10)
    /// pack their return/classification fields this way.
    pub fn read_bits16(&mut self, n: u32) -> Result<u16> {
        debug_assert!(n <= 16, "read_bits16 supports at most 16 bits");
        let buffered = if self.word_loaded {
            16 - self.word_pos as u32
        } else {
            0
        };
        if n > buffered {
            // At most one more word is ever needed for n ≤ 16.
            let start = self.aligned_offset();
            if start + 2 > self.data.len() {
                return Err(self.out_of_bounds(2));
            }
        }

        let mut value = 0u16;
        let mut got = 0u32;
        while got < n {
            if !self.word_loaded {
                let start = self.aligned_offset();
                let b = &self.data[start..start + 2];
                self.word = match self.endian {
                    Endianness::Big => BigEndian::read_u16(b),
                    Endianness::Little => LittleEndian::read_u16(b),
                };
                self.offset = start + 2;
                self.bit_pos = 0;
                self.word_loaded = true;
                self.word_pos = 0;
            }
            let avail = 16 - self.word_pos as u32;
            let chunk_len = avail.min(n - got);
            let mask = if chunk_len == 16 {
                u16::MAX
            } else {
                (1u16 << chunk_len) - 1
            };
            value |= ((self.word >> self.word_pos) & mask) << got;
            self.word_pos += chunk_len as u8;
            got += chunk_len;
            if self.word_pos == 16 {
                self.word_loaded = false;
                self.word_pos = 0;
            }
        }
        Ok(value)
    }
}
