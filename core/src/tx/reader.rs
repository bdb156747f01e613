// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Bounds-checked cursor over a serialized transaction

use byteorder::{ByteOrder, LittleEndian};

/// Cursor over a borrowed buffer, every read either consumes exactly the
/// requested bytes or returns `None` leaving the cursor unchanged.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    buff: &'a [u8],
    index: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buff: &'a [u8]) -> Self {
        Self { buff, index: 0 }
    }

    /// Current offset
    pub fn offset(&self) -> usize {
        self.index
    }

    /// Bytes remaining
    pub fn remaining(&self) -> usize {
        self.buff.len() - self.index
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Consume `n` bytes
    pub fn read_bytes(&mut self, n: usize) -> Option<&'a [u8]> {
        if n > self.remaining() {
            return None;
        }

        let b = &self.buff[self.index..][..n];
        self.index += n;

        Some(b)
    }

    /// Consume a fixed size array
    pub fn read_array<const N: usize>(&mut self) -> Option<&'a [u8; N]> {
        let b = self.read_bytes(N)?;
        b.try_into().ok()
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    pub fn read_u16(&mut self) -> Option<u16> {
        self.read_bytes(2).map(LittleEndian::read_u16)
    }

    pub fn read_u32(&mut self) -> Option<u32> {
        self.read_bytes(4).map(LittleEndian::read_u32)
    }

    pub fn read_u64(&mut self) -> Option<u64> {
        self.read_bytes(8).map(LittleEndian::read_u64)
    }

    pub fn read_i64(&mut self) -> Option<i64> {
        self.read_bytes(8).map(LittleEndian::read_i64)
    }

    /// Read a NEO variable length integer
    ///
    /// `< 0xfd` is the value itself, `0xfd`, `0xfe` and `0xff` prefix
    /// a little-endian `u16`, `u32` and `u64` respectively.
    pub fn read_varint(&mut self) -> Option<u64> {
        let start = self.index;

        let v = match self.read_u8()? {
            0xfd => self.read_u16().map(u64::from),
            0xfe => self.read_u32().map(u64::from),
            0xff => self.read_u64(),
            v => Some(v as u64),
        };

        // Rewind on truncated values
        if v.is_none() {
            self.index = start;
        }

        v
    }
}
