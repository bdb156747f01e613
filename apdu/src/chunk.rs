// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Payload chunking for multi-frame exchanges
//!
//! Data at or below the limit is emitted as a single final chunk (including
//! empty data). Larger data is emitted as full chunks followed by the remainder,
//! with only the last chunk marked final. When the length is an exact multiple
//! of the limit no empty trailing chunk is produced, the last full chunk is
//! marked final instead.

/// Iterator over `(is_last, chunk)` pairs, see [chunks]
#[derive(Clone, Debug)]
pub struct Chunks<'a> {
    data: &'a [u8],
    limit: usize,
    index: usize,
    done: bool,
}

/// Split `data` into chunks of at most `limit` bytes (a zero limit is treated as one)
pub fn chunks(data: &[u8], limit: usize) -> Chunks<'_> {
    Chunks {
        data,
        limit: limit.max(1),
        index: 0,
        done: false,
    }
}

impl<'a> Chunks<'a> {
    /// Number of chunks remaining
    pub fn remaining(&self) -> usize {
        if self.done {
            return 0;
        }

        let left = self.data.len() - self.index;
        match left {
            0 => 1,
            _ => (left + self.limit - 1) / self.limit,
        }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = (bool, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let left = &self.data[self.index..];
        let n = left.len().min(self.limit);
        let last = left.len() <= self.limit;

        self.index += n;
        self.done = last;

        Some((last, &left[..n]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl<'a> ExactSizeIterator for Chunks<'a> {}
