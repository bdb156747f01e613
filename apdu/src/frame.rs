// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Command / response frame codec
//!
//! Command frames carry a fixed four byte header followed by a one byte
//! payload length (`Lc`) and up to [`MAX_APDU_DATA`] payload bytes.
//! Response frames carry the payload followed by a big-endian status word.

use encdec::{Decode, Encode};

use crate::{status::StatusWord, MAX_APDU_DATA};

/// Length of the command header (`CLA ‖ INS ‖ P1 ‖ P2 ‖ Lc`)
pub const HEADER_LEN: usize = 5;

/// Length of the response trailer (status word)
pub const STATUS_LEN: usize = 2;

/// Frame codec errors
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
pub enum FrameError {
    /// Payload exceeds the single-frame limit
    #[cfg_attr(feature = "thiserror", error("payload too large ({0} bytes)"))]
    PayloadTooLarge(usize),

    /// Frame does not contain a complete header or status word
    #[cfg_attr(feature = "thiserror", error("frame too short"))]
    FrameTooShort,

    /// Declared payload length does not match the frame
    #[cfg_attr(feature = "thiserror", error("payload length mismatch"))]
    LengthMismatch,

    /// Output buffer cannot hold the encoded frame
    #[cfg_attr(feature = "thiserror", error("buffer too small"))]
    BufferTooSmall,
}

impl From<encdec::Error> for FrameError {
    fn from(_: encdec::Error) -> Self {
        FrameError::BufferTooSmall
    }
}

/// Command APDU frame
///
/// ## Encoding
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |      CLA      |      INS      |      P1       |      P2       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |      LC       |              PAYLOAD (LC bytes)...            /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Frame<'a> {
    pub cla: u8,
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
    pub data: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Create a new frame, failing if the payload does not fit a single frame
    pub fn new(cla: u8, ins: u8, p1: u8, p2: u8, data: &'a [u8]) -> Result<Self, FrameError> {
        if data.len() > MAX_APDU_DATA {
            return Err(FrameError::PayloadTooLarge(data.len()));
        }

        Ok(Self {
            cla,
            ins,
            p1,
            p2,
            data,
        })
    }
}

impl<'a> Encode for Frame<'a> {
    type Error = FrameError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(HEADER_LEN + self.data.len())
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        if self.data.len() > MAX_APDU_DATA {
            return Err(FrameError::PayloadTooLarge(self.data.len()));
        }

        let n = HEADER_LEN + self.data.len();
        if buff.len() < n {
            return Err(FrameError::BufferTooSmall);
        }

        buff[0] = self.cla;
        buff[1] = self.ins;
        buff[2] = self.p1;
        buff[3] = self.p2;
        buff[4] = self.data.len() as u8;
        buff[HEADER_LEN..n].copy_from_slice(self.data);

        Ok(n)
    }
}

impl<'a> Decode<'a> for Frame<'a> {
    type Output = Self;
    type Error = FrameError;

    /// Decode a command frame, `Lc` must match the remaining bytes exactly
    fn decode(buff: &'a [u8]) -> Result<(Self, usize), Self::Error> {
        if buff.len() < HEADER_LEN {
            return Err(FrameError::FrameTooShort);
        }

        let lc = buff[4] as usize;
        if buff.len() - HEADER_LEN != lc {
            return Err(FrameError::LengthMismatch);
        }

        let f = Self {
            cla: buff[0],
            ins: buff[1],
            p1: buff[2],
            p2: buff[3],
            data: &buff[HEADER_LEN..],
        };

        Ok((f, buff.len()))
    }
}

/// Response APDU frame
///
/// ## Encoding
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                          PAYLOAD...                           /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |          STATUS WORD          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Response<'a> {
    /// Raw status word
    pub sw: u16,
    pub data: &'a [u8],
}

impl<'a> Response<'a> {
    pub fn new(sw: u16, data: &'a [u8]) -> Self {
        Self { sw, data }
    }

    /// Mapped status word
    pub fn status(&self) -> StatusWord {
        StatusWord::from(self.sw)
    }

    /// Check whether the response indicates success
    pub fn is_ok(&self) -> bool {
        self.sw == StatusWord::Ok.code()
    }
}

impl<'a> Encode for Response<'a> {
    type Error = FrameError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(self.data.len() + STATUS_LEN)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        let n = self.data.len();
        if buff.len() < n + STATUS_LEN {
            return Err(FrameError::BufferTooSmall);
        }

        buff[..n].copy_from_slice(self.data);
        buff[n..][..STATUS_LEN].copy_from_slice(&self.sw.to_be_bytes());

        Ok(n + STATUS_LEN)
    }
}

impl<'a> Decode<'a> for Response<'a> {
    type Output = Self;
    type Error = FrameError;

    /// Split a response into payload and trailing status word
    fn decode(buff: &'a [u8]) -> Result<(Self, usize), Self::Error> {
        if buff.len() < STATUS_LEN {
            return Err(FrameError::FrameTooShort);
        }

        let (data, sw) = buff.split_at(buff.len() - STATUS_LEN);
        let sw = u16::from_be_bytes([sw[0], sw[1]]);

        Ok((Self { sw, data }, buff.len()))
    }
}
