// Copyright (c) 2022-2023 The MobileCoin Foundation

//! BIP44 derivation paths
//!
//! Paths are always five segments (`purpose / coin_type / account / change / address_index`)
//! encoded as big-endian `u32`s.

use core::{fmt::Display, str::FromStr};

use byteorder::{BigEndian, ByteOrder};
use encdec::{DecodeOwned, Encode};

use crate::ApduError;

/// Hardened derivation flag
pub const HARDENED: u32 = 0x8000_0000;

/// Number of path segments
pub const PATH_SEGMENTS: usize = 5;

/// Encoded path length
pub const PATH_LEN: usize = PATH_SEGMENTS * 4;

/// BIP44 purpose (`44'`)
pub const PURPOSE: u32 = HARDENED | 44;

/// SLIP-0044 NEO coin type (`888'`)
pub const COIN_TYPE_NEO: u32 = HARDENED | 888;

/// BIP44 derivation path
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Bip44Path(pub [u32; PATH_SEGMENTS]);

impl Bip44Path {
    /// Create a standard NEO path for the provided account and address index
    pub const fn neo(account: u32, change: u32, address_index: u32) -> Self {
        Self([
            PURPOSE,
            COIN_TYPE_NEO,
            HARDENED | account,
            change,
            address_index,
        ])
    }

    pub fn purpose(&self) -> u32 {
        self.0[0]
    }

    pub fn coin_type(&self) -> u32 {
        self.0[1]
    }

    pub fn account(&self) -> u32 {
        self.0[2]
    }

    pub fn change(&self) -> u32 {
        self.0[3]
    }

    pub fn address_index(&self) -> u32 {
        self.0[4]
    }

    /// Encode path to a fixed size array
    pub fn to_bytes(&self) -> [u8; PATH_LEN] {
        let mut b = [0u8; PATH_LEN];
        BigEndian::write_u32_into(&self.0, &mut b);
        b
    }
}

impl Default for Bip44Path {
    fn default() -> Self {
        Self::neo(0, 0, 0)
    }
}

impl Encode for Bip44Path {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(PATH_LEN)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        if buff.len() < PATH_LEN {
            return Err(ApduError::InvalidLength);
        }

        BigEndian::write_u32_into(&self.0, &mut buff[..PATH_LEN]);

        Ok(PATH_LEN)
    }
}

impl DecodeOwned for Bip44Path {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        if buff.len() < PATH_LEN {
            return Err(ApduError::InvalidLength);
        }

        let mut p = [0u32; PATH_SEGMENTS];
        BigEndian::read_u32_into(&buff[..PATH_LEN], &mut p);

        Ok((Self(p), PATH_LEN))
    }
}

/// Path string parsing errors
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
pub enum PathError {
    /// Path does not start with `m/`
    #[cfg_attr(feature = "thiserror", error("path must start with 'm/'"))]
    MissingRoot,
    /// Path does not contain five segments
    #[cfg_attr(feature = "thiserror", error("path must contain five segments"))]
    SegmentCount,
    /// Segment is not a valid index
    #[cfg_attr(feature = "thiserror", error("invalid path segment"))]
    InvalidSegment,
}

/// Parse paths in the form `m/44'/888'/0'/0/0`
impl FromStr for Bip44Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("m/").ok_or(PathError::MissingRoot)?;

        let mut p = [0u32; PATH_SEGMENTS];
        let mut n = 0;

        for segment in s.split('/') {
            if n >= PATH_SEGMENTS {
                return Err(PathError::SegmentCount);
            }

            let (v, hardened) = match segment.strip_suffix('\'') {
                Some(v) => (v, true),
                None => (segment, false),
            };

            let v = u32::from_str(v).map_err(|_| PathError::InvalidSegment)?;
            if v & HARDENED != 0 {
                return Err(PathError::InvalidSegment);
            }

            p[n] = match hardened {
                true => v | HARDENED,
                false => v,
            };
            n += 1;
        }

        if n != PATH_SEGMENTS {
            return Err(PathError::SegmentCount);
        }

        Ok(Self(p))
    }
}

impl Display for Bip44Path {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "m")?;

        for v in self.0 {
            match v & HARDENED != 0 {
                true => write!(f, "/{}'", v & !HARDENED)?,
                false => write!(f, "/{}", v)?,
            }
        }

        Ok(())
    }
}
