// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction signing APDUs
//!
//! Signing is a fixed three phase exchange of `SIGN_TX` frames:
//!
//! 1. `p1 = 0x00`: the 20 byte [`Bip44Path`][crate::path::Bip44Path]
//! 2. `p1 = 0x01`: the 4 byte [`NetworkMagic`]
//! 3. `p1 = 0x02..`: the serialized unsigned transaction, one sequence
//!    number per chunk, with `p2 = 0x80` on all but the final chunk
//!
//! The final chunk is answered once the user has reviewed the transaction,
//! with a [`SignatureResp`] on approval or a [`ParseFailResp`] if the
//! transaction failed validation.

use encdec::{Decode, DecodeOwned, Encode};

use super::{ApduError, ApduStatic, Instruction, ParserStatus, NEO_APDU_CLA};

/// Network magic for NEO N3 MainNet
pub const NETWORK_MAINNET: u32 = 5195086;

/// Network magic for NEO N3 TestNet
pub const NETWORK_TESTNET: u32 = 1951352142;

/// Maximum DER encoded ECDSA signature length
pub const MAX_SIGNATURE_LEN: usize = 72;

/// `SIGN_TX` instruction marker, payloads are defined per phase
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct SignTx;

impl ApduStatic for SignTx {
    const CLA: u8 = NEO_APDU_CLA;
    const INS: u8 = Instruction::SignTx as u8;
}

/// Network magic, bound into the signed message
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct NetworkMagic(pub u32);

impl NetworkMagic {
    pub const MAINNET: Self = Self(NETWORK_MAINNET);
    pub const TESTNET: Self = Self(NETWORK_TESTNET);
}

impl core::fmt::Display for NetworkMagic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            NETWORK_MAINNET => write!(f, "MainNet"),
            NETWORK_TESTNET => write!(f, "TestNet"),
            v => write!(f, "{}", v),
        }
    }
}

impl Encode for NetworkMagic {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(4)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        buff[..4].copy_from_slice(&self.0.to_le_bytes());

        Ok(4)
    }
}

impl DecodeOwned for NetworkMagic {
    type Output = Self;

    type Error = ApduError;

    /// Decode a network magic, the payload must be exactly four bytes
    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        let b: [u8; 4] = buff.try_into().map_err(|_| ApduError::InvalidLength)?;

        Ok((Self(u32::from_le_bytes(b)), 4))
    }
}

/// Signature response APDU, containing a DER encoded ECDSA signature
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SignatureResp<'a> {
    pub der: &'a [u8],
}

impl<'a> Encode for SignatureResp<'a> {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(self.der.len())
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        let n = self.der.len();
        if n > MAX_SIGNATURE_LEN || buff.len() < n {
            return Err(ApduError::InvalidLength);
        }

        buff[..n].copy_from_slice(self.der);

        Ok(n)
    }
}

impl<'a> Decode<'a> for SignatureResp<'a> {
    type Output = Self;
    type Error = ApduError;

    /// Decode a signature response, checking the outer DER sequence header
    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        if buff.len() < 8 || buff.len() > MAX_SIGNATURE_LEN {
            return Err(ApduError::InvalidLength);
        }

        // SEQUENCE tag and length covering the remainder
        if buff[0] != 0x30 || buff[1] as usize != buff.len() - 2 {
            return Err(ApduError::InvalidEncoding);
        }

        Ok((Self { der: buff }, buff.len()))
    }
}

/// Transaction parsing failure response, sent with `SW_TX_PARSING_FAIL`
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ParseFailResp {
    pub status: ParserStatus,
}

impl Encode for ParseFailResp {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(1)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        if buff.is_empty() {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = self.status.to_byte();

        Ok(1)
    }
}

impl DecodeOwned for ParseFailResp {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        if buff.len() != 1 {
            return Err(ApduError::InvalidLength);
        }

        let status = ParserStatus::from_byte(buff[0]).ok_or(ApduError::InvalidEncoding)?;

        Ok((Self { status }, 1))
    }
}
