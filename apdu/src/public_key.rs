// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Public key request / response APDUs

use encdec::{DecodeOwned, Encode};

use super::{path::Bip44Path, ApduError, ApduStatic, Instruction, NEO_APDU_CLA};

/// Uncompressed SEC1 secp256r1 public key length
pub const PUBLIC_KEY_LEN: usize = 65;

/// Fetch the public key for a BIP44 path
///
/// `p2 = 1` requests the key also be shown on the device, this is accepted
/// but has no effect on the response.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct PublicKeyReq {
    pub path: Bip44Path,
}

impl PublicKeyReq {
    pub fn new(path: Bip44Path) -> Self {
        Self { path }
    }
}

impl ApduStatic for PublicKeyReq {
    const CLA: u8 = NEO_APDU_CLA;
    const INS: u8 = Instruction::GetPublicKey as u8;
}

impl Encode for PublicKeyReq {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        self.path.encode_len()
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        self.path.encode(buff)
    }
}

impl DecodeOwned for PublicKeyReq {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        let (path, n) = Bip44Path::decode_owned(buff)?;
        Ok((Self { path }, n))
    }
}

/// Public key response APDU, `0x04 ‖ X (32) ‖ Y (32)`
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PublicKeyResp {
    pub key: [u8; PUBLIC_KEY_LEN],
}

impl Encode for PublicKeyResp {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(PUBLIC_KEY_LEN)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        if buff.len() < PUBLIC_KEY_LEN {
            return Err(ApduError::InvalidLength);
        }

        buff[..PUBLIC_KEY_LEN].copy_from_slice(&self.key);

        Ok(PUBLIC_KEY_LEN)
    }
}

impl DecodeOwned for PublicKeyResp {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        if buff.len() != PUBLIC_KEY_LEN {
            return Err(ApduError::InvalidLength);
        }

        // Only uncompressed points are returned
        if buff[0] != 0x04 {
            return Err(ApduError::InvalidEncoding);
        }

        let mut key = [0u8; PUBLIC_KEY_LEN];
        key.copy_from_slice(buff);

        Ok((Self { key }, PUBLIC_KEY_LEN))
    }
}
