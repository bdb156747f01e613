// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Application information APDUs

use encdec::{Decode, DecodeOwned, Encode};

use super::{ApduError, ApduStatic, Instruction, BOLOS_APDU_CLA, NEO_APDU_CLA};

/// Helper for empty request APDUs
macro_rules! empty_req {
    ($t:ident, $cla:expr, $ins:expr) => {
        impl ApduStatic for $t {
            const CLA: u8 = $cla;
            const INS: u8 = $ins;
        }

        impl Encode for $t {
            type Error = ApduError;

            fn encode_len(&self) -> Result<usize, Self::Error> {
                Ok(0)
            }

            fn encode(&self, _buff: &mut [u8]) -> Result<usize, Self::Error> {
                Ok(0)
            }
        }

        impl DecodeOwned for $t {
            type Output = Self;

            type Error = ApduError;

            fn decode_owned(_buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
                Ok((Self {}, 0))
            }
        }
    };
}

/// Fetch application name APDU
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct AppNameReq {}

empty_req!(AppNameReq, NEO_APDU_CLA, Instruction::GetAppName as u8);

/// Application name response APDU, the raw ASCII name with no length prefix
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct AppNameResp<'a> {
    pub name: &'a str,
}

impl<'a> Encode for AppNameResp<'a> {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(self.name.len())
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        let n = self.name.len();
        if buff.len() < n {
            return Err(ApduError::InvalidLength);
        }

        buff[..n].copy_from_slice(self.name.as_bytes());

        Ok(n)
    }
}

impl<'a> Decode<'a> for AppNameResp<'a> {
    type Output = Self;
    type Error = ApduError;

    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        let name = core::str::from_utf8(buff).map_err(|_| ApduError::InvalidUtf8)?;
        Ok((Self { name }, buff.len()))
    }
}

/// Fetch application version APDU
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct VersionReq {}

empty_req!(VersionReq, NEO_APDU_CLA, Instruction::GetVersion as u8);

/// Application version response APDU
///
/// ## Encoding
///
/// ```text
///  0                   1                   2
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     MAJOR     |     MINOR     |     PATCH     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct VersionResp {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl VersionResp {
    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl core::fmt::Display for VersionResp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Encode for VersionResp {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(3)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        if buff.len() < 3 {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = self.major;
        buff[1] = self.minor;
        buff[2] = self.patch;

        Ok(3)
    }
}

impl DecodeOwned for VersionResp {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        if buff.len() != 3 {
            return Err(ApduError::InvalidLength);
        }

        Ok((Self::new(buff[0], buff[1], buff[2]), 3))
    }
}

/// Fetch application name and version via the BOLOS class
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct AppAndVersionReq {}

empty_req!(AppAndVersionReq, BOLOS_APDU_CLA, 0x01);

/// Application name and version response APDU
///
/// ## Encoding
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   FORMAT_ID   |   NAME_LEN    |            NAME...            /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  VERSION_LEN  |                  VERSION...                   /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct AppAndVersionResp<'a> {
    /// Response format (always 1)
    pub format: u8,
    pub name: &'a str,
    pub version: &'a str,
}

impl<'a> AppAndVersionResp<'a> {
    pub fn new(name: &'a str, version: &'a str) -> Self {
        Self {
            format: 1,
            name,
            version,
        }
    }
}

impl<'a> Encode for AppAndVersionResp<'a> {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(3 + self.name.len() + self.version.len())
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        let (name, version) = (self.name.as_bytes(), self.version.as_bytes());

        if name.len() > u8::MAX as usize || version.len() > u8::MAX as usize {
            return Err(ApduError::InvalidEncoding);
        }
        if buff.len() < self.encode_len()? {
            return Err(ApduError::InvalidLength);
        }

        let mut index = 0;

        buff[index] = self.format;
        buff[index + 1] = name.len() as u8;
        index += 2;

        buff[index..][..name.len()].copy_from_slice(name);
        index += name.len();

        buff[index] = version.len() as u8;
        index += 1;

        buff[index..][..version.len()].copy_from_slice(version);
        index += version.len();

        Ok(index)
    }
}

impl<'a> Decode<'a> for AppAndVersionResp<'a> {
    type Output = Self;
    type Error = ApduError;

    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        let mut index = 0;

        if buff.len() < 2 {
            return Err(ApduError::InvalidLength);
        }

        let format = buff[0];
        let name_len = buff[1] as usize;
        index += 2;

        // Fetch name string and version length
        if buff.len() < index + name_len + 1 {
            return Err(ApduError::InvalidLength);
        }
        let name = core::str::from_utf8(&buff[index..][..name_len]).map_err(|_| ApduError::InvalidUtf8)?;
        index += name_len;

        let version_len = buff[index] as usize;
        index += 1;

        // Fetch version string
        if buff.len() < index + version_len {
            return Err(ApduError::InvalidLength);
        }
        let version =
            core::str::from_utf8(&buff[index..][..version_len]).map_err(|_| ApduError::InvalidUtf8)?;
        index += version_len;

        Ok((
            Self {
                format,
                name,
                version,
            },
            index,
        ))
    }
}
