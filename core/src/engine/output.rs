// Copyright (c) 2022-2023 The MobileCoin Foundation

use encdec::Encode;
use heapless::Vec;

use ledger_neo_apdu::{public_key::PUBLIC_KEY_LEN, tx::MAX_SIGNATURE_LEN, ApduError};

use crate::{
    apdu,
    consts::{APP_NAME, APP_VERSION, APP_VERSION_STR},
};

/// [`Engine`][super::Engine] outputs (in response to events), encoded to response [APDUs][crate::apdu]
#[derive(Clone, PartialEq, Debug)]
pub enum Output {
    /// Empty response (status only)
    None,

    /// Application name
    AppName,

    /// Application version
    Version,

    /// Application name and version
    AppAndVersion,

    /// Uncompressed public key
    PublicKey([u8; PUBLIC_KEY_LEN]),

    /// DER encoded transaction signature
    Signature(Vec<u8, MAX_SIGNATURE_LEN>),
}

impl Output {
    /// Encode an [`Output`] object to a response [APDU][crate::apdu]
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        match self {
            Output::None => Ok(0),
            Output::AppName => apdu::app_info::AppNameResp { name: APP_NAME }.encode(buff),
            Output::Version => APP_VERSION.encode(buff),
            Output::AppAndVersion => {
                apdu::app_info::AppAndVersionResp::new(APP_NAME, APP_VERSION_STR).encode(buff)
            }
            Output::PublicKey(key) => apdu::public_key::PublicKeyResp { key: *key }.encode(buff),
            Output::Signature(der) => apdu::tx::SignatureResp { der }.encode(buff),
        }
    }
}
