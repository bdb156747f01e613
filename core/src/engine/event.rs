// Copyright (c) 2022-2023 The MobileCoin Foundation

use encdec::DecodeOwned;

use ledger_neo_apdu::{
    frame::Frame,
    path::{Bip44Path, PATH_LEN},
    prelude::*,
    ApduStatic, NEO_APDU_CLA, P1_MAGIC, P1_MAX, P1_PATH, P2_LAST, P2_MORE,
};

use super::Error;

/// [`Engine`][super::Engine] input events, decoded from command [frames][Frame]
#[derive(Clone, PartialEq, Debug)]
pub enum Event<'a> {
    /// Fetch application name
    GetAppName,

    /// Fetch application version
    GetVersion,

    /// Fetch application name and version (BOLOS format)
    GetAppAndVersion,

    /// Fetch the public key for a derivation path
    GetPublicKey {
        path: Bip44Path,
        /// Key display requested (`p2 = 1`)
        display: bool,
    },

    /// Start a signing session with a derivation path
    SignTxPath(Bip44Path),

    /// Set the network magic for the signing session
    SignTxMagic(&'a [u8]),

    /// Transaction chunk
    SignTxChunk {
        /// `p1` sequence number
        seq: u8,
        /// Final chunk of the transaction
        last: bool,
        data: &'a [u8],
    },
}

impl<'a> Event<'a> {
    /// Validate a command frame and decode the corresponding event
    ///
    /// Checks are applied in order: class, instruction, `p1` / `p2`, payload length.
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn parse(f: &Frame<'a>) -> Result<Self, Error> {
        // Dashboard-class app and version request
        if f.cla == AppAndVersionReq::CLA && f.ins == AppAndVersionReq::INS {
            return Ok(Event::GetAppAndVersion);
        }

        if f.cla != NEO_APDU_CLA {
            #[cfg(feature = "log")]
            log::warn!("unsupported class: {:#04x}", f.cla);

            return Err(Error::ClaNotSupported);
        }

        let ins = Instruction::try_from(f.ins).map_err(|_| Error::InsNotSupported)?;

        match ins {
            Instruction::GetAppName | Instruction::GetVersion => {
                if f.p1 != 0 || f.p2 != 0 {
                    return Err(Error::WrongP1P2);
                }

                match ins {
                    Instruction::GetAppName => Ok(Event::GetAppName),
                    _ => Ok(Event::GetVersion),
                }
            }
            Instruction::GetPublicKey => {
                if f.p1 != 0 || f.p2 > 1 {
                    return Err(Error::WrongP1P2);
                }

                Ok(Event::GetPublicKey {
                    path: decode_path(f.data)?,
                    display: f.p2 == 1,
                })
            }
            Instruction::SignTx => {
                if f.p1 > P1_MAX || (f.p2 != P2_LAST && f.p2 != P2_MORE) {
                    return Err(Error::WrongP1P2);
                }
                if f.data.is_empty() {
                    return Err(Error::WrongDataLength);
                }

                match f.p1 {
                    P1_PATH => decode_path(f.data).map(Event::SignTxPath),
                    P1_MAGIC => Ok(Event::SignTxMagic(f.data)),
                    seq => Ok(Event::SignTxChunk {
                        seq,
                        last: f.p2 == P2_LAST,
                        data: f.data,
                    }),
                }
            }
        }
    }

    /// Check whether an event belongs to a signing session
    pub fn is_sign_tx(&self) -> bool {
        matches!(
            self,
            Event::SignTxPath(..) | Event::SignTxMagic(..) | Event::SignTxChunk { .. }
        )
    }
}

/// Decode a derivation path payload, which must be exactly [`PATH_LEN`] bytes
fn decode_path(buff: &[u8]) -> Result<Bip44Path, Error> {
    if buff.len() != PATH_LEN {
        return Err(Error::WrongDataLength);
    }

    Bip44Path::decode_owned(buff)
        .map(|(p, _)| p)
        .map_err(|_| Error::WrongDataLength)
}

/// Check whether a raw command frame addresses `SIGN_TX`, prior to validation
pub(crate) fn is_sign_tx_frame(buff: &[u8]) -> bool {
    matches!(buff, [NEO_APDU_CLA, ins, ..] if *ins == SignTx::INS)
}
