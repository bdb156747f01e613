// Copyright (c) 2022-2023 The MobileCoin Foundation

//! The [Engine] provides functionality required by hardware wallets.
//!
//! This handles [Event] inputs and returns [Output] responses to the caller,
//! see [apdu][crate::apdu] for APDU protocol / encoding specifications.
//!
//! [`Engine::process`] wraps this in the complete command / response frame
//! handling, for use by firmware and emulated devices.

use encdec::{Decode, DecodeOwned, Encode};
use heapless::Vec;
use sha2::{Digest, Sha256};
use strum::{Display, EnumIter};
use zeroize::Zeroize;

use ledger_neo_apdu::{
    frame::{Frame, Response, STATUS_LEN},
    path::Bip44Path,
    public_key::PUBLIC_KEY_LEN,
    tx::{NetworkMagic, ParseFailResp, MAX_SIGNATURE_LEN},
    StatusWord, MAX_TX_LEN, P1_TX_START,
};

use crate::{
    bip44::check_path,
    confirm::{Approver, Gate, Summary},
    tx::parse,
};

mod event;
pub use event::Event;

mod output;
pub use output::Output;

mod error;
pub use error::Error;

/// Signed message length, `magic (4) ‖ SHA-256(tx) (32)`
const MSG_LEN: usize = 4 + 32;

/// Engine signing session state
#[derive(Copy, Clone, PartialEq, Debug, Display, EnumIter)]
pub enum State {
    /// Idle, no signing session
    Init,
    /// Derivation path accepted
    PathOk,
    /// Network magic accepted, expecting the first transaction chunk
    MagicOk,
    /// Receiving transaction chunks, expecting the provided sequence number
    Receiving(u8),
}

/// [`Driver`] trait provides platform key support for [`Engine`] instances
pub trait Driver {
    /// Fetch the uncompressed secp256r1 public key for a derivation path
    fn public_key(&self, path: &Bip44Path) -> Result<[u8; PUBLIC_KEY_LEN], Error>;

    /// Sign a message (ECDSA / SHA-256) with the key for a derivation path,
    /// returning a DER encoded signature
    fn sign(&self, path: &Bip44Path, msg: &[u8]) -> Result<Vec<u8, MAX_SIGNATURE_LEN>, Error>;
}

impl<T: Driver> Driver for &mut T {
    fn public_key(&self, path: &Bip44Path) -> Result<[u8; PUBLIC_KEY_LEN], Error> {
        T::public_key(self, path)
    }

    fn sign(&self, path: &Bip44Path, msg: &[u8]) -> Result<Vec<u8, MAX_SIGNATURE_LEN>, Error> {
        T::sign(self, path, msg)
    }
}

/// Derivation path held outside of a signing session
const IDLE_PATH: Bip44Path = Bip44Path::neo(0, 0, 0);

/// [Engine] provides hardware-independent support for NEO N3 wallet operations
pub struct Engine<DRV: Driver, APP: Approver> {
    state: State,

    path: Bip44Path,
    magic: NetworkMagic,
    tx: Vec<u8, MAX_TX_LEN>,

    drv: DRV,
    approver: APP,
}

impl<DRV: Driver, APP: Approver> Engine<DRV, APP> {
    /// Create a new engine instance with the provided driver and approver
    pub const fn new(drv: DRV, approver: APP) -> Self {
        Self {
            state: State::Init,
            path: IDLE_PATH,
            magic: NetworkMagic(0),
            tx: Vec::new(),
            drv,
            approver,
        }
    }

    /// Handle an incoming command frame, writing the response (payload and
    /// status word) to `resp` and returning the response length
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn process(&mut self, frame: &[u8], resp: &mut [u8]) -> usize {
        let sign_tx = event::is_sign_tx_frame(frame);

        let r = match Frame::decode(frame) {
            Ok((f, _)) => Event::parse(&f).and_then(|evt| self.update(&evt)),
            Err(_e) => {
                #[cfg(feature = "log")]
                log::warn!("invalid frame: {:?}", _e);

                Err(Error::WrongDataLength)
            }
        };

        // Frame level errors also discard signing sessions
        if sign_tx && r.is_err() {
            self.reset();
        }

        let max = resp.len().saturating_sub(STATUS_LEN);

        let (sw, n) = match r {
            Ok(o) => match o.encode(&mut resp[..max]) {
                Ok(n) => (StatusWord::Ok, n),
                Err(_) => (Error::EncodingFailed.status(), 0),
            },
            Err(Error::TxParsing(status)) => {
                let n = ParseFailResp { status }
                    .encode(&mut resp[..max])
                    .unwrap_or(0);
                (StatusWord::TxParsingFail, n)
            }
            Err(e) => (e.status(), 0),
        };

        #[cfg(feature = "log")]
        log::debug!("response: {} ({:#06x}), {} bytes", sw, sw.code(), n);

        // Append status word
        let (data, tail) = resp.split_at_mut(n);
        match Response::new(sw.code(), &[]).encode(tail) {
            Ok(v) => data.len() + v,
            Err(_) => 0,
        }
    }

    /// Handle engine events
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn update(&mut self, evt: &Event) -> Result<Output, Error> {
        #[cfg(feature = "log")]
        log::debug!("event: {:02x?}", evt);

        let r = self.handle(evt);

        // Errors and completed signatures end the signing session
        if evt.is_sign_tx() && (r.is_err() || matches!(r, Ok(Output::Signature(_)))) {
            self.reset();
        }

        r
    }

    fn handle(&mut self, evt: &Event) -> Result<Output, Error> {
        match (self.state, evt) {
            (_, Event::GetAppName) => Ok(Output::AppName),
            (_, Event::GetVersion) => Ok(Output::Version),
            (_, Event::GetAppAndVersion) => Ok(Output::AppAndVersion),

            (_, Event::GetPublicKey { path, .. }) => {
                // Key requests always discard an in-progress signing session
                self.reset();

                check_path(path)?;

                self.drv.public_key(path).map(Output::PublicKey)
            }

            // Start a new session, discarding any prior state
            (_, Event::SignTxPath(path)) => {
                self.reset();

                check_path(path)?;

                self.path = *path;
                self.set_state(State::PathOk);

                Ok(Output::None)
            }

            (State::PathOk, Event::SignTxMagic(m)) => {
                let (magic, _) =
                    NetworkMagic::decode_owned(m).map_err(|_| Error::MagicParsingFail)?;

                self.magic = magic;
                self.set_state(State::MagicOk);

                Ok(Output::None)
            }

            (
                State::MagicOk | State::Receiving(_),
                Event::SignTxChunk { seq, last, data },
            ) => {
                let expected = match self.state {
                    State::Receiving(n) => n,
                    _ => P1_TX_START,
                };
                if *seq != expected {
                    return Err(Error::BadState);
                }

                self.tx
                    .extend_from_slice(data)
                    .map_err(|_| Error::WrongTxLength)?;

                match last {
                    false => {
                        self.set_state(State::Receiving(expected + 1));
                        Ok(Output::None)
                    }
                    true => self.sign(),
                }
            }

            // Handle unexpected events
            (_s, _e) => {
                #[cfg(feature = "log")]
                log::error!("unexpected event in state {}: {:02x?}", _s, _e);

                Err(Error::BadState)
            }
        }
    }

    /// Validate, confirm and sign the received transaction
    #[cfg_attr(feature = "noinline", inline(never))]
    fn sign(&mut self) -> Result<Output, Error> {
        let tx = match parse(&self.tx) {
            Ok(v) => v,
            Err(e) => {
                #[cfg(feature = "log")]
                log::warn!("transaction rejected: {}", e);

                return Err(Error::TxParsing(e));
            }
        };

        let hash = Sha256::digest(&self.tx);

        #[cfg(feature = "log")]
        log::trace!("transaction hash: {:02x?}", hash.as_slice());

        let summary = Summary::build(&tx, self.magic)?;

        if !Gate::new(&summary).run(&mut self.approver) {
            #[cfg(feature = "log")]
            log::debug!("transaction denied");

            return Err(Error::Denied);
        }

        let mut msg = [0u8; MSG_LEN];
        msg[..4].copy_from_slice(&self.magic.0.to_le_bytes());
        msg[4..].copy_from_slice(&hash);

        self.drv
            .sign(&self.path, &msg)
            .map(Output::Signature)
            .map_err(|_| Error::SignFail)
    }

    fn set_state(&mut self, s: State) {
        #[cfg(feature = "log")]
        log::debug!("session state: {} -> {}", self.state, s);

        self.state = s;
    }

    /// Fetch current engine state
    pub fn state(&self) -> State {
        self.state
    }

    /// Fetch the number of transaction bytes received in the current session
    pub fn tx_len(&self) -> usize {
        self.tx.len()
    }

    /// Access the approver, for platforms driving confirmation externally
    pub fn approver_mut(&mut self) -> &mut APP {
        &mut self.approver
    }

    /// Reset engine state, discarding (and zeroizing) any signing session
    pub fn reset(&mut self) {
        self.tx.as_mut_slice().zeroize();
        self.tx.clear();

        self.path = IDLE_PATH;
        self.magic = NetworkMagic(0);
        self.state = State::Init;
    }
}
