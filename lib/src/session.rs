// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction signing sessions
//!
//! A [SignSession] is a fixed-order typestate over the three `SIGN_TX`
//! phases, so transaction data can only be sent once the derivation path
//! and network magic have been accepted by the device:
//!
//! ```text
//! SignSession<Path> --path()--> SignSession<Magic> --magic()--> SignSession<TxData> --transaction()--> signature
//! ```
//!
//! Any phase returning a non-success status consumes the session, the
//! caller must start again from the derivation path.

use std::marker::PhantomData;

use encdec::Encode;
use log::debug;

use ledger_neo_apdu::{
    chunk::chunks,
    frame::FrameError,
    path::Bip44Path,
    tx::{NetworkMagic, SignTx},
    MAX_APDU_DATA, P1_MAGIC, P1_MAX, P1_PATH, P1_TX_START, P2_LAST, P2_MORE,
};

use crate::{DeviceHandle, Error, Exchange};

/// Session phase: awaiting the derivation path
pub struct Path;

/// Session phase: awaiting the network magic
pub struct Magic;

/// Session phase: awaiting the transaction
pub struct TxData;

/// Signing session, parameterised by the next phase to be sent
pub struct SignSession<'a, T: Exchange, S> {
    h: &'a DeviceHandle<T>,
    _s: PhantomData<S>,
}

impl<'a, T: Exchange + Send, S> SignSession<'a, T, S> {
    fn next<N>(self) -> SignSession<'a, T, N> {
        SignSession {
            h: self.h,
            _s: PhantomData,
        }
    }

    async fn send(&self, p1: u8, p2: u8, data: &[u8], user: bool) -> Result<Vec<u8>, Error> {
        let timeout = match user {
            true => self.h.user_timeout(),
            false => self.h.request_timeout(),
        };

        match self.h.request_static::<SignTx>(p1, p2, data, timeout).await {
            Err(Error::RequestTimeout) if user => Err(Error::UserTimeout),
            r => r,
        }
    }
}

/// Check a transaction fits the `p1` sequence range accepted by the device
pub(crate) fn check_tx_len(tx: &[u8]) -> Result<(), Error> {
    if chunks(tx, MAX_APDU_DATA).len() > (P1_MAX - P1_TX_START + 1) as usize {
        return Err(Error::Frame(FrameError::PayloadTooLarge(tx.len())));
    }
    Ok(())
}

impl<'a, T: Exchange + Send> SignSession<'a, T, Path> {
    /// Create a new signing session using the provided device handle
    pub fn new(h: &'a DeviceHandle<T>) -> Self {
        Self {
            h,
            _s: PhantomData,
        }
    }

    /// Send the derivation path, starting the session on the device
    pub async fn path(self, path: &Bip44Path) -> Result<SignSession<'a, T, Magic>, Error> {
        debug!("Sign session: path {}", path);

        self.send(P1_PATH, P2_LAST, &path.to_bytes(), false).await?;

        Ok(self.next())
    }
}

impl<'a, T: Exchange + Send> SignSession<'a, T, Magic> {
    /// Send the network magic
    pub async fn magic(self, magic: NetworkMagic) -> Result<SignSession<'a, T, TxData>, Error> {
        debug!("Sign session: network {}", magic);

        let mut buff = [0u8; 4];
        let n = magic
            .encode(&mut buff)
            .map_err(|_| Error::Frame(FrameError::BufferTooSmall))?;

        self.send(P1_MAGIC, P2_LAST, &buff[..n], false).await?;

        Ok(self.next())
    }
}

impl<'a, T: Exchange + Send> SignSession<'a, T, TxData> {
    /// Stream the serialized transaction and wait for the user decision,
    /// returning the DER encoded signature
    pub async fn transaction(self, tx: &[u8]) -> Result<Vec<u8>, Error> {
        check_tx_len(tx)?;

        let c = chunks(tx, MAX_APDU_DATA);

        debug!("Sign session: transaction {} bytes in {} chunks", tx.len(), c.len());

        let mut sig = None;

        for (i, (last, data)) in c.enumerate() {
            let p1 = P1_TX_START + i as u8;

            match last {
                false => {
                    self.send(p1, P2_MORE, data, false).await?;
                }
                true => {
                    // Final chunk blocks on user confirmation
                    sig = Some(self.send(p1, P2_LAST, data, true).await?);
                }
            }
        }

        match sig {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(Error::UnexpectedResponse),
        }
    }
}
