// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Handle for connected ledger devices
//!
//! This provides methods for interacting with the device
//! and is generic over [Exchange] implementations

use std::{sync::Arc, time::Duration};

use encdec::{Decode, DecodeOwned, Encode};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use ledger_neo_apdu::{
    frame::{Frame, Response, HEADER_LEN},
    path::Bip44Path,
    prelude::*,
    public_key::PUBLIC_KEY_LEN,
    ApduStatic, MAX_APDU_DATA,
};

use crate::{
    session::{check_tx_len, SignSession},
    DeviceError, Error, Exchange,
};

/// Runtime configuration for a [DeviceHandle]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleConfig {
    /// Timeout for APDU requests not requiring user interaction
    pub request_timeout_ms: u64,
    /// Timeout for requests awaiting user confirmation
    pub user_timeout_s: u64,
}

impl Default for HandleConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 2000,
            user_timeout_s: 30,
        }
    }
}

/// Application name and version, as reported by `GET_APP_AND_VERSION`
#[derive(Clone, Debug, PartialEq)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

/// NEO handle for a device implementing [Exchange].
///
/// This is generic over [Exchange] types to support different
/// underlying transports / providers
#[derive(Clone)]
pub struct DeviceHandle<T: Exchange> {
    /// Device handle for communication
    t: Arc<Mutex<T>>,
    cfg: HandleConfig,
}

/// Create a [DeviceHandle] wrapper from a type implementing [Exchange]
impl<T: Exchange> From<T> for DeviceHandle<T> {
    fn from(t: T) -> Self {
        Self::new(t, HandleConfig::default())
    }
}

impl<T: Exchange> DeviceHandle<T> {
    /// Create a new handle with the provided configuration
    pub fn new(t: T, cfg: HandleConfig) -> Self {
        Self {
            t: Arc::new(Mutex::new(t)),
            cfg,
        }
    }

    /// Fetch handle configuration
    pub fn config(&self) -> &HandleConfig {
        &self.cfg
    }

    /// Helper to fetch user interaction timeout
    pub(crate) fn user_timeout(&self) -> Duration {
        Duration::from_secs(self.cfg.user_timeout_s)
    }

    /// Helper to fetch APDU request timeout
    pub(crate) fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.cfg.request_timeout_ms)
    }
}

impl<T: Exchange + Send> DeviceHandle<T> {
    /// Fetch the application name
    pub async fn app_name(&self) -> Result<String, Error> {
        debug!("Requesting app name");

        let data = self
            .request_static::<AppNameReq>(0, 0, &[], self.request_timeout())
            .await?;

        let (resp, _) = AppNameResp::decode(&data).map_err(|_| Error::UnexpectedResponse)?;

        Ok(resp.name.to_string())
    }

    /// Fetch the application version
    pub async fn version(&self) -> Result<VersionResp, Error> {
        debug!("Requesting app version");

        let data = self
            .request_static::<VersionReq>(0, 0, &[], self.request_timeout())
            .await?;

        VersionResp::decode_owned(&data)
            .map(|(v, _)| v)
            .map_err(|_| Error::UnexpectedResponse)
    }

    /// Fetch application name and version via the dashboard class
    pub async fn app_and_version(&self) -> Result<AppInfo, Error> {
        debug!("Requesting app and version");

        let data = self
            .request_static::<AppAndVersionReq>(0, 0, &[], self.request_timeout())
            .await?;

        let (resp, _) =
            AppAndVersionResp::decode(&data).map_err(|_| Error::UnexpectedResponse)?;

        Ok(AppInfo {
            name: resp.name.to_string(),
            version: resp.version.to_string(),
        })
    }

    /// Fetch the uncompressed public key for a derivation path
    ///
    /// With `display` set the device is asked to show the key, and the
    /// request waits for the user timeout.
    pub async fn public_key(
        &self,
        path: &Bip44Path,
        display: bool,
    ) -> Result<[u8; PUBLIC_KEY_LEN], Error> {
        debug!("Requesting public key for path: {}", path);

        let timeout = match display {
            true => self.user_timeout(),
            false => self.request_timeout(),
        };

        let mut buff = [0u8; MAX_APDU_DATA];
        let n = PublicKeyReq::new(*path)
            .encode(&mut buff)
            .map_err(|_| Error::UnexpectedResponse)?;

        let data = match self
            .request_static::<PublicKeyReq>(0, display as u8, &buff[..n], timeout)
            .await
        {
            Err(Error::RequestTimeout) if display => return Err(Error::UserTimeout),
            r => r?,
        };

        match PublicKeyResp::decode_owned(&data) {
            Ok((r, _)) if data.len() == PUBLIC_KEY_LEN => Ok(r.key),
            _ => Err(Error::UnexpectedResponse),
        }
    }

    /// Sign a serialized unsigned transaction, returning the DER encoded signature
    ///
    /// This runs a complete [SignSession], waiting for user approval on the
    /// final transaction chunk.
    pub async fn sign_tx(
        &self,
        path: &Bip44Path,
        magic: NetworkMagic,
        tx: &[u8],
    ) -> Result<Vec<u8>, Error> {
        debug!(
            "Signing transaction ({} bytes) with path {} for network {}",
            tx.len(),
            path,
            magic
        );

        check_tx_len(tx)?;

        SignSession::new(self)
            .path(path)
            .await?
            .magic(magic)
            .await?
            .transaction(tx)
            .await
    }

    /// Send a single `SIGN_TX` frame outside of a [SignSession]
    ///
    /// This bypasses host-side phase ordering, for exercising device
    /// session handling.
    pub async fn sign_tx_raw(&self, p1: u8, p2: u8, data: &[u8]) -> Result<Vec<u8>, Error> {
        self.request_static::<SignTx>(p1, p2, data, self.request_timeout())
            .await
    }

    /// Issue a request for an [ApduStatic] command type
    pub(crate) async fn request_static<REQ: ApduStatic>(
        &self,
        p1: u8,
        p2: u8,
        data: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, Error> {
        self.request(REQ::CLA, REQ::INS, p1, p2, data, timeout)
            .await
    }

    /// Exchange a single command frame, returning the response payload
    /// or a [DeviceError] for non-success status words
    pub(crate) async fn request(
        &self,
        cla: u8,
        ins: u8,
        p1: u8,
        p2: u8,
        data: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, Error> {
        let mut buff = [0u8; HEADER_LEN + MAX_APDU_DATA];

        let f = Frame::new(cla, ins, p1, p2, data)?;
        let n = f.encode(&mut buff)?;

        debug!(
            "TX cla: {:#04x} ins: {:#04x} p1: {:#04x} p2: {:#04x} ({} bytes)",
            cla,
            ins,
            p1,
            p2,
            data.len()
        );
        trace!("TX data: {}", hex::encode(data));

        let r = self.t.lock().await.exchange(&buff[..n], timeout).await?;

        let (resp, _) = Response::decode(&r)?;

        debug!("RX status: {} ({:#06x})", resp.status(), resp.sw);
        trace!("RX data: {}", hex::encode(resp.data));

        if !resp.is_ok() {
            return Err(DeviceError::new(cla, ins, &resp).into());
        }

        Ok(resp.data.to_vec())
    }
}
