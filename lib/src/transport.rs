//! Transport abstraction for exchanging raw APDU frames with a device
//!
// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

#[cfg(feature = "transport_tcp")]
pub use tcp::{TcpOptions, TcpTransport};

use crate::Error;

/// Half-duplex frame exchange with a device
///
/// Implementations send a single encoded command frame and return the
/// complete response (payload followed by the status word). Only one
/// exchange may be in flight at a time.
#[async_trait]
pub trait Exchange {
    /// Send a command frame and wait up to `timeout` for the response
    async fn exchange(&self, frame: &[u8], timeout: Duration) -> Result<Vec<u8>, Error>;
}

/// Shared transports may be used via [Arc]
#[async_trait]
impl<T: Exchange + Send + Sync> Exchange for Arc<T> {
    async fn exchange(&self, frame: &[u8], timeout: Duration) -> Result<Vec<u8>, Error> {
        T::exchange(self, frame, timeout).await
    }
}

#[cfg(feature = "transport_tcp")]
mod tcp {
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    use log::{debug, trace, warn};
    use serde::{Deserialize, Serialize};
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpStream,
        sync::Mutex,
    };

    use ledger_neo_apdu::frame::STATUS_LEN;

    use super::*;

    /// Speculos APDU socket options
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TcpOptions {
        pub addr: IpAddr,
        pub port: u16,
    }

    impl Default for TcpOptions {
        fn default() -> Self {
            Self {
                addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
                port: 9999,
            }
        }
    }

    impl From<&TcpOptions> for SocketAddr {
        fn from(o: &TcpOptions) -> Self {
            SocketAddr::new(o.addr, o.port)
        }
    }

    /// TCP transport for the Speculos simulator APDU socket
    ///
    /// Commands are sent as `LEN (u32 BE) ‖ FRAME`, responses are returned as
    /// `LEN (u32 BE) ‖ DATA (LEN bytes) ‖ SW (2 bytes)`.
    ///
    /// A failed or timed out exchange drops the connection, discarding any
    /// late response. The next exchange reconnects.
    pub struct TcpTransport {
        addr: SocketAddr,
        s: Mutex<Option<TcpStream>>,
    }

    impl TcpTransport {
        /// Connect to a Speculos APDU socket
        pub async fn new(opts: TcpOptions) -> Result<Self, Error> {
            let addr = SocketAddr::from(&opts);
            let s = connect(&addr).await?;

            Ok(Self {
                addr,
                s: Mutex::new(Some(s)),
            })
        }
    }

    async fn connect(addr: &SocketAddr) -> Result<TcpStream, Error> {
        debug!("Connecting to {}", addr);

        TcpStream::connect(addr)
            .await
            .map_err(|e| Error::Transport(anyhow::anyhow!("TCP connect: {}", e)))
    }

    /// Write a framed command and read the framed response
    async fn transact(s: &mut TcpStream, frame: &[u8], timeout: Duration) -> Result<Vec<u8>, Error> {
        let mut req = Vec::with_capacity(frame.len() + 4);
        req.extend_from_slice(&(frame.len() as u32).to_be_bytes());
        req.extend_from_slice(frame);

        trace!("TCP TX: {}", hex::encode(&req));

        s.write_all(&req).await?;

        // Read length header then payload and status word
        let resp = tokio::time::timeout(timeout, async {
            let mut len = [0u8; 4];
            s.read_exact(&mut len).await?;
            let len = u32::from_be_bytes(len) as usize;

            let mut resp = vec![0u8; len + STATUS_LEN];
            s.read_exact(&mut resp).await?;

            Ok::<_, std::io::Error>(resp)
        })
        .await??;

        trace!("TCP RX: {}", hex::encode(&resp));

        Ok(resp)
    }

    #[async_trait]
    impl Exchange for TcpTransport {
        async fn exchange(&self, frame: &[u8], timeout: Duration) -> Result<Vec<u8>, Error> {
            let mut g = self.s.lock().await;

            if g.is_none() {
                *g = Some(connect(&self.addr).await?);
            }
            let s = g
                .as_mut()
                .ok_or_else(|| Error::Transport(anyhow::anyhow!("TCP not connected")))?;

            let r = transact(s, frame, timeout).await;

            if let Err(e) = &r {
                warn!("Dropping connection after failed exchange: {}", e);
                *g = None;
            }

            r
        }
    }
}
