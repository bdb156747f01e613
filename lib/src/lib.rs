// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Ledger NEO N3 API Library
//!
//! Provides a [DeviceHandle] for interacting with the NEO N3 application
//! over any transport implementing [Exchange], including the Speculos
//! simulator via [TcpTransport][transport::TcpTransport].
//!
//! ```no_run
//! use ledger_neo::{apdu::prelude::*, transport::*, DeviceHandle};
//!
//! # async fn example(tx: &[u8]) -> Result<(), ledger_neo::Error> {
//! let t = TcpTransport::new(TcpOptions::default()).await?;
//! let d = DeviceHandle::from(t);
//!
//! let path: Bip44Path = "m/44'/888'/0'/0/0".parse().unwrap();
//! let key = d.public_key(&path, false).await?;
//! let sig = d.sign_tx(&path, NetworkMagic::MAINNET, tx).await?;
//! # Ok(())
//! # }
//! ```

pub mod transport;
pub use transport::Exchange;

/// Re-export `ledger-neo-apdu` for consumers
pub use ledger_neo_apdu::{self as apdu};

mod handle;
pub use handle::{AppInfo, DeviceHandle, HandleConfig};

pub mod session;
pub use session::SignSession;

mod error;
pub use error::{CommandName, DeviceError, Error};
