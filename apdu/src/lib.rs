// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Protocol / APDU definitions for NEO N3 app communication
//!
//! This module provides the protocol definitions and reference encodings
//! for communication between a host and a NEO N3 hardware wallet application.
//!
//! Every exchange is a single command frame ([`frame::Frame`]) answered by a single
//! response frame ([`frame::Response`]) carrying a payload and a trailing
//! [`StatusWord`]. Payloads larger than a frame are split by [`chunk::chunks`]
//! and streamed as a sequence of `SIGN_TX` frames.
//!
//! Multi-byte integers in payloads are little-endian, with the exception of
//! BIP44 path segments which are big-endian (see [`path::Bip44Path`]).
//!

#![cfg_attr(not(any(test, feature = "thiserror")), no_std)]

pub use ledger_proto::{ApduError, ApduStatic};

pub mod app_info;
pub mod chunk;
pub mod frame;
pub mod path;
pub mod prelude;
pub mod public_key;
pub mod status;
pub mod tx;

pub use status::{ParserStatus, StatusWord};

/// NEO N3 APDU class
pub const NEO_APDU_CLA: u8 = 0x80;

/// BOLOS dashboard class, used for [`app_info::AppAndVersionReq`]
pub const BOLOS_APDU_CLA: u8 = 0xb0;

/// Maximum payload carried by a single command frame
pub const MAX_APDU_DATA: usize = 255;

/// Maximum serialized (unsigned) transaction length accepted by the device
pub const MAX_TX_LEN: usize = 1024;

/// Highest `p1` sequence number accepted for `SIGN_TX`
pub const P1_MAX: u8 = 0x06;

/// `SIGN_TX` phase: BIP44 derivation path
pub const P1_PATH: u8 = 0x00;

/// `SIGN_TX` phase: network magic
pub const P1_MAGIC: u8 = 0x01;

/// `SIGN_TX` phase: first transaction chunk, incremented per chunk
pub const P1_TX_START: u8 = 0x02;

/// `p2` for the final frame of a phase
pub const P2_LAST: u8 = 0x00;

/// `p2` continuation flag, more frames follow in this phase
pub const P2_MORE: u8 = 0x80;

/// NEO N3 APDU instruction codes
#[derive(Copy, Clone, Debug, PartialEq, num_enum::TryFromPrimitive, strum::Display)]
#[repr(u8)]
pub enum Instruction {
    /// Fetch application name
    #[strum(serialize = "GET_APP_NAME")]
    GetAppName = 0x00,

    /// Fetch application version
    #[strum(serialize = "GET_VERSION")]
    GetVersion = 0x01,

    /// Stream a transaction for signing
    #[strum(serialize = "SIGN_TX")]
    SignTx = 0x02,

    /// Fetch the public key for a derivation path
    #[strum(serialize = "GET_PUBLIC_KEY")]
    GetPublicKey = 0x04,
}
