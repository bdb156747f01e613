// Copyright (c) 2022-2023 The MobileCoin Foundation

//! NEO N3 hardware wallet core
//!
//! This provides a common [Engine][engine] supporting transaction validation
//! and signing for execution on hardware wallets (or emulated devices).
//!
//! Interactions with the [Engine][engine] are performed via [Event][engine::Event]s and
//! [Output][engine::Output]s, or as raw frames via [`Engine::process`][engine::Engine::process],
//! see [ledger_neo_apdu] for APDU objects and wire encodings.
//!
//! ## Operations
//!
//! Application information is available via `GET_APP_NAME`, `GET_VERSION`
//! and the dashboard-class `GET_APP_AND_VERSION` requests.
//!
//! Public keys are requested via [`PublicKeyReq`][ledger_neo_apdu::public_key::PublicKeyReq],
//! returning a [`PublicKeyResp`][ledger_neo_apdu::public_key::PublicKeyResp] containing the
//! uncompressed secp256r1 key for a [BIP44 path][ledger_neo_apdu::path::Bip44Path] accepted by
//! the [derivation policy][bip44::check_path].
//!
//! ### Signing a transaction
//!
//! Signing is a single session of `SIGN_TX` frames:
//!
//! 1. `p1 = 0`: the derivation path, starting a new session
//! 2. `p1 = 1`: the little-endian network magic
//! 3. `p1 = 2..`: the serialized unsigned transaction, one chunk per frame
//!    with `p2 = 0x80` on all but the final chunk
//!
//! On the final chunk the transaction is [validated][tx::parse], rendered to a
//! [summary][confirm::Summary] and presented to the user via the
//! [confirmation gate][confirm::Gate]. Once approved the device signs
//! `magic ‖ SHA-256(tx)` and returns the DER encoded signature.
//!
//! Any failure discards the session, which must be restarted from the
//! derivation path.
//!

#![cfg_attr(not(feature = "std"), no_std)]

pub use ledger_neo_apdu::{self as apdu};

pub mod bip44;

pub mod confirm;

pub mod consts;

pub mod engine;

pub mod helpers;

pub mod tx;
