// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Application constants

use ledger_neo_apdu::{app_info::VersionResp, MAX_APDU_DATA, MAX_TX_LEN, P1_MAX, P1_TX_START};

/// Application name, returned by `GET_APP_NAME`
pub const APP_NAME: &str = "NEO3";

/// Application version, returned by `GET_VERSION`
pub const APP_VERSION: VersionResp = VersionResp::new(0, 1, 0);

/// Application version string, returned by `GET_APP_AND_VERSION`
pub const APP_VERSION_STR: &str = "0.1.0";

/// Maximum BIP44 account index (hardened)
pub const BIP44_MAX_ACCOUNT: u32 = 16;

/// Upper bound (exclusive) for BIP44 address indices
pub const BIP44_MAX_ADDRESS_INDEX: u32 = 5000;

/// Response buffer size, large enough for any engine output and status word
pub const RESPONSE_LEN: usize = 260;

// Every transaction byte must be addressable by a `p1` sequence number
static_assertions::const_assert!(
    MAX_TX_LEN <= (P1_MAX - P1_TX_START + 1) as usize * MAX_APDU_DATA
);
