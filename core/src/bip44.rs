// Copyright (c) 2022-2023 The MobileCoin Foundation

//! BIP44 derivation path policy
//!
//! Only `m/44'/888'/account'/change/address_index` paths with a bounded
//! account and address index may be used for key requests or signing.

use ledger_neo_apdu::path::{Bip44Path, COIN_TYPE_NEO, HARDENED, PURPOSE};

use crate::{
    consts::{BIP44_MAX_ACCOUNT, BIP44_MAX_ADDRESS_INDEX},
    engine::Error,
};

/// Check a path against the derivation policy, returning an error for the
/// first violated segment
pub fn check_path(path: &Bip44Path) -> Result<(), Error> {
    if path.purpose() != PURPOSE {
        return Err(Error::Bip44BadPurpose);
    }

    if path.coin_type() != COIN_TYPE_NEO {
        return Err(Error::Bip44BadCoinType);
    }

    let account = path.account();
    if account & HARDENED == 0 {
        return Err(Error::Bip44AccountNotHardened);
    }
    if account > HARDENED | BIP44_MAX_ACCOUNT {
        return Err(Error::Bip44BadAccount);
    }

    if path.change() > 1 {
        return Err(Error::Bip44BadChange);
    }

    if path.address_index() >= BIP44_MAX_ADDRESS_INDEX {
        return Err(Error::Bip44BadAddress);
    }

    Ok(())
}
