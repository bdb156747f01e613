// Copyright (c) 2022-2023 The MobileCoin Foundation

use ledger_neo_apdu::{ParserStatus, StatusWord};

/// [Engine][super::Engine] errors
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
pub enum Error {
    /// Frame or payload length invalid
    #[cfg_attr(feature = "thiserror", error("wrong data length"))]
    WrongDataLength,

    /// Unsupported class
    #[cfg_attr(feature = "thiserror", error("class not supported"))]
    ClaNotSupported,

    /// Unsupported instruction
    #[cfg_attr(feature = "thiserror", error("instruction not supported"))]
    InsNotSupported,

    /// P1 / P2 out of range for the instruction
    #[cfg_attr(feature = "thiserror", error("wrong P1 / P2"))]
    WrongP1P2,

    /// Output encoding failed
    #[cfg_attr(feature = "thiserror", error("response encoding failed"))]
    EncodingFailed,

    /// Transaction exceeds the maximum length
    #[cfg_attr(feature = "thiserror", error("transaction too long"))]
    WrongTxLength,

    /// Transaction validation failed
    #[cfg_attr(feature = "thiserror", error("transaction parsing failed ({0})"))]
    TxParsing(ParserStatus),

    /// Confirmation could not be presented
    #[cfg_attr(feature = "thiserror", error("user confirmation failed"))]
    ConfirmationFailed,

    /// Frame received out of sequence
    #[cfg_attr(feature = "thiserror", error("unexpected frame in current state"))]
    BadState,

    /// Signer failure
    #[cfg_attr(feature = "thiserror", error("signing failed"))]
    SignFail,

    /// Rejected by the user
    #[cfg_attr(feature = "thiserror", error("rejected by user"))]
    Denied,

    #[cfg_attr(feature = "thiserror", error("BIP44 purpose must be 44'"))]
    Bip44BadPurpose,

    #[cfg_attr(feature = "thiserror", error("BIP44 coin type must be 888'"))]
    Bip44BadCoinType,

    #[cfg_attr(feature = "thiserror", error("BIP44 account must be hardened"))]
    Bip44AccountNotHardened,

    #[cfg_attr(feature = "thiserror", error("BIP44 account out of range"))]
    Bip44BadAccount,

    #[cfg_attr(feature = "thiserror", error("BIP44 change must be 0 or 1"))]
    Bip44BadChange,

    #[cfg_attr(feature = "thiserror", error("BIP44 address index out of range"))]
    Bip44BadAddress,

    /// Network magic is not four bytes
    #[cfg_attr(feature = "thiserror", error("invalid network magic"))]
    MagicParsingFail,

    #[cfg_attr(feature = "thiserror", error("system fee can not be displayed"))]
    DisplaySystemFee,

    #[cfg_attr(feature = "thiserror", error("network fee can not be displayed"))]
    DisplayNetworkFee,

    #[cfg_attr(feature = "thiserror", error("total fee can not be displayed"))]
    DisplayTotalFee,

    #[cfg_attr(feature = "thiserror", error("transfer amount can not be displayed"))]
    DisplayTransferAmount,
}

impl Error {
    /// Fetch the status word reported for an error
    pub fn status(&self) -> StatusWord {
        match self {
            Error::WrongDataLength => StatusWord::WrongDataLength,
            Error::ClaNotSupported => StatusWord::ClaNotSupported,
            Error::InsNotSupported => StatusWord::InsNotSupported,
            Error::WrongP1P2 => StatusWord::WrongP1P2,
            Error::EncodingFailed => StatusWord::WrongResponseLength,
            Error::WrongTxLength => StatusWord::WrongTxLength,
            Error::TxParsing(_) => StatusWord::TxParsingFail,
            Error::ConfirmationFailed => StatusWord::TxUserConfirmationFail,
            Error::BadState => StatusWord::BadState,
            Error::SignFail => StatusWord::SignFail,
            Error::Denied => StatusWord::Deny,
            Error::Bip44BadPurpose => StatusWord::Bip44BadPurpose,
            Error::Bip44BadCoinType => StatusWord::Bip44BadCoinType,
            Error::Bip44AccountNotHardened => StatusWord::Bip44AccountNotHardened,
            Error::Bip44BadAccount => StatusWord::Bip44BadAccount,
            Error::Bip44BadChange => StatusWord::Bip44BadChange,
            Error::Bip44BadAddress => StatusWord::Bip44BadAddress,
            Error::MagicParsingFail => StatusWord::MagicParsingFail,
            Error::DisplaySystemFee => StatusWord::DisplaySystemFeeFail,
            Error::DisplayNetworkFee => StatusWord::DisplayNetworkFeeFail,
            Error::DisplayTotalFee => StatusWord::DisplayTotalFeeFail,
            Error::DisplayTransferAmount => StatusWord::DisplayTransferAmountFail,
        }
    }
}

impl From<ParserStatus> for Error {
    fn from(s: ParserStatus) -> Self {
        Error::TxParsing(s)
    }
}

impl From<Error> for StatusWord {
    fn from(e: Error) -> Self {
        e.status()
    }
}
