// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Status words and transaction parser statuses
//!
//! Every response frame ends in a [`StatusWord`]. A [`StatusWord::TxParsingFail`]
//! response carries a single payload byte holding the signed [`ParserStatus`]
//! reported by the transaction validator.

use strum::{Display, EnumIter};

/// Response status words
///
/// The mapping from raw `u16` values is total, codes without a known meaning
/// are preserved as [`StatusWord::Unknown`].
#[derive(Copy, Clone, PartialEq, Eq, Debug, EnumIter)]
pub enum StatusWord {
    /// Success
    Ok,
    /// Rejected by user
    Deny,
    /// Wrong P1 or P2
    WrongP1P2,
    /// Wrong data length
    WrongDataLength,
    /// Instruction not supported
    InsNotSupported,
    /// Class not supported
    ClaNotSupported,
    /// Response would exceed the response buffer
    WrongResponseLength,
    /// Transaction exceeds the maximum length
    WrongTxLength,
    /// Transaction failed validation
    TxParsingFail,
    /// User confirmation failed
    TxUserConfirmationFail,
    /// Command received out of order
    BadState,
    /// Signing failed
    SignFail,
    /// BIP44 purpose is not 44'
    Bip44BadPurpose,
    /// BIP44 coin type is not 888'
    Bip44BadCoinType,
    /// BIP44 account is not hardened
    Bip44AccountNotHardened,
    /// BIP44 account out of range
    Bip44BadAccount,
    /// BIP44 change is not 0 or 1
    Bip44BadChange,
    /// BIP44 address index out of range
    Bip44BadAddress,
    /// Network magic could not be read
    MagicParsingFail,
    /// System fee could not be formatted
    DisplaySystemFeeFail,
    /// Network fee could not be formatted
    DisplayNetworkFeeFail,
    /// Total fee could not be computed or formatted
    DisplayTotalFeeFail,
    /// Transfer amount could not be formatted
    DisplayTransferAmountFail,
    /// Script hash could not be converted to an address
    ConvertToAddressFail,
    /// Unrecognised status word
    Unknown(u16),
}

impl StatusWord {
    /// Fetch the wire value for a status word
    pub fn code(&self) -> u16 {
        match self {
            StatusWord::Ok => 0x9000,
            StatusWord::Deny => 0x6985,
            StatusWord::WrongP1P2 => 0x6a86,
            StatusWord::WrongDataLength => 0x6a87,
            StatusWord::InsNotSupported => 0x6d00,
            StatusWord::ClaNotSupported => 0x6e00,
            StatusWord::WrongResponseLength => 0xb000,
            StatusWord::WrongTxLength => 0xb001,
            StatusWord::TxParsingFail => 0xb002,
            StatusWord::TxUserConfirmationFail => 0xb003,
            StatusWord::BadState => 0xb004,
            StatusWord::SignFail => 0xb005,
            StatusWord::Bip44BadPurpose => 0xb100,
            StatusWord::Bip44BadCoinType => 0xb101,
            StatusWord::Bip44AccountNotHardened => 0xb102,
            StatusWord::Bip44BadAccount => 0xb103,
            StatusWord::Bip44BadChange => 0xb104,
            StatusWord::Bip44BadAddress => 0xb105,
            StatusWord::MagicParsingFail => 0xb106,
            StatusWord::DisplaySystemFeeFail => 0xb107,
            StatusWord::DisplayNetworkFeeFail => 0xb108,
            StatusWord::DisplayTotalFeeFail => 0xb109,
            StatusWord::DisplayTransferAmountFail => 0xb10a,
            StatusWord::ConvertToAddressFail => 0xb200,
            StatusWord::Unknown(v) => *v,
        }
    }
}

impl core::fmt::Display for StatusWord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StatusWord::Ok => f.write_str("OK"),
            StatusWord::Deny => f.write_str("signing denied"),
            StatusWord::WrongP1P2 => f.write_str("wrong P1 / P2"),
            StatusWord::WrongDataLength => f.write_str("wrong data length"),
            StatusWord::InsNotSupported => f.write_str("instruction not supported"),
            StatusWord::ClaNotSupported => f.write_str("class not supported"),
            StatusWord::WrongResponseLength => f.write_str("wrong response length"),
            StatusWord::WrongTxLength => f.write_str("wrong transaction length"),
            StatusWord::TxParsingFail => f.write_str("transaction parsing failed"),
            StatusWord::TxUserConfirmationFail => f.write_str("user confirmation failed"),
            StatusWord::BadState => f.write_str("bad state"),
            StatusWord::SignFail => f.write_str("signature failed"),
            StatusWord::Bip44BadPurpose => f.write_str("bad BIP44 purpose"),
            StatusWord::Bip44BadCoinType => f.write_str("bad BIP44 coin type"),
            StatusWord::Bip44AccountNotHardened => f.write_str("BIP44 account not hardened"),
            StatusWord::Bip44BadAccount => f.write_str("bad BIP44 account"),
            StatusWord::Bip44BadChange => f.write_str("bad BIP44 change"),
            StatusWord::Bip44BadAddress => f.write_str("bad BIP44 address index"),
            StatusWord::MagicParsingFail => f.write_str("network magic parsing failed"),
            StatusWord::DisplaySystemFeeFail => f.write_str("system fee display failed"),
            StatusWord::DisplayNetworkFeeFail => f.write_str("network fee display failed"),
            StatusWord::DisplayTotalFeeFail => f.write_str("total fee display failed"),
            StatusWord::DisplayTransferAmountFail => f.write_str("transfer amount display failed"),
            StatusWord::ConvertToAddressFail => f.write_str("address conversion failed"),
            StatusWord::Unknown(v) => write!(f, "unknown status {v:#06x}"),
        }
    }
}

impl From<u16> for StatusWord {
    fn from(v: u16) -> Self {
        match v {
            0x9000 => StatusWord::Ok,
            0x6985 => StatusWord::Deny,
            0x6a86 => StatusWord::WrongP1P2,
            0x6a87 => StatusWord::WrongDataLength,
            0x6d00 => StatusWord::InsNotSupported,
            0x6e00 => StatusWord::ClaNotSupported,
            0xb000 => StatusWord::WrongResponseLength,
            0xb001 => StatusWord::WrongTxLength,
            0xb002 => StatusWord::TxParsingFail,
            0xb003 => StatusWord::TxUserConfirmationFail,
            0xb004 => StatusWord::BadState,
            0xb005 => StatusWord::SignFail,
            0xb100 => StatusWord::Bip44BadPurpose,
            0xb101 => StatusWord::Bip44BadCoinType,
            0xb102 => StatusWord::Bip44AccountNotHardened,
            0xb103 => StatusWord::Bip44BadAccount,
            0xb104 => StatusWord::Bip44BadChange,
            0xb105 => StatusWord::Bip44BadAddress,
            0xb106 => StatusWord::MagicParsingFail,
            0xb107 => StatusWord::DisplaySystemFeeFail,
            0xb108 => StatusWord::DisplayNetworkFeeFail,
            0xb109 => StatusWord::DisplayTotalFeeFail,
            0xb10a => StatusWord::DisplayTransferAmountFail,
            0xb200 => StatusWord::ConvertToAddressFail,
            _ => StatusWord::Unknown(v),
        }
    }
}

impl From<StatusWord> for u16 {
    fn from(s: StatusWord) -> Self {
        s.code()
    }
}

/// Transaction validator terminal statuses, encoded as a signed byte
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Debug,
    Display,
    EnumIter,
    num_enum::TryFromPrimitive,
    num_enum::IntoPrimitive,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(i8)]
pub enum ParserStatus {
    ParsingOk = 1,
    InvalidLengthError = -1,
    VersionParsingError = -2,
    VersionValueError = -3,
    NonceParsingError = -4,
    SystemFeeParsingError = -5,
    SystemFeeValueError = -6,
    NetworkFeeParsingError = -7,
    NetworkFeeValueError = -8,
    ValidUntilBlockParsingError = -9,
    SignerLengthParsingError = -10,
    SignerLengthValueError = -11,
    SignerAccountParsingError = -12,
    SignerAccountDuplicateError = -13,
    SignerScopeParsingError = -14,
    SignerScopeValueErrorGlobalFlag = -15,
    SignerAllowedContractsLengthParsingError = -16,
    SignerAllowedContractsLengthValueError = -17,
    SignerAllowedContractParsingError = -18,
    SignerAllowedGroupsLengthParsingError = -19,
    SignerAllowedGroupsLengthValueError = -20,
    SignerAllowedGroupsParsingError = -21,
    AttributesLengthParsingError = -22,
    AttributesLengthValueError = -23,
    AttributesUnsupportedType = -24,
    AttributesDuplicateType = -25,
    ScriptLengthParsingError = -26,
    ScriptLengthValueError = -27,
    /// Reported by firmware builds that reject custom group scopes
    SignerScopeGroupsNotAllowedError = -28,
    /// Reported by firmware builds that reject custom contract scopes
    SignerScopeContractsNotAllowedError = -29,
}

impl ParserStatus {
    /// Decode a parser status from a `SW_TX_PARSING_FAIL` payload byte
    pub fn from_byte(b: u8) -> Option<Self> {
        Self::try_from(b as i8).ok()
    }

    /// Encode a parser status to a payload byte
    pub fn to_byte(self) -> u8 {
        i8::from(self) as u8
    }
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn status_word_lookup() {
        let tests = &[
            (0x9000, StatusWord::Ok),
            (0x6985, StatusWord::Deny),
            (0x6a86, StatusWord::WrongP1P2),
            (0xb002, StatusWord::TxParsingFail),
            (0xb106, StatusWord::MagicParsingFail),
            (0xb200, StatusWord::ConvertToAddressFail),
        ];

        for (v, s) in tests {
            assert_eq!(StatusWord::from(*v), *s);
            assert_eq!(s.code(), *v);
        }
    }

    #[test]
    fn status_word_total() {
        // Every known status round-trips through its code
        let known: Vec<_> = StatusWord::iter()
            .filter(|s| !matches!(s, StatusWord::Unknown(_)))
            .collect();
        for s in &known {
            assert_eq!(StatusWord::from(s.code()), *s, "{s}");
            assert_ne!(s.code(), 0x0000, "{s}");
        }

        // Codes are distinct
        let mut codes: Vec<_> = known.iter().map(|s| s.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), known.len());

        // Unknown codes are preserved
        for v in [0x0000, 0x6a80, 0xb006, 0xb10b, 0xffff] {
            assert_eq!(StatusWord::from(v), StatusWord::Unknown(v));
            assert_eq!(StatusWord::from(v).code(), v);
        }
    }

    #[test]
    fn status_word_display() {
        assert_eq!(StatusWord::Deny.to_string(), "signing denied");
        assert_eq!(StatusWord::Unknown(0x1234).to_string(), "unknown status 0x1234");
    }

    #[test]
    fn parser_status_bytes() {
        assert_eq!(ParserStatus::ParsingOk.to_byte(), 0x01);
        assert_eq!(ParserStatus::InvalidLengthError.to_byte(), 0xff);
        assert_eq!(ParserStatus::ScriptLengthValueError.to_byte(), 0xe5);

        for s in ParserStatus::iter() {
            assert_eq!(ParserStatus::from_byte(s.to_byte()), Some(s));
        }

        assert_eq!(ParserStatus::from_byte(0x00), None);
        assert_eq!(ParserStatus::from_byte(0x02), None);
        assert_eq!(ParserStatus::from_byte(0xe2), None);
    }

    #[test]
    fn parser_status_names() {
        assert_eq!(ParserStatus::ParsingOk.to_string(), "PARSING_OK");
        assert_eq!(
            ParserStatus::SignerScopeValueErrorGlobalFlag.to_string(),
            "SIGNER_SCOPE_VALUE_ERROR_GLOBAL_FLAG"
        );
        assert_eq!(
            ParserStatus::AttributesUnsupportedType.to_string(),
            "ATTRIBUTES_UNSUPPORTED_TYPE"
        );
    }
}
