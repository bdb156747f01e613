// Copyright (c) 2022-2023 The MobileCoin Foundation

//! NEO N3 transaction model, validation and script recognition
//!
//! [`parse`] validates a serialized unsigned transaction against the
//! device policy, returning a [`Transaction`] borrowing from the input
//! or the [`ParserStatus`] describing the first violation.

use heapless::Vec;

pub use ledger_neo_apdu::ParserStatus;

mod reader;
pub use reader::Reader;

mod parser;
pub use parser::{parse, Parser, Step};

mod script;
pub use script::{classify, ScriptKind, Token, GAS_HASH, NEO_HASH};

/// Script hash (account / contract) length
pub const UINT160_LEN: usize = 20;

/// Compressed secp256r1 point length
pub const ECPOINT_LEN: usize = 33;

/// Minimum signers per transaction
pub const MIN_SIGNERS: usize = 1;

/// Maximum signers per transaction
pub const MAX_SIGNERS: usize = 2;

/// Maximum allowed contracts per signer
pub const MAX_ALLOWED_CONTRACTS: usize = 16;

/// Maximum allowed groups per signer
pub const MAX_ALLOWED_GROUPS: usize = 16;

/// Maximum attributes per transaction
pub const MAX_ATTRIBUTES: usize = 2;

/// Maximum script length
pub const MAX_SCRIPT_LEN: u64 = 0xffff;

/// Account or contract script hash, little-endian as serialized
pub type ScriptHash = [u8; UINT160_LEN];

/// Compressed public key
pub type EcPoint = [u8; ECPOINT_LEN];

bitflags::bitflags! {
    /// Signer witness scope
    pub struct WitnessScope: u8 {
        /// Witness only valid for the entry script
        const CALLED_BY_ENTRY = 0x01;
        /// Witness valid for the listed contracts
        const CUSTOM_CONTRACTS = 0x10;
        /// Witness valid for contracts in the listed groups
        const CUSTOM_GROUPS = 0x20;
        /// Witness valid everywhere, exclusive with all other flags
        const GLOBAL = 0x80;
    }
}

impl core::fmt::Display for WitnessScope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_empty() {
            return write!(f, "None");
        }

        let names = [
            (WitnessScope::GLOBAL, "Global"),
            (WitnessScope::CALLED_BY_ENTRY, "CalledByEntry"),
            (WitnessScope::CUSTOM_CONTRACTS, "CustomContracts"),
            (WitnessScope::CUSTOM_GROUPS, "CustomGroups"),
        ];

        let mut first = true;
        for (_, n) in names.iter().filter(|(s, _)| self.contains(*s)) {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", n)?;
            first = false;
        }

        Ok(())
    }
}

/// Transaction attribute types
#[derive(Copy, Clone, PartialEq, Eq, Debug, num_enum::TryFromPrimitive, strum::Display)]
#[repr(u8)]
pub enum AttributeType {
    HighPriority = 0x01,
}

/// Transaction signer
#[derive(Clone, PartialEq, Debug)]
pub struct Signer<'a> {
    pub account: &'a ScriptHash,
    pub scope: WitnessScope,
    pub allowed_contracts: Vec<&'a ScriptHash, MAX_ALLOWED_CONTRACTS>,
    pub allowed_groups: Vec<&'a EcPoint, MAX_ALLOWED_GROUPS>,
}

impl<'a> Signer<'a> {
    fn new(account: &'a ScriptHash) -> Self {
        Self {
            account,
            scope: WitnessScope::empty(),
            allowed_contracts: Vec::new(),
            allowed_groups: Vec::new(),
        }
    }
}

/// Validated NEO N3 transaction, borrowing from the serialized buffer
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Transaction<'a> {
    pub version: u8,
    pub nonce: u32,
    /// System fee in GAS fractions (8 decimals)
    pub system_fee: i64,
    /// Network fee in GAS fractions (8 decimals)
    pub network_fee: i64,
    pub valid_until_block: u32,
    pub signers: Vec<Signer<'a>, MAX_SIGNERS>,
    pub attributes: Vec<AttributeType, MAX_ATTRIBUTES>,
    pub script: &'a [u8],
}

impl<'a> Transaction<'a> {
    /// Check whether the transaction carries the high priority attribute
    pub fn is_high_priority(&self) -> bool {
        self.attributes.contains(&AttributeType::HighPriority)
    }

    /// Recognise the transaction script
    pub fn script_kind(&self) -> ScriptKind<'a> {
        classify(self.script)
    }
}
