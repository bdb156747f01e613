// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction validation state machine
//!
//! Each [`Step`] consumes one field of the serialized transaction and either
//! advances to the next step or terminates with the [`ParserStatus`] for
//! that field. Checks are applied strictly in wire order so the reported
//! status always identifies the first offending field.

use ledger_neo_apdu::MAX_TX_LEN;

use super::{
    AttributeType, ParserStatus, Reader, Signer, Transaction, WitnessScope, MAX_ALLOWED_CONTRACTS,
    MAX_ALLOWED_GROUPS, MAX_ATTRIBUTES, MAX_SCRIPT_LEN, MAX_SIGNERS, MIN_SIGNERS,
};

/// Position within a counted list
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Pos {
    pub index: usize,
    pub count: usize,
}

impl Pos {
    fn new(count: usize) -> Self {
        Self { index: 0, count }
    }

    /// Advance to the next entry, `None` when the list is complete
    fn next(self) -> Option<Self> {
        match self.index + 1 < self.count {
            true => Some(Self {
                index: self.index + 1,
                count: self.count,
            }),
            false => None,
        }
    }
}

/// Parser steps, named for the field each step consumes
#[derive(Copy, Clone, PartialEq, Debug, strum::Display)]
pub enum Step {
    Length,
    Version,
    Nonce,
    SystemFee,
    NetworkFee,
    ValidUntilBlock,
    SignerCount,
    SignerAccount(Pos),
    SignerScope(Pos),
    ContractCount(Pos),
    Contract(Pos, Pos),
    GroupCount(Pos),
    Group(Pos, Pos),
    AttributeCount,
    Attribute(Pos),
    Script,
    Trailing,
    Done,
}

/// Incremental transaction parser
pub struct Parser<'a> {
    r: Reader<'a>,
    step: Step,
    tx: Transaction<'a>,
}

/// Parse and validate a serialized unsigned transaction
pub fn parse(buff: &[u8]) -> Result<Transaction<'_>, ParserStatus> {
    let mut p = Parser::new(buff);

    while p.advance()? != Step::Done {}

    Ok(p.tx)
}

impl<'a> Parser<'a> {
    pub fn new(buff: &'a [u8]) -> Self {
        Self {
            r: Reader::new(buff),
            step: Step::Length,
            tx: Transaction::default(),
        }
    }

    /// Current step
    pub fn step(&self) -> Step {
        self.step
    }

    /// Transaction fields parsed so far
    pub fn transaction(&self) -> &Transaction<'a> {
        &self.tx
    }

    /// Consume the field for the current step, returning the next step
    pub fn advance(&mut self) -> Result<Step, ParserStatus> {
        use ParserStatus::*;

        let next = match self.step {
            Step::Length => {
                if self.r.remaining() > MAX_TX_LEN {
                    return Err(InvalidLengthError);
                }
                Step::Version
            }
            Step::Version => {
                let v = self.r.read_u8().ok_or(VersionParsingError)?;
                if v > 0 {
                    return Err(VersionValueError);
                }
                self.tx.version = v;
                Step::Nonce
            }
            Step::Nonce => {
                self.tx.nonce = self.r.read_u32().ok_or(NonceParsingError)?;
                Step::SystemFee
            }
            Step::SystemFee => {
                let v = self.r.read_i64().ok_or(SystemFeeParsingError)?;
                if v < 0 {
                    return Err(SystemFeeValueError);
                }
                self.tx.system_fee = v;
                Step::NetworkFee
            }
            Step::NetworkFee => {
                let v = self.r.read_i64().ok_or(NetworkFeeParsingError)?;
                if v < 0 {
                    return Err(NetworkFeeValueError);
                }
                self.tx.network_fee = v;
                Step::ValidUntilBlock
            }
            Step::ValidUntilBlock => {
                self.tx.valid_until_block = self.r.read_u32().ok_or(ValidUntilBlockParsingError)?;
                Step::SignerCount
            }
            Step::SignerCount => {
                let n = self.r.read_varint().ok_or(SignerLengthParsingError)?;
                if n < MIN_SIGNERS as u64 || n > MAX_SIGNERS as u64 {
                    return Err(SignerLengthValueError);
                }
                Step::SignerAccount(Pos::new(n as usize))
            }
            Step::SignerAccount(s) => {
                let account = self
                    .r
                    .read_array::<20>()
                    .ok_or(SignerAccountParsingError)?;

                if self.tx.signers.iter().any(|v| v.account == account) {
                    return Err(SignerAccountDuplicateError);
                }

                self.tx
                    .signers
                    .push(Signer::new(account))
                    .map_err(|_| SignerLengthValueError)?;

                Step::SignerScope(s)
            }
            Step::SignerScope(s) => {
                let raw = self.r.read_u8().ok_or(SignerScopeParsingError)?;

                // Global may not be combined with any other flag
                if raw & WitnessScope::GLOBAL.bits() != 0 && raw != WitnessScope::GLOBAL.bits() {
                    return Err(SignerScopeValueErrorGlobalFlag);
                }

                // Unsupported flags, including witness rules, are rejected
                let scope =
                    WitnessScope::from_bits(raw).ok_or(SignerScopeValueErrorGlobalFlag)?;

                if let Some(v) = self.tx.signers.get_mut(s.index) {
                    v.scope = scope;
                }

                if scope.contains(WitnessScope::CUSTOM_CONTRACTS) {
                    Step::ContractCount(s)
                } else if scope.contains(WitnessScope::CUSTOM_GROUPS) {
                    Step::GroupCount(s)
                } else {
                    Self::next_signer(s)
                }
            }
            Step::ContractCount(s) => {
                let n = self
                    .r
                    .read_varint()
                    .ok_or(SignerAllowedContractsLengthParsingError)?;
                if n == 0 || n > MAX_ALLOWED_CONTRACTS as u64 {
                    return Err(SignerAllowedContractsLengthValueError);
                }
                Step::Contract(s, Pos::new(n as usize))
            }
            Step::Contract(s, c) => {
                let contract = self
                    .r
                    .read_array::<20>()
                    .ok_or(SignerAllowedContractParsingError)?;

                if let Some(v) = self.tx.signers.get_mut(s.index) {
                    v.allowed_contracts
                        .push(contract)
                        .map_err(|_| SignerAllowedContractsLengthValueError)?;

                    match (c.next(), v.scope.contains(WitnessScope::CUSTOM_GROUPS)) {
                        (Some(c), _) => Step::Contract(s, c),
                        (None, true) => Step::GroupCount(s),
                        (None, false) => Self::next_signer(s),
                    }
                } else {
                    Self::next_signer(s)
                }
            }
            Step::GroupCount(s) => {
                let n = self
                    .r
                    .read_varint()
                    .ok_or(SignerAllowedGroupsLengthParsingError)?;
                if n == 0 || n > MAX_ALLOWED_GROUPS as u64 {
                    return Err(SignerAllowedGroupsLengthValueError);
                }
                Step::Group(s, Pos::new(n as usize))
            }
            Step::Group(s, g) => {
                let group = self
                    .r
                    .read_array::<33>()
                    .ok_or(SignerAllowedGroupsParsingError)?;

                if let Some(v) = self.tx.signers.get_mut(s.index) {
                    v.allowed_groups
                        .push(group)
                        .map_err(|_| SignerAllowedGroupsLengthValueError)?;
                }

                match g.next() {
                    Some(g) => Step::Group(s, g),
                    None => Self::next_signer(s),
                }
            }
            Step::AttributeCount => {
                let n = self
                    .r
                    .read_varint()
                    .ok_or(AttributesLengthParsingError)?;
                if n > MAX_ATTRIBUTES as u64 {
                    return Err(AttributesLengthValueError);
                }
                match n {
                    0 => Step::Script,
                    _ => Step::Attribute(Pos::new(n as usize)),
                }
            }
            Step::Attribute(a) => {
                // Missing type bytes are reported as unsupported
                let t = self
                    .r
                    .read_u8()
                    .and_then(|t| AttributeType::try_from(t).ok())
                    .ok_or(AttributesUnsupportedType)?;

                if self.tx.attributes.contains(&t) {
                    return Err(AttributesDuplicateType);
                }
                self.tx
                    .attributes
                    .push(t)
                    .map_err(|_| AttributesLengthValueError)?;

                match a.next() {
                    Some(a) => Step::Attribute(a),
                    None => Step::Script,
                }
            }
            Step::Script => {
                let n = self.r.read_varint().ok_or(ScriptLengthParsingError)?;
                if n == 0 || n > MAX_SCRIPT_LEN {
                    return Err(ScriptLengthValueError);
                }
                self.tx.script = self
                    .r
                    .read_bytes(n as usize)
                    .ok_or(ScriptLengthValueError)?;
                Step::Trailing
            }
            Step::Trailing => {
                if !self.r.is_empty() {
                    return Err(InvalidLengthError);
                }
                Step::Done
            }
            Step::Done => Step::Done,
        };

        #[cfg(feature = "log")]
        log::trace!("parser {} -> {} (offset {})", self.step, next, self.r.offset());

        self.step = next;

        Ok(next)
    }

    fn next_signer(s: Pos) -> Step {
        match s.next() {
            Some(s) => Step::SignerAccount(s),
            None => Step::AttributeCount,
        }
    }
}
