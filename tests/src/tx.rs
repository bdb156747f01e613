// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Unsigned transaction builder for tests
//!
//! Produces NEO N3 unsigned transaction encodings, with overrides for
//! length prefixes and truncation points so malformed transactions can be
//! built field by field.

/// NEO native contract script hash
pub const NEO_HASH: [u8; 20] = [
    0xf5, 0x63, 0xea, 0x40, 0xbc, 0x28, 0x3d, 0x4d, 0x0e, 0x05, 0xc4, 0x8e, 0xa3, 0x05, 0xb3, 0xf2,
    0xa0, 0x73, 0x40, 0xef,
];

/// GAS native contract script hash
pub const GAS_HASH: [u8; 20] = [
    0xcf, 0x76, 0xe2, 0x8b, 0xd0, 0x06, 0x2c, 0x4a, 0x47, 0x8e, 0xe3, 0x55, 0x61, 0x01, 0x13, 0x19,
    0xf3, 0xcf, 0xa4, 0xd2,
];

/// Default signer account
pub const ACCOUNT: [u8; 20] = [0xaa; 20];

/// Default transfer destination
pub const DESTINATION: [u8; 20] = [0x11; 20];

/// Witness scope bits
pub mod scope {
    pub const CALLED_BY_ENTRY: u8 = 0x01;
    pub const CUSTOM_CONTRACTS: u8 = 0x10;
    pub const CUSTOM_GROUPS: u8 = 0x20;
    pub const GLOBAL: u8 = 0x80;
}

/// Transaction signer
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SignerSpec {
    pub account: [u8; 20],
    /// Raw scope byte
    pub scope: u8,
    pub contracts: Vec<[u8; 20]>,
    /// Override for the allowed contracts count
    pub contract_count: Option<u64>,
    pub groups: Vec<[u8; 33]>,
    /// Override for the allowed groups count
    pub group_count: Option<u64>,
}

impl SignerSpec {
    pub fn with_scope(account: [u8; 20], scope: u8) -> Self {
        Self {
            account,
            scope,
            ..Default::default()
        }
    }

    pub fn called_by_entry(account: [u8; 20]) -> Self {
        Self::with_scope(account, scope::CALLED_BY_ENTRY)
    }

    pub fn global(account: [u8; 20]) -> Self {
        Self::with_scope(account, scope::GLOBAL)
    }

    /// Custom contracts scope with `n` allowed contracts
    pub fn contracts(account: [u8; 20], n: usize) -> Self {
        Self {
            account,
            scope: scope::CUSTOM_CONTRACTS,
            contracts: (0..n).map(|i| [0x30 + i as u8; 20]).collect(),
            contract_count: Some(n as u64),
            ..Default::default()
        }
    }

    /// Custom groups scope with `n` allowed groups
    pub fn groups(account: [u8; 20], n: usize) -> Self {
        let groups = (0..n)
            .map(|i| {
                let mut g = [0x60 + i as u8; 33];
                g[0] = 0x02;
                g
            })
            .collect();

        Self {
            account,
            scope: scope::CUSTOM_GROUPS,
            groups,
            ..Default::default()
        }
    }

    /// Write the signer encoding
    pub fn write(&self, buff: &mut Vec<u8>) {
        buff.extend_from_slice(&self.account);
        buff.push(self.scope);

        if !self.contracts.is_empty() || self.contract_count.is_some() {
            let n = self.contract_count.unwrap_or(self.contracts.len() as u64);
            write_varint(buff, n);
            self.contracts
                .iter()
                .for_each(|c| buff.extend_from_slice(c));
        }

        if !self.groups.is_empty() || self.group_count.is_some() {
            let n = self.group_count.unwrap_or(self.groups.len() as u64);
            write_varint(buff, n);
            self.groups.iter().for_each(|g| buff.extend_from_slice(g));
        }
    }
}

/// Unsigned transaction builder
#[derive(Clone, Debug, PartialEq)]
pub struct TxBuilder {
    pub version: u8,
    pub nonce: u32,
    pub system_fee: i64,
    pub network_fee: i64,
    pub valid_until_block: u32,
    pub signers: Vec<SignerSpec>,
    /// Override for the signer count
    pub signer_count: Option<u64>,
    /// Raw attribute type bytes
    pub attributes: Vec<u8>,
    /// Override for the attribute count
    pub attribute_count: Option<u64>,
    pub script: Vec<u8>,
    /// Override for the script length
    pub script_len: Option<u64>,
    /// End the encoding after the signers
    pub truncate_after_signers: bool,
    /// End the encoding after the attribute count
    pub truncate_after_attributes: bool,
}

impl Default for TxBuilder {
    /// Transfer of 10 NEO with a single `CalledByEntry` signer
    fn default() -> Self {
        Self {
            version: 0,
            nonce: 0x62e3_4c50,
            system_fee: 997_775,
            network_fee: 1_227_390,
            valid_until_block: 2_109_187,
            signers: vec![SignerSpec::called_by_entry(ACCOUNT)],
            signer_count: None,
            attributes: vec![],
            attribute_count: None,
            script: transfer_script(&NEO_HASH, &ACCOUNT, &DESTINATION, 10),
            script_len: None,
            truncate_after_signers: false,
            truncate_after_attributes: false,
        }
    }
}

impl TxBuilder {
    /// Build the unsigned transaction encoding
    pub fn build(&self) -> Vec<u8> {
        let mut b = vec![self.version];

        b.extend_from_slice(&self.nonce.to_le_bytes());
        b.extend_from_slice(&self.system_fee.to_le_bytes());
        b.extend_from_slice(&self.network_fee.to_le_bytes());
        b.extend_from_slice(&self.valid_until_block.to_le_bytes());

        write_varint(
            &mut b,
            self.signer_count.unwrap_or(self.signers.len() as u64),
        );
        self.signers.iter().for_each(|s| s.write(&mut b));

        if self.truncate_after_signers {
            return b;
        }

        write_varint(
            &mut b,
            self.attribute_count
                .unwrap_or(self.attributes.len() as u64),
        );

        if self.truncate_after_attributes {
            return b;
        }

        b.extend_from_slice(&self.attributes);

        write_varint(&mut b, self.script_len.unwrap_or(self.script.len() as u64));
        b.extend_from_slice(&self.script);

        b
    }
}

/// Write a NEO variable length integer
pub fn write_varint(buff: &mut Vec<u8>, v: u64) {
    match v {
        0..=0xfc => buff.push(v as u8),
        0xfd..=0xffff => {
            buff.push(0xfd);
            buff.extend_from_slice(&(v as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            buff.push(0xfe);
            buff.extend_from_slice(&(v as u32).to_le_bytes());
        }
        _ => {
            buff.push(0xff);
            buff.extend_from_slice(&v.to_le_bytes());
        }
    }
}

/// Write the shortest integer push for a value
fn push_int(buff: &mut Vec<u8>, v: i64) {
    match v {
        0..=16 => buff.push(0x10 + v as u8),
        _ if i8::try_from(v).is_ok() => {
            buff.push(0x00);
            buff.push(v as i8 as u8);
        }
        _ if i16::try_from(v).is_ok() => {
            buff.push(0x01);
            buff.extend_from_slice(&(v as i16).to_le_bytes());
        }
        _ if i32::try_from(v).is_ok() => {
            buff.push(0x02);
            buff.extend_from_slice(&(v as i32).to_le_bytes());
        }
        _ => {
            buff.push(0x03);
            buff.extend_from_slice(&v.to_le_bytes());
        }
    }
}

fn push_hash(buff: &mut Vec<u8>, h: &[u8; 20]) {
    buff.extend_from_slice(&[0x0c, 0x14]);
    buff.extend_from_slice(h);
}

/// `System.Contract.Call` syscall
const SYSCALL_CONTRACT_CALL: [u8; 5] = [0x41, 0x62, 0x7d, 0x5b, 0x52];

/// Build a NEP-17 `transfer(from, to, amount, null)` script for a token contract
pub fn transfer_script(token: &[u8; 20], from: &[u8; 20], to: &[u8; 20], amount: i64) -> Vec<u8> {
    let mut s = vec![0x0b];

    push_int(&mut s, amount);
    push_hash(&mut s, to);
    push_hash(&mut s, from);

    // PUSH4, PACK, PUSH15, PUSHDATA1 "transfer"
    s.extend_from_slice(&[0x14, 0xc0, 0x1f, 0x0c, 0x08]);
    s.extend_from_slice(b"transfer");
    push_hash(&mut s, token);
    s.extend_from_slice(&SYSCALL_CONTRACT_CALL);

    s
}

/// Build a NEO `vote(account, vote_to)` script, `None` removes an existing vote
pub fn vote_script(account: &[u8; 20], vote_to: Option<&[u8; 33]>) -> Vec<u8> {
    let mut s = vec![];

    match vote_to {
        Some(k) => {
            s.extend_from_slice(&[0x0c, 0x21]);
            s.extend_from_slice(k);
        }
        None => s.push(0x0b),
    }
    push_hash(&mut s, account);

    // PUSH2, PACK, PUSH15, PUSHDATA1 "vote"
    s.extend_from_slice(&[0x12, 0xc0, 0x1f, 0x0c, 0x04]);
    s.extend_from_slice(b"vote");
    push_hash(&mut s, &NEO_HASH);
    s.extend_from_slice(&SYSCALL_CONTRACT_CALL);

    s
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_layout() {
        let b = TxBuilder::default();
        let raw = b.build();

        assert_eq!(raw[0], 0);
        assert_eq!(&raw[1..5], &b.nonce.to_le_bytes());
        assert_eq!(&raw[5..13], &b.system_fee.to_le_bytes());
        assert_eq!(&raw[13..21], &b.network_fee.to_le_bytes());
        assert_eq!(&raw[21..25], &b.valid_until_block.to_le_bytes());
        assert_eq!(raw[25], 1);
        assert_eq!(&raw[26..46], &ACCOUNT);
        assert_eq!(raw[46], scope::CALLED_BY_ENTRY);
        assert_eq!(raw[47], 0);
        assert_eq!(raw[48] as usize, b.script.len());
        assert_eq!(&raw[49..], &b.script[..]);
        assert!(raw.len() < 255);
    }

    #[test]
    fn varints() {
        let tests: &[(u64, &[u8])] = &[
            (0, &[0x00]),
            (0xfc, &[0xfc]),
            (0xfd, &[0xfd, 0xfd, 0x00]),
            (0x1_0000, &[0xfe, 0x00, 0x00, 0x01, 0x00]),
            (0x1_0000_0000, &[0xff, 0, 0, 0, 0, 1, 0, 0, 0]),
        ];

        for (v, e) in tests {
            let mut b = vec![];
            write_varint(&mut b, *v);
            assert_eq!(&b, e, "varint {v}");
        }
    }

    #[test]
    fn script_pushes() {
        let s = transfer_script(&NEO_HASH, &ACCOUNT, &DESTINATION, 10);
        assert_eq!(&s[..2], &[0x0b, 0x1a]);
        assert_eq!(s.len(), 86);

        let s = transfer_script(&GAS_HASH, &ACCOUNT, &DESTINATION, -1);
        assert_eq!(&s[..3], &[0x0b, 0x00, 0xff]);

        let s = transfer_script(&GAS_HASH, &ACCOUNT, &DESTINATION, 100_000);
        assert_eq!(&s[..6], &[0x0b, 0x02, 0xa0, 0x86, 0x01, 0x00]);

        assert_eq!(vote_script(&ACCOUNT, None).len(), 1 + 22 + 9 + 22 + 5);
    }
}
