// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Recognition of standard NEO / GAS transfer and NEO vote scripts
//!
//! Recognition only affects what is shown to the user, scripts that do not
//! match a known template are still signable.

use super::{EcPoint, Reader, ScriptHash};

/// `System.Contract.Call` syscall
const SYSCALL_CONTRACT_CALL: [u8; 5] = [0x41, 0x62, 0x7d, 0x5b, 0x52];

/// `PUSHDATA1 20`
const PUSH_HASH: [u8; 2] = [0x0c, 0x14];

/// `PUSHDATA1 33`
const PUSH_ECPOINT: [u8; 2] = [0x0c, 0x21];

const PUSHNULL: u8 = 0x0b;

/// `PUSH4, PACK, PUSH15 (CallFlags.All), PUSHDATA1 8 "transfer", PUSHDATA1 20`
const TRANSFER_CALL: [u8; 15] = [
    0x14, 0xc0, 0x1f, 0x0c, 0x08, b't', b'r', b'a', b'n', b's', b'f', b'e', b'r', 0x0c, 0x14,
];

/// `PUSH2, PACK, PUSH15 (CallFlags.All), PUSHDATA1 4 "vote", PUSHDATA1 20`
const VOTE_CALL: [u8; 11] = [
    0x12, 0xc0, 0x1f, 0x0c, 0x04, b'v', b'o', b't', b'e', 0x0c, 0x14,
];

/// NEO native contract script hash
pub const NEO_HASH: ScriptHash = [
    0xf5, 0x63, 0xea, 0x40, 0xbc, 0x28, 0x3d, 0x4d, 0x0e, 0x05, 0xc4, 0x8e, 0xa3, 0x05, 0xb3, 0xf2,
    0xa0, 0x73, 0x40, 0xef,
];

/// GAS native contract script hash
pub const GAS_HASH: ScriptHash = [
    0xcf, 0x76, 0xe2, 0x8b, 0xd0, 0x06, 0x2c, 0x4a, 0x47, 0x8e, 0xe3, 0x55, 0x61, 0x01, 0x13, 0x19,
    0xf3, 0xcf, 0xa4, 0xd2,
];

/// Native tokens recognised in transfer scripts
#[derive(Copy, Clone, PartialEq, Eq, Debug, strum::Display)]
pub enum Token {
    #[strum(serialize = "NEO")]
    Neo,
    #[strum(serialize = "GAS")]
    Gas,
}

impl Token {
    /// Fetch token for a contract script hash
    pub fn from_hash(h: &ScriptHash) -> Option<Self> {
        match h {
            h if h == &NEO_HASH => Some(Token::Neo),
            h if h == &GAS_HASH => Some(Token::Gas),
            _ => None,
        }
    }

    /// Number of decimal places
    pub fn decimals(&self) -> u32 {
        match self {
            Token::Neo => 0,
            Token::Gas => 8,
        }
    }
}

/// Recognised script kinds
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum ScriptKind<'a> {
    /// NEP-17 transfer of a native token
    Transfer {
        token: Token,
        amount: i64,
        from: &'a ScriptHash,
        to: &'a ScriptHash,
    },
    /// NEO governance vote, `vote_to` is `None` when removing a vote
    Vote {
        account: &'a ScriptHash,
        vote_to: Option<&'a EcPoint>,
    },
    /// Anything else
    Other,
}

/// Classify a transaction script
pub fn classify(script: &[u8]) -> ScriptKind<'_> {
    if let Some(t) = transfer(script) {
        return t;
    }
    if let Some(v) = vote(script) {
        return v;
    }
    ScriptKind::Other
}

fn expect(r: &mut Reader, v: &[u8]) -> Option<()> {
    match r.read_bytes(v.len())? == v {
        true => Some(()),
        false => None,
    }
}

/// Read an integer push, `PUSH0..PUSH16` or `PUSHINT8..PUSHINT64`
fn read_push_int(r: &mut Reader) -> Option<i64> {
    let op = r.read_u8()?;

    let v = match op {
        0x10..=0x20 => (op - 0x10) as i64,
        0x00 => r.read_u8()? as i8 as i64,
        0x01 => r.read_u16()? as i16 as i64,
        0x02 => r.read_u32()? as i32 as i64,
        0x03 => r.read_i64()?,
        _ => return None,
    };

    Some(v)
}

fn read_hash<'a>(r: &mut Reader<'a>) -> Option<&'a ScriptHash> {
    expect(r, &PUSH_HASH)?;
    r.read_array::<20>()
}

fn transfer(script: &[u8]) -> Option<ScriptKind<'_>> {
    let mut r = Reader::new(script);

    // Arguments are pushed in reverse: data, amount, to, from
    if r.read_u8()? != PUSHNULL {
        return None;
    }
    let amount = read_push_int(&mut r)?;
    let to = read_hash(&mut r)?;
    let from = read_hash(&mut r)?;

    expect(&mut r, &TRANSFER_CALL)?;
    let token = Token::from_hash(r.read_array::<20>()?)?;
    expect(&mut r, &SYSCALL_CONTRACT_CALL)?;

    if !r.is_empty() {
        return None;
    }

    Some(ScriptKind::Transfer {
        token,
        amount,
        from,
        to,
    })
}

fn vote(script: &[u8]) -> Option<ScriptKind<'_>> {
    let mut r = Reader::new(script);

    // Arguments are pushed in reverse: vote_to, account
    let vote_to = match r.read_u8()? {
        PUSHNULL => None,
        v if v == PUSH_ECPOINT[0] => {
            if r.read_u8()? != PUSH_ECPOINT[1] {
                return None;
            }
            Some(r.read_array::<33>()?)
        }
        _ => return None,
    };
    let account = read_hash(&mut r)?;

    expect(&mut r, &VOTE_CALL)?;
    if r.read_array::<20>()? != &NEO_HASH {
        return None;
    }
    expect(&mut r, &SYSCALL_CONTRACT_CALL)?;

    if !r.is_empty() {
        return None;
    }

    Some(ScriptKind::Vote { account, vote_to })
}
