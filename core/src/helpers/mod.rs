// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Display formatting helpers

use core::{fmt::Write, str::from_utf8};

use emstr::{helpers::Fractional, EncodeStr};
use heapless::String;

use crate::tx::{ScriptHash, Token};

/// GAS fractions per GAS
pub const SCALAR_GAS: i64 = 100_000_000;

/// NEO is indivisible
pub const SCALAR_NEO: i64 = 1;

/// Maximum significant characters before a value is truncated
const MAX_SF: usize = 14;

fn token_scalar(token: Token) -> i64 {
    match token {
        Token::Neo => SCALAR_NEO,
        Token::Gas => SCALAR_GAS,
    }
}

/// Format a token transfer amount (`NEO 10`, `GAS 1.5`)
///
/// Negative amounts cannot be displayed and return `None`.
pub fn fmt_token_val(value: i64, token: Token, buff: &mut [u8]) -> Option<&str> {
    if value < 0 {
        return None;
    }

    // Write token type
    // NOTE: names are hardcoded to avoid PIC issues on the device
    let mut n = match token {
        Token::Neo => emstr::write!(&mut buff[..], "NEO "),
        Token::Gas => emstr::write!(&mut buff[..], "GAS "),
    }
    .ok()?;

    // Compute and write value using scalar
    let v = emstr::write!(
        &mut buff[n..],
        Fractional::<i64>::new(value, token_scalar(token))
    )
    .ok()?;

    // Backtrack and truncate values if max chars is exceeded
    if v > MAX_SF {
        let end = n + MAX_SF;
        if buff.len() < end + 2 {
            return None;
        }
        buff[end] = b'.';
        buff[end + 1] = b'.';
        n = end + 2;
    } else {
        n += v;
    }

    from_utf8(&buff[..n]).ok()
}

/// Format a GAS fee with a fixed 8 decimal places (`GAS 0.01000000`)
///
/// Fees are validated as non-negative, a negative value returns `None`.
pub fn fmt_gas_fee<const N: usize>(value: i64) -> Option<String<N>> {
    if value < 0 {
        return None;
    }

    let mut s = String::new();
    write!(
        s,
        "GAS {}.{:08}",
        value / SCALAR_GAS,
        value % SCALAR_GAS
    )
    .ok()?;

    Some(s)
}

/// Format a script hash as `0x` prefixed big-endian hex
///
/// Script hashes are serialized little-endian, so bytes are written in reverse.
pub fn fmt_script_hash<const N: usize>(h: &ScriptHash) -> Option<String<N>> {
    let mut s = String::new();

    s.push_str("0x").ok()?;
    for b in h.iter().rev() {
        write!(s, "{:02x}", b).ok()?;
    }

    Some(s)
}

/// Format bytes as hex, in order
pub fn fmt_hex<const N: usize>(b: &[u8]) -> Option<String<N>> {
    let mut s = String::new();

    for v in b {
        write!(s, "{:02x}", v).ok()?;
    }

    Some(s)
}
