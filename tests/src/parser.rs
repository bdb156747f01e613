// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction parser vector tests
//!
//! Vectors are loaded from `vectors/parser.json`, each containing a
//! serialized unsigned transaction and the expected parser status.

use std::future::Future;

use log::{debug, info};
use serde::Deserialize;
use strum::IntoEnumIterator;

use ledger_neo::{
    apdu::{path::Bip44Path, tx::NetworkMagic, ParserStatus, StatusWord},
    DeviceHandle, Exchange,
};

/// Parser test vector
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Vector {
    pub name: String,
    /// Hex encoded unsigned transaction
    pub tx: String,
    /// Expected parser status name
    pub status: String,
}

impl Vector {
    /// Decode the vector transaction
    pub fn tx(&self) -> anyhow::Result<Vec<u8>> {
        Ok(hex::decode(&self.tx)?)
    }

    /// Resolve the expected parser status
    pub fn status(&self) -> anyhow::Result<ParserStatus> {
        ParserStatus::iter()
            .find(|s| s.to_string() == self.status)
            .ok_or_else(|| anyhow::anyhow!("unknown parser status: {}", self.status))
    }
}

/// Load parser test vectors
pub fn vectors() -> anyhow::Result<Vec<Vector>> {
    let v = serde_json::from_str(include_str!("../vectors/parser.json"))?;
    Ok(v)
}

/// Submit each vector for signing, checking the device either signs or
/// reports the expected parser status
pub async fn test<T, F>(t: T, approve: impl Fn() -> F, vectors: &[Vector]) -> anyhow::Result<()>
where
    T: Exchange + Send,
    F: Future<Output = ()>,
{
    let d = DeviceHandle::from(t);
    let path = Bip44Path::neo(0, 0, 0);

    for v in vectors {
        let tx = v.tx()?;
        let expected = v.status()?;

        debug!("vector '{}' ({} bytes)", v.name, tx.len());

        approve().await;

        let r = d.sign_tx(&path, NetworkMagic::TESTNET, &tx).await;

        match (expected, r) {
            (ParserStatus::ParsingOk, Ok(sig)) => {
                info!("vector '{}': signed ({} bytes)", v.name, sig.len());
            }
            (ParserStatus::ParsingOk, Err(e)) => {
                return Err(anyhow::anyhow!("vector '{}': unexpected error {}", v.name, e));
            }
            (s, Ok(_)) => {
                return Err(anyhow::anyhow!("vector '{}': signed, expected {}", v.name, s));
            }
            (s, Err(e)) => {
                info!("vector '{}': {}", v.name, e);

                assert_eq!(
                    e.status(),
                    Some(StatusWord::TxParsingFail),
                    "vector '{}'",
                    v.name
                );
                assert_eq!(e.parser_status(), Some(s), "vector '{}'", v.name);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn load_vectors() {
        let v = vectors().unwrap();
        assert!(!v.is_empty());

        for t in &v {
            assert!(!t.tx().unwrap().is_empty(), "{}", t.name);
            t.status().unwrap();
        }

        // Every status reachable via SIGN_TX is covered, empty transactions
        // are rejected before parsing
        let covered: Vec<_> = v.iter().map(|t| t.status().unwrap()).collect();
        for s in ParserStatus::iter() {
            let unreachable = matches!(
                s,
                ParserStatus::VersionParsingError
                    | ParserStatus::SignerScopeGroupsNotAllowedError
                    | ParserStatus::SignerScopeContractsNotAllowedError
            );
            if !unreachable {
                assert!(covered.contains(&s), "missing vector for {s}");
            }
        }
    }
}
