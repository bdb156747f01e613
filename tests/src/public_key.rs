// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Public key tests

use log::info;

use ledger_neo::{
    apdu::{path::Bip44Path, StatusWord},
    DeviceHandle, Exchange,
};

use crate::keys;

/// Paths accepted by the derivation policy
pub const PATHS: &[Bip44Path] = &[
    Bip44Path::neo(0, 0, 0),
    Bip44Path::neo(0, 0, 1),
    Bip44Path::neo(0, 1, 0),
    Bip44Path::neo(16, 1, 4999),
];

/// Fetch public keys and compare with those derived from the test seed
pub async fn test<T>(t: T, seed: &[u8; 32]) -> anyhow::Result<()>
where
    T: Exchange + Send,
{
    let d = DeviceHandle::from(t);

    for path in PATHS {
        let expected = keys::public_key(seed, path);

        let key = d.public_key(path, false).await?;
        info!("public key for {}: {}", path, hex::encode(key));

        assert_eq!(key, expected, "public key mismatch for path {path}");
    }

    Ok(())
}

/// Request keys for paths rejected by the derivation policy
pub async fn test_policy<T>(t: T) -> anyhow::Result<()>
where
    T: Exchange + Send,
{
    let d = DeviceHandle::from(t);

    let tests: &[(&str, StatusWord)] = &[
        ("m/45'/888'/0'/0/0", StatusWord::Bip44BadPurpose),
        ("m/44'/60'/0'/0/0", StatusWord::Bip44BadCoinType),
        ("m/44'/888'/0/0/0", StatusWord::Bip44AccountNotHardened),
        ("m/44'/888'/17'/0/0", StatusWord::Bip44BadAccount),
        ("m/44'/888'/0'/2/0", StatusWord::Bip44BadChange),
        ("m/44'/888'/0'/0/5000", StatusWord::Bip44BadAddress),
    ];

    for (p, s) in tests {
        let path: Bip44Path = p.parse()?;

        let e = d
            .public_key(&path, false)
            .await
            .expect_err("path accepted by device");
        info!("path {}: {}", p, e);

        assert_eq!(e.status(), Some(*s), "unexpected status for path {p}");
    }

    Ok(())
}
