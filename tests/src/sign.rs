// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction signing tests

use std::future::Future;

use log::info;

use ledger_neo::{
    apdu::{path::Bip44Path, tx::NetworkMagic, StatusWord},
    DeviceHandle, Error, Exchange,
};

use crate::keys;

/// Sign a transaction and verify the signature against the device public key
///
/// `approve` arms user approval on the device prior to signing.
pub async fn test<T, F>(
    t: T,
    approve: impl Fn() -> F,
    seed: &[u8; 32],
    path: &Bip44Path,
    magic: NetworkMagic,
    tx: &[u8],
) -> anyhow::Result<()>
where
    T: Exchange + Send,
    F: Future<Output = ()>,
{
    let d = DeviceHandle::from(t);

    let key = d.public_key(path, false).await?;
    assert_eq!(key, keys::public_key(seed, path), "public key mismatch");

    approve().await;

    info!(
        "signing {} byte transaction on {} with {}",
        tx.len(),
        magic,
        path
    );
    let sig = d.sign_tx(path, magic, tx).await?;
    info!("signature: {}", hex::encode(&sig));

    keys::verify(&key, magic, tx, &sig)?;

    // Signatures are bound to the network magic
    assert!(
        keys::verify(&key, NetworkMagic(magic.0 ^ 1), tx, &sig).is_err(),
        "signature verified for another network"
    );

    Ok(())
}

/// Sign a transaction with the user rejecting the request
///
/// `deny` arms user rejection on the device prior to signing.
pub async fn test_denied<T, F>(
    t: T,
    deny: impl Fn() -> F,
    path: &Bip44Path,
    tx: &[u8],
) -> anyhow::Result<()>
where
    T: Exchange + Send,
    F: Future<Output = ()>,
{
    let d = DeviceHandle::from(t);

    deny().await;

    let e = d
        .sign_tx(path, NetworkMagic::MAINNET, tx)
        .await
        .expect_err("signing succeeded");
    info!("sign error: {}", e);

    assert_eq!(e.status(), Some(StatusWord::Deny));
    assert!(matches!(e, Error::Device(d) if d.parser.is_none()));

    Ok(())
}

/// Signing sessions must start from the derivation path, check phases sent
/// out of order are rejected and that sessions are discarded on error
pub async fn test_out_of_order<T>(t: T, path: &Bip44Path) -> anyhow::Result<()>
where
    T: Exchange + Send,
{
    let d = DeviceHandle::from(t);

    // Magic without a path
    let e = d
        .sign_tx_raw(0x01, 0x00, &NetworkMagic::MAINNET.0.to_le_bytes())
        .await
        .expect_err("magic accepted without path");
    assert_eq!(e.status(), Some(StatusWord::BadState));

    // Transaction data without magic
    d.sign_tx_raw(0x00, 0x00, &path.to_bytes()).await?;
    let e = d
        .sign_tx_raw(0x02, 0x00, &[0x00])
        .await
        .expect_err("transaction accepted without magic");
    assert_eq!(e.status(), Some(StatusWord::BadState));

    // The failed session is discarded
    let e = d
        .sign_tx_raw(0x01, 0x00, &NetworkMagic::MAINNET.0.to_le_bytes())
        .await
        .expect_err("session retained after error");
    assert_eq!(e.status(), Some(StatusWord::BadState));

    Ok(())
}
