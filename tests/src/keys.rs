// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Deterministic test keys
//!
//! Test devices derive a secp256r1 key per derivation path as
//! `SHA-256(seed ‖ path)`, so expected public keys and signatures can be
//! computed independently of the device under test.

use p256::ecdsa::{signature::Verifier, Signature, SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};

use ledger_neo_apdu::{path::Bip44Path, public_key::PUBLIC_KEY_LEN, tx::NetworkMagic};

/// Default test seed
pub const SEED: [u8; 32] = [0x42; 32];

/// Derive the signing key for a seed and derivation path
pub fn signing_key(seed: &[u8; 32], path: &Bip44Path) -> SigningKey {
    let d = Sha256::new()
        .chain_update(seed)
        .chain_update(path.to_bytes())
        .finalize();

    SigningKey::from_slice(&d).expect("derived scalar out of range")
}

/// Fetch the uncompressed public key for a seed and derivation path
pub fn public_key(seed: &[u8; 32], path: &Bip44Path) -> [u8; PUBLIC_KEY_LEN] {
    let p = signing_key(seed, path).verifying_key().to_encoded_point(false);

    let mut k = [0u8; PUBLIC_KEY_LEN];
    k.copy_from_slice(p.as_bytes());
    k
}

/// Build the signed message, `magic (LE) ‖ SHA-256(tx)`
pub fn signed_message(magic: NetworkMagic, tx: &[u8]) -> Vec<u8> {
    let mut m = magic.0.to_le_bytes().to_vec();
    m.extend_from_slice(&Sha256::digest(tx));
    m
}

/// Verify a DER encoded transaction signature against an uncompressed public key
pub fn verify(
    key: &[u8; PUBLIC_KEY_LEN],
    magic: NetworkMagic,
    tx: &[u8],
    sig: &[u8],
) -> anyhow::Result<()> {
    let k = VerifyingKey::from_sec1_bytes(key)?;
    let s = Signature::from_der(sig)?;

    k.verify(&signed_message(magic, tx), &s)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use p256::ecdsa::signature::Signer;

    use super::*;

    #[test]
    fn keys_per_path() {
        let a = public_key(&SEED, &Bip44Path::neo(0, 0, 0));
        let b = public_key(&SEED, &Bip44Path::neo(0, 0, 1));

        assert_eq!(a[0], 0x04);
        assert_ne!(a, b);
        assert_eq!(a, public_key(&SEED, &Bip44Path::neo(0, 0, 0)));
    }

    #[test]
    fn sign_verify() {
        let path = Bip44Path::neo(1, 0, 7);
        let tx = [0x01, 0x02, 0x03];

        let s: Signature = signing_key(&SEED, &path).sign(&signed_message(NetworkMagic::MAINNET, &tx));
        let der = s.to_der();
        let key = public_key(&SEED, &path);

        verify(&key, NetworkMagic::MAINNET, &tx, der.as_bytes()).unwrap();
        assert!(verify(&key, NetworkMagic::TESTNET, &tx, der.as_bytes()).is_err());
    }
}
