// src/utils/crypto.rs
//! Cryptographic utilities optimized for blockchain compatibility.
//!
//! Uses Keccak-256 (Ethereum's standard hash function) for all operations.
//!
//! # Proof message contract
//! A proof binds a subject address to a 32-byte proof fingerprint:
//!
//! ```text
//! digest  = keccak256(abi.encode(address subject, bytes32 fingerprint))
//!         = keccak256(12 zero bytes || subject (20) || fingerprint (32))
//! signed  = keccak256("\x19Ethereum Signed Message:\n32" || digest)
//! ```
//!
//! The signature is a 65-byte `r || s || v` secp256k1 signature over `signed`,
//! which is what `signMessage(arrayify(digest))` produces in ethers.js.
//! Binding the subject into the digest stops a proof signed for one subject
//! from being replayed against another.

use ethers::signers::{LocalWallet, WalletError};
use ethers_core::abi::{encode, Token};
use ethers_core::types::{Address, RecoveryMessage, Signature, H256};
use ethers_core::utils::{hash_message, keccak256, secret_key_to_address};
use k256::ecdsa::SigningKey;

/// Computes a Keccak-256 hash of the input data (Ethereum-compatible).
pub fn hash_data(data: &[u8]) -> [u8; 32] {
    keccak256(data)
}

/// Fingerprint of raw proof bytes.
pub fn fingerprint(proof: &[u8]) -> H256 {
    H256::from(hash_data(proof))
}

/// ABI-encoded `(address, bytes32)` pair that the proof digest hashes.
pub fn proof_message(subject: Address, fingerprint: H256) -> Vec<u8> {
    encode(&[
        Token::Address(subject),
        Token::FixedBytes(fingerprint.as_bytes().to_vec()),
    ])
}

/// Digest a proof producer signs for `(subject, fingerprint)`.
pub fn proof_digest(subject: Address, fingerprint: H256) -> H256 {
    H256::from(hash_data(&proof_message(subject, fingerprint)))
}

/// Parses a 65-byte `r || s || v` signature.
pub fn parse_signature(bytes: &[u8]) -> Result<Signature, String> {
    Signature::try_from(bytes).map_err(|e| e.to_string())
}

/// Whether `signature` is a personal-sign signature over `digest` by `subject`.
///
/// Recovery failures count as a negative result, not an error: the
/// signature was well-formed, it just was not produced by `subject`.
pub fn is_signed_by(signature: &Signature, digest: H256, subject: Address) -> bool {
    match signature.recover(RecoveryMessage::Data(digest.as_bytes().to_vec())) {
        Ok(signer) => signer == subject,
        Err(e) => {
            log::debug!("signature recovery failed for digest {:?}: {}", digest, e);
            false
        }
    }
}

/// Address controlled by a secp256k1 signing key.
pub fn address_of(key: &SigningKey) -> Address {
    secret_key_to_address(key)
}

/// Signs a proof the way a proof-producing client does.
pub fn sign_proof(key: &SigningKey, subject: Address, fingerprint: H256) -> Result<Signature, WalletError> {
    let wallet = LocalWallet::from(key.clone());
    wallet.sign_hash(hash_message(proof_digest(subject, fingerprint).as_bytes()))
}
