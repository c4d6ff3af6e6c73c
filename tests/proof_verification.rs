//! Signed proof verification through the public API, using real secp256k1
//! keys the way a proof-producing client would.

use ethers_core::types::{Address, H256};
use identity_authority::utils::crypto::{address_of, fingerprint, sign_proof};
use identity_authority::utils::logging::init_test_logging;
use identity_authority::{CallContext, IdentityAuthority, IdentityError, Role, VerifierStats};
use k256::ecdsa::SigningKey;
use rand::thread_rng;

const NOW: u64 = 1_700_000_000;

fn at(caller: Address) -> CallContext {
    CallContext::new(caller, NOW)
}

struct Fixture {
    authority: IdentityAuthority,
    owner: Address,
    verifier: Address,
}

fn fixture() -> Fixture {
    init_test_logging();
    let owner = Address::repeat_byte(0x10);
    let verifier = Address::repeat_byte(0x20);
    let mut authority = IdentityAuthority::with_defaults(owner);
    authority
        .register_verifier(&at(owner), verifier, "Test Verifier 1", "Test Organization")
        .unwrap();
    Fixture {
        authority,
        owner,
        verifier,
    }
}

fn signed(key: &SigningKey, proof: &[u8]) -> (Address, H256, Vec<u8>) {
    let subject = address_of(key);
    let fp = fingerprint(proof);
    let signature = sign_proof(key, subject, fp).unwrap();
    (subject, fp, signature.to_vec())
}

#[test]
fn test_valid_proof_accepted() {
    let mut f = fixture();
    let key = SigningKey::random(&mut thread_rng());
    let (subject, fp, sig) = signed(&key, b"test proof");

    assert!(f.authority.verify_zkp(&at(f.verifier), subject, fp, &sig).unwrap());
    assert_eq!(
        f.authority.get_verifier_stats(f.verifier),
        VerifierStats {
            total_verifications: 1,
            success_rate: 100
        }
    );
}

#[test]
fn test_proof_signed_by_someone_else_rejected() {
    let mut f = fixture();
    let user = SigningKey::random(&mut thread_rng());
    let impostor = SigningKey::random(&mut thread_rng());
    let subject = address_of(&user);
    let fp = fingerprint(b"test proof");
    let sig = sign_proof(&impostor, subject, fp).unwrap().to_vec();

    assert!(!f.authority.verify_zkp(&at(f.verifier), subject, fp, &sig).unwrap());
    assert_eq!(f.authority.get_verifier_stats(f.verifier).success_rate, 0);
    assert_eq!(f.authority.failed_attempts(f.verifier, subject), 1);
}

#[test]
fn test_proof_for_other_fingerprint_rejected() {
    let mut f = fixture();
    let key = SigningKey::random(&mut thread_rng());
    let (subject, _, sig) = signed(&key, b"original proof");

    let other = fingerprint(b"substituted proof");
    assert!(!f.authority.verify_zkp(&at(f.verifier), subject, other, &sig).unwrap());
}

#[test]
fn test_stats_track_attempts_and_successes() {
    let mut f = fixture();
    let mut rng = thread_rng();
    let forger = SigningKey::random(&mut rng);

    // Three valid, two invalid, interleaved across different subjects.
    for valid in [true, false, true, false, true] {
        let key = SigningKey::random(&mut rng);
        let subject = address_of(&key);
        let fp = fingerprint(subject.as_bytes());
        let signer = if valid { &key } else { &forger };
        let sig = sign_proof(signer, subject, fp).unwrap().to_vec();
        assert_eq!(f.authority.verify_zkp(&at(f.verifier), subject, fp, &sig).unwrap(), valid);
    }

    assert_eq!(
        f.authority.get_verifier_stats(f.verifier),
        VerifierStats {
            total_verifications: 5,
            success_rate: 60
        }
    );
}

#[test]
fn test_fresh_verifier_has_zero_stats() {
    let f = fixture();
    assert_eq!(
        f.authority.get_verifier_stats(f.verifier),
        VerifierStats {
            total_verifications: 0,
            success_rate: 0
        }
    );
    assert_eq!(f.authority.get_verifier_stats(Address::repeat_byte(0x99)).total_verifications, 0);
}

#[test]
fn test_only_verifiers_check_proofs() {
    let mut f = fixture();
    let key = SigningKey::random(&mut thread_rng());
    let (subject, fp, sig) = signed(&key, b"test proof");

    assert!(matches!(
        f.authority.verify_zkp(&at(f.owner), subject, fp, &sig),
        Err(IdentityError::Unauthorized { role: Role::Verifier, .. })
    ));
    assert_eq!(f.authority.get_verifier_stats(f.owner).total_verifications, 0);
}

#[test]
fn test_malformed_signature_is_error_without_counting() {
    let mut f = fixture();
    let key = SigningKey::random(&mut thread_rng());
    let subject = address_of(&key);

    let res = f
        .authority
        .verify_zkp(&at(f.verifier), subject, fingerprint(b"p"), &[0u8; 12]);
    assert!(matches!(res, Err(IdentityError::MalformedSignature(_))));
    assert_eq!(f.authority.get_verifier_stats(f.verifier).total_verifications, 0);
    assert_eq!(f.authority.failed_attempts(f.verifier, subject), 0);
}

#[test]
fn test_forging_verifier_cannot_block_honest_verifier() {
    let mut f = fixture();
    let rogue = Address::repeat_byte(0x66);
    f.authority
        .register_verifier(&at(f.owner), rogue, "Rogue Verifier", "Rogue Org")
        .unwrap();
    let mut rng = thread_rng();
    let key = SigningKey::random(&mut rng);
    let forger = SigningKey::random(&mut rng);
    let subject = address_of(&key);
    let fp = fingerprint(b"proof");
    let forged = sign_proof(&forger, subject, fp).unwrap().to_vec();
    let genuine = sign_proof(&key, subject, fp).unwrap().to_vec();

    let limit = f.authority.config().max_verification_attempts;
    for _ in 0..limit {
        assert!(!f.authority.verify_zkp(&at(rogue), subject, fp, &forged).unwrap());
    }
    assert_eq!(
        f.authority.verify_zkp(&at(rogue), subject, fp, &forged),
        Err(IdentityError::AttemptsExceeded { subject, limit })
    );
    assert_eq!(f.authority.get_verifier_stats(rogue).total_verifications, u64::from(limit));

    assert!(f.authority.verify_zkp(&at(f.verifier), subject, fp, &genuine).unwrap());
    assert!(f.authority.verify_zkp(&at(f.verifier), subject, fp, &genuine).unwrap());
    assert_eq!(
        f.authority.get_verifier_stats(f.verifier),
        VerifierStats {
            total_verifications: 2,
            success_rate: 100
        }
    );

    // Even the rogue's own valid submission goes through and clears its count.
    assert!(f.authority.verify_zkp(&at(rogue), subject, fp, &genuine).unwrap());
    assert_eq!(f.authority.failed_attempts(rogue, subject), 0);
}

#[test]
fn test_paused_authority_rejects_proofs() {
    let mut f = fixture();
    let key = SigningKey::random(&mut thread_rng());
    let (subject, fp, sig) = signed(&key, b"test proof");
    f.authority.pause(&at(f.owner)).unwrap();

    assert_eq!(
        f.authority.verify_zkp(&at(f.verifier), subject, fp, &sig),
        Err(IdentityError::Paused)
    );
    assert_eq!(f.authority.get_verifier_stats(f.verifier).total_verifications, 0);
}
