// src/main.rs

//! # Identity Authority - Walkthrough Entry Point
//!
//! Boots an authority from [`Settings`] and drives one subject from
//! enrollment to a verified identity:
//!
//! 1. Load settings (`.env`, `identity.*`, `IDENTITY__*` variables)
//! 2. Store the document bytes in IPFS, or in memory when no node answers
//! 3. Enroll a verifier and a user, upload and verify the document
//! 4. Check a signed proof over the document fingerprint
//!
//! ## Usage
//! `identity-authority [DOCUMENT_PATH] [KIND]`
//!
//! Without a path a built-in sample document is used; `KIND` defaults to
//! `AADHAAR`.

use anyhow::Context;
use identity_authority::utils::crypto::{address_of, fingerprint, sign_proof};
use identity_authority::utils::logging::init_logging;
use identity_authority::utils::serialization::serialize;
use identity_authority::{ContentStore, IdentityAuthority, MemoryContentStore, Settings, SharedAuthority};
use k256::ecdsa::SigningKey;
use rand::thread_rng;

const SAMPLE_DOCUMENT: &[u8] = b"sample identity document";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    init_logging(&settings.log_level);
    let config = settings.system_config()?;

    let mut args = std::env::args().skip(1);
    let document = match args.next() {
        Some(path) => tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading document {}", path))?,
        None => SAMPLE_DOCUMENT.to_vec(),
    };
    let kind = args.next().unwrap_or_else(|| "AADHAAR".to_string());

    // Throwaway keys for the three parties
    let mut rng = thread_rng();
    let admin = address_of(&SigningKey::random(&mut rng));
    let verifier = address_of(&SigningKey::random(&mut rng));
    let user_key = SigningKey::random(&mut rng);
    let user = address_of(&user_key);

    let authority = SharedAuthority::new(IdentityAuthority::new(admin, config)?);
    let expiry_window = authority.config().document_expiry_time;

    let memory = MemoryContentStore::new();
    let handle = match store_in_ipfs(&settings, &document).await {
        Ok(handle) => handle,
        Err(e) => {
            log::warn!("IPFS unavailable ({:#}); keeping the document in memory", e);
            memory.put(&document).await?
        }
    };
    println!("Document stored as {}", handle);

    authority.register_verifier(admin, verifier, "Walkthrough Verifier", "Walkthrough Org")?;
    authority.register_user(verifier, user)?;
    let expires_at = authority.upload_document(user, &handle, &kind, authority.now() + expiry_window)?;
    authority.verify_document(verifier, &handle)?;
    println!("Document {} ({}) verified, expires at {}", handle, kind, expires_at);

    let fp = fingerprint(&document);
    let signature = sign_proof(&user_key, user, fp)?;
    let valid = authority.verify_zkp(verifier, user, fp, &signature.to_vec())?;
    println!("Proof for {:?}: {}", user, if valid { "valid" } else { "invalid" });

    let did = authority.get_did(user)?;
    println!("DID for {:?}: {}", user, serialize(&did)?);
    let stats = authority.get_verifier_stats(verifier);
    println!(
        "Verifier {:?}: {} verifications, {}% successful",
        verifier, stats.total_verifications, stats.success_rate
    );
    println!("Ledger head: {:?}", authority.read(|a| a.ledger_head()));

    Ok(())
}

async fn store_in_ipfs(settings: &Settings, document: &[u8]) -> anyhow::Result<String> {
    let ipfs = settings.ipfs_storage()?;
    Ok(ipfs.put(document).await?)
}
