// src/lib.rs

//! # Identity Authority
//!
//! Role-gated digital identity authority: grants and revokes capability
//! roles, verifies signed identity proofs, records document attestations
//! for externally stored content, and derives each subject's verified state
//! from those attestations.
//!
//! ## Architecture Overview
//! 1. **Contracts Layer**: role authority, system configuration, document
//!    store and identity registry, each owning one slice of state
//! 2. **Services Layer**: [`IdentityAuthority`] composes the contracts into
//!    one transactional state machine; [`SharedAuthority`] serializes access
//!    across threads
//! 3. **Storage Layer**: content store adapters (IPFS, in-memory) used by
//!    clients to turn document bytes into handles
//! 4. **Cryptography Layer**: Keccak-256 proof digests and secp256k1
//!    signature recovery
//!
//! ## Example
//! ```no_run
//! use identity_authority::{CallContext, IdentityAuthority};
//! use ethers_core::types::Address;
//!
//! let admin = Address::repeat_byte(1);
//! let verifier = Address::repeat_byte(2);
//! let user = Address::repeat_byte(3);
//! let now = 1_700_000_000;
//!
//! let mut authority = IdentityAuthority::with_defaults(admin);
//! authority.register_verifier(&CallContext::new(admin, now), verifier, "KYC Desk", "Org1")?;
//! authority.register_user(&CallContext::new(verifier, now), user)?;
//! authority.upload_document(&CallContext::new(user, now), "QmHandle", "AADHAAR", now + 86_400)?;
//! authority.verify_document(&CallContext::new(verifier, now), "QmHandle")?;
//! assert!(authority.get_did(user)?.verified);
//! # Ok::<(), identity_authority::IdentityError>(())
//! ```

pub mod contracts; // Authority components
pub mod error;
pub mod models; // Data structures
pub mod services; // Composed authority
pub mod settings;
pub mod storage; // Content store adapters
pub mod utils; // Helper functions

pub use contracts::CallContext;
pub use error::{IdentityError, Result, StorageError};
pub use models::config::SystemConfig;
pub use models::did::{DidRecord, DidView};
pub use models::document::{DocumentAttestation, DocumentInfo, DocumentStatus};
pub use models::event::{verify_event_chain, EventRecord, IdentityEvent};
pub use models::role::Role;
pub use models::verifier::{VerifierProfile, VerifierStats};
pub use services::authority::IdentityAuthority;
pub use services::shared::SharedAuthority;
pub use settings::Settings;
pub use storage::content_store::{ContentStore, MemoryContentStore};
pub use storage::ipfs_client::IpfsStorage;
