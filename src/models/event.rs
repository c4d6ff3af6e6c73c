// src/models/event.rs
//! Append-only event ledger.
//!
//! Each committed mutation produces one [`EventRecord`]. Records are hash
//! chained, `hash = keccak256(prev_hash || json(event))`, so any edit to a
//! past record breaks every hash after it.

use crate::models::config::SystemConfig;
use crate::models::role::Role;
use crate::utils::crypto::hash_data;
use crate::utils::serialization::serialize;
use ethers_core::types::{Address, H256};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum IdentityEvent {
    RoleGranted { role: Role, subject: Address },
    RoleRevoked { role: Role, subject: Address },
    VerifierRegistered { subject: Address, name: String, organization: String },
    UserRegistered { subject: Address },
    ProofVerified { verifier: Address, subject: Address, fingerprint: H256, success: bool },
    Paused,
    Unpaused,
    ConfigUpdated { config: SystemConfig },
    DocumentUploaded { handle: String, kind: String, owner: Address, expires_at: u64 },
    DocumentVerified { handle: String, owner: Address },
    DocumentDeactivated { handle: String },
    DidCreated { subject: Address, kind: String },
    DidRevoked { subject: Address },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub sequence: u64,
    pub timestamp: u64,
    pub caller: Address,
    pub event: IdentityEvent,
    pub hash: H256,
}

/// Computes the chained hash for `event` following `prev`.
pub fn chain_hash(prev: H256, event: &IdentityEvent) -> H256 {
    // IdentityEvent has only string keys and plain values; serializing it
    // cannot fail.
    let body = serialize(event).unwrap_or_default();
    let mut preimage = Vec::with_capacity(32 + body.len());
    preimage.extend_from_slice(prev.as_bytes());
    preimage.extend_from_slice(body.as_bytes());
    H256::from(hash_data(&preimage))
}

/// Ordered, hash-chained log of committed events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog::default()
    }

    pub fn append(&mut self, timestamp: u64, caller: Address, event: IdentityEvent) -> &EventRecord {
        let prev = self.head();
        let hash = chain_hash(prev, &event);
        let sequence = self.records.len() as u64;
        self.records.push(EventRecord {
            sequence,
            timestamp,
            caller,
            event,
            hash,
        });
        &self.records[self.records.len() - 1]
    }

    /// Hash of the latest record, zero for an empty log.
    pub fn head(&self) -> H256 {
        self.records.last().map(|r| r.hash).unwrap_or_else(H256::zero)
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Recomputes the chain and returns the first sequence number whose hash
/// or position does not match, or `None` when the chain is intact.
pub fn verify_event_chain(records: &[EventRecord]) -> Option<u64> {
    let mut prev = H256::zero();
    for (index, record) in records.iter().enumerate() {
        if record.sequence != index as u64 || chain_hash(prev, &record.event) != record.hash {
            return Some(index as u64);
        }
        prev = record.hash;
    }
    None
}
