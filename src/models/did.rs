// src/models/did.rs
//! Decentralized identity records aggregated from verified attestations.

use ethers_core::types::Address;
use serde::{Deserialize, Serialize};

/// A subject's identity record.
///
/// Opened on the first successful document verification for the subject
/// (per document kind when multiple records are allowed). The `verified`
/// flag only goes back to false through an explicit admin revocation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DidRecord {
    pub subject: Address,
    /// Document kind the record was opened under.
    pub kind: String,
    pub verified: bool,
    pub created_at: u64,
    pub updated_at: u64,
    /// Verified handles in verification order.
    pub handles: Vec<String>,
}

impl DidRecord {
    pub fn new(subject: Address, kind: String, created_at: u64) -> Self {
        DidRecord {
            subject,
            kind,
            verified: false,
            created_at,
            updated_at: created_at,
            handles: Vec::new(),
        }
    }

    /// Attaches a verified handle and marks the record verified.
    pub fn attest(&mut self, handle: &str, now: u64) {
        if !self.handles.iter().any(|h| h == handle) {
            self.handles.push(handle.to_string());
        }
        self.verified = true;
        self.updated_at = now;
    }
}

/// Aggregate view of every record a subject holds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DidView {
    pub verified: bool,
    pub created_at: u64,
    pub handles: Vec<String>,
}

impl DidView {
    /// Folds records into one view: verified if any record is, earliest
    /// creation time, handles concatenated in record order.
    pub fn aggregate<'a>(records: impl IntoIterator<Item = &'a DidRecord>) -> Option<Self> {
        let mut view: Option<DidView> = None;
        for record in records {
            match view.as_mut() {
                None => {
                    view = Some(DidView {
                        verified: record.verified,
                        created_at: record.created_at,
                        handles: record.handles.clone(),
                    })
                }
                Some(v) => {
                    v.verified |= record.verified;
                    v.created_at = v.created_at.min(record.created_at);
                    v.handles.extend(record.handles.iter().cloned());
                }
            }
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attest_is_idempotent_per_handle() {
        let mut record = DidRecord::new(Address::zero(), "AADHAAR".into(), 5);
        record.attest("Qm1", 6);
        record.attest("Qm1", 7);
        assert_eq!(record.handles, vec!["Qm1".to_string()]);
        assert!(record.verified);
        assert_eq!(record.updated_at, 7);
    }

    #[test]
    fn test_aggregate_view() {
        let mut a = DidRecord::new(Address::zero(), "AADHAAR".into(), 20);
        a.attest("Qm1", 20);
        let b = DidRecord::new(Address::zero(), "PAN".into(), 10);

        let view = DidView::aggregate([&a, &b]).unwrap();
        assert!(view.verified);
        assert_eq!(view.created_at, 10);
        assert_eq!(view.handles, vec!["Qm1".to_string()]);

        assert!(DidView::aggregate(std::iter::empty()).is_none());
    }
}
