// src/models/verifier.rs
//! Verifier profile and performance statistics.

use serde::{Deserialize, Serialize};

/// Profile attached to a subject enrolled as a verifier.
///
/// Created on enrollment and kept for audit after the role is revoked.
/// Re-enrollment updates `name` and `organization` only.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VerifierProfile {
    pub name: String,
    pub organization: String,
    /// Proof verifications performed, successful or not.
    pub total_verifications: u64,
    pub successful_verifications: u64,
    pub registered_at: u64,
}

impl VerifierProfile {
    pub fn new(name: String, organization: String, registered_at: u64) -> Self {
        VerifierProfile {
            name,
            organization,
            total_verifications: 0,
            successful_verifications: 0,
            registered_at,
        }
    }

    /// Records one proof verification outcome.
    pub fn record(&mut self, success: bool) {
        self.total_verifications += 1;
        if success {
            self.successful_verifications += 1;
        }
    }

    pub fn stats(&self) -> VerifierStats {
        VerifierStats::from_counts(self.total_verifications, self.successful_verifications)
    }
}

/// Attempt count and integer success percentage for a verifier.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerifierStats {
    pub total_verifications: u64,
    /// `floor(successes * 100 / attempts)`, 0 when there were no attempts.
    pub success_rate: u64,
}

impl VerifierStats {
    pub fn from_counts(total: u64, successes: u64) -> Self {
        let success_rate = if total == 0 { 0 } else { successes * 100 / total };
        VerifierStats {
            total_verifications: total,
            success_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate_floors() {
        assert_eq!(VerifierStats::from_counts(0, 0).success_rate, 0);
        assert_eq!(VerifierStats::from_counts(3, 2).success_rate, 66);
        assert_eq!(VerifierStats::from_counts(3, 3).success_rate, 100);
        assert_eq!(VerifierStats::from_counts(7, 1).success_rate, 14);
    }

    #[test]
    fn test_record_updates_counters() {
        let mut profile = VerifierProfile::new("V".into(), "Org".into(), 10);
        profile.record(true);
        profile.record(false);
        assert_eq!(profile.total_verifications, 2);
        assert_eq!(profile.successful_verifications, 1);
        assert_eq!(profile.stats().success_rate, 50);
    }
}
