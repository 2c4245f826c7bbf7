//! Raw ownership events as handed over by the event source adapter.

use serde::{Deserialize, Serialize};

/// Sentinel owner name marking a package/branch as having no maintainer.
pub const ORPHAN_OWNER: &str = "orphan";

/// Explicit retirement state carried by lifecycle events.
///
/// Ownership transfer events carry no retirement state; retire/unretire
/// events always do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetirementState {
    /// The package was retired on this branch.
    Retired,
    /// The package was brought back from retirement on this branch.
    Unretired,
}

/// One ownership event, already flattened out of the wire format.
///
/// Produced by the adapter, consumed read-only by the classifier. The
/// `timestamp` is the ordering position reported by the upstream service;
/// classification itself processes events in arrival order and only logs
/// the timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct RawEvent {
    /// Topic the event was published under.
    pub topic: String,
    /// Seconds-since-epoch position reported by the upstream service.
    pub timestamp: f64,
    /// Package name.
    pub package: String,
    /// One-line package summary.
    pub summary: String,
    /// Branch the change applies to.
    pub branch: String,
    /// Resulting owner after the event.
    pub new_owner: String,
    /// User who performed the change.
    pub user: String,
    /// Retirement state, present only on retire/unretire events.
    pub retirement: Option<RetirementState>,
}

impl RawEvent {
    /// Whether the resulting owner is the orphan sentinel.
    pub fn is_orphaning(&self) -> bool {
        self.new_owner == ORPHAN_OWNER
    }

    /// Whether the acting user took ownership themselves.
    pub fn is_self_assignment(&self) -> bool {
        self.new_owner == self.user
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn event(new_owner: &str, user: &str) -> RawEvent {
        RawEvent {
            topic: "org.fedoraproject.prod.pkgdb.owner.update".to_string(),
            timestamp: 1_700_000_000.0,
            package: "foo".to_string(),
            summary: "A package".to_string(),
            branch: "f30".to_string(),
            new_owner: new_owner.to_string(),
            user: user.to_string(),
            retirement: None,
        }
    }

    #[test]
    fn orphan_sentinel_detected() {
        assert!(event("orphan", "alice").is_orphaning());
        assert!(!event("bob", "alice").is_orphaning());
    }

    #[test]
    fn self_assignment_detected() {
        assert!(event("alice", "alice").is_self_assignment());
        assert!(!event("bob", "alice").is_self_assignment());
    }

    #[test]
    fn retirement_state_wire_names() {
        let retired: RetirementState = serde_json::from_str("\"retired\"").unwrap();
        assert_eq!(retired, RetirementState::Retired);
        let unretired: RetirementState = serde_json::from_str("\"unretired\"").unwrap();
        assert_eq!(unretired, RetirementState::Unretired);
    }
}
