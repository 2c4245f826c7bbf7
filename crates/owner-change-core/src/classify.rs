//! Single-pass classification of ownership events into category buckets.
//!
//! Each (package, branch) pair is a [`ChangeKey`] identifying one
//! classification slot. Events are consumed in arrival order and dispatched
//! into five mutable mappings: orphaned, unorphaned, retired, unretired,
//! changed. The decision procedure is the pure function [`decide`]; the
//! [`Classifier`] applies its verdicts to the buckets.
//!
//! Two asymmetries are intentional and load-bearing:
//!
//! - Only the `orphaned` bucket is retractable: a later unorphan, retire,
//!   unretire, or transfer event for the same key pulls the key back out of
//!   `orphaned`. Keys settled into the other four buckets stay there.
//! - An unorphan by the same user who orphaned the key earlier in the run is
//!   a no-op self-reversal: the key is suppressed entirely and surfaces in
//!   no bucket.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;

use crate::event::{RawEvent, RetirementState};

// ─────────────────────────────────────────────────────────────────────────────
// Keys and records
// ─────────────────────────────────────────────────────────────────────────────

/// Identity of one classification slot: a (package, branch) pair.
///
/// Two events with the same key on the same topic carry repeated or refined
/// information about the same slot and merge rather than duplicate.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChangeKey {
    /// Package name.
    pub package: String,
    /// Branch name.
    pub branch: String,
}

impl ChangeKey {
    /// Key for an event.
    pub fn of(event: &RawEvent) -> Self {
        Self {
            package: event.package.clone(),
            branch: event.branch.clone(),
        }
    }
}

/// One classified change: who did what to which package, on which branches.
///
/// Mutable until aggregated — classification and aggregation both grow the
/// branch set. Scalar fields are first-seen-wins: repeated events for the
/// same key refresh the branch set but never overwrite user, owner, or
/// summary.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeRecord {
    /// Package name.
    pub package: String,
    /// One-line package summary.
    pub summary: String,
    /// Resulting owner.
    pub new_owner: String,
    /// Acting user.
    pub user: String,
    branches: Vec<String>,
}

impl ChangeRecord {
    /// Create a record for a freshly seen key.
    pub fn from_event(event: &RawEvent) -> Self {
        Self {
            package: event.package.clone(),
            summary: event.summary.clone(),
            new_owner: event.new_owner.clone(),
            user: event.user.clone(),
            branches: vec![event.branch.clone()],
        }
    }

    /// Add a branch to the set; duplicates are ignored.
    pub fn add_branch(&mut self, branch: &str) {
        if !self.branches.iter().any(|b| b == branch) {
            self.branches.push(branch.to_string());
        }
    }

    /// Absorb another record's branches (aggregation merge).
    pub fn merge_branches(&mut self, other: &ChangeRecord) {
        for branch in &other.branches {
            self.add_branch(branch);
        }
    }

    /// Branches deduplicated, sorted case-insensitively, comma-joined.
    pub fn branches_joined(&self) -> String {
        let mut branches = self.branches.clone();
        branches.sort_by_key(|b| b.to_lowercase());
        branches.join(",")
    }

    /// The scalar grouping tuple: every field except the branch set.
    pub(crate) fn scalar_key(&self) -> (String, String, String, String) {
        (
            self.package.clone(),
            self.summary.clone(),
            self.new_owner.clone(),
            self.user.clone(),
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decision procedure
// ─────────────────────────────────────────────────────────────────────────────

/// Verdict of the classification decision procedure for one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Explicit retirement flag: move into `retired`.
    Retired,
    /// Explicit unretirement flag: move into `unretired`.
    Unretired,
    /// New owner is the orphan sentinel: into `orphaned`.
    Orphaned,
    /// Self-assignment reversing an orphan: into `unorphaned`.
    Unorphaned,
    /// Self-assignment undoing this same user's own orphan from earlier in
    /// the run: suppressed entirely.
    SelfReversal,
    /// Ordinary ownership transfer: into `changed`.
    Changed,
}

/// Decide where one event belongs, given who (if anyone) orphaned its key
/// earlier in the run.
///
/// Precedence is fixed, first match wins:
/// 1. retirement flag `retired`
/// 2. retirement flag `unretired`
/// 3. new owner is the orphan sentinel
/// 4. new owner equals the acting user (self-reversal if that user also
///    orphaned the key earlier)
/// 5. anything else is an ordinary transfer
///
/// Pure with respect to its inputs; the caller owns bucket mutation.
pub fn decide(event: &RawEvent, orphaned_by: Option<&str>) -> Disposition {
    match event.retirement {
        Some(RetirementState::Retired) => Disposition::Retired,
        Some(RetirementState::Unretired) => Disposition::Unretired,
        None if event.is_orphaning() => Disposition::Orphaned,
        None if event.is_self_assignment() => {
            if orphaned_by == Some(event.user.as_str()) {
                Disposition::SelfReversal
            } else {
                Disposition::Unorphaned
            }
        }
        None => Disposition::Changed,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Buckets and classifier
// ─────────────────────────────────────────────────────────────────────────────

/// One category mapping from key to record.
pub type Bucket = HashMap<ChangeKey, ChangeRecord>;

/// The five disjoint category mappings a run classifies into.
#[derive(Debug, Default)]
pub struct CategoryBuckets {
    /// Packages that lost their maintainer.
    pub orphaned: Bucket,
    /// Packages picked up by the user who acted.
    pub unorphaned: Bucket,
    /// Packages retired on a branch.
    pub retired: Bucket,
    /// Packages brought back from retirement.
    pub unretired: Bucket,
    /// Ordinary ownership transfers.
    pub changed: Bucket,
}

/// Single-pass event classifier.
///
/// Feed events in arrival order with [`Classifier::observe`], then take the
/// buckets with [`Classifier::finish`].
#[derive(Debug, Default)]
pub struct Classifier {
    buckets: CategoryBuckets,
    // Who orphaned each key, first actor wins. Kept separately from the
    // orphaned bucket because the entry itself may have been retracted by
    // the time a self-assignment arrives.
    orphan_actors: HashMap<ChangeKey, String>,
}

impl Classifier {
    /// Fresh classifier with empty buckets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one event into the buckets.
    pub fn observe(&mut self, event: &RawEvent) {
        let key = ChangeKey::of(event);
        let orphaned_by = self.orphan_actors.get(&key).map(String::as_str);
        let disposition = decide(event, orphaned_by);
        debug!(
            package = %event.package,
            branch = %event.branch,
            new_owner = %event.new_owner,
            user = %event.user,
            ?disposition,
            "classified event"
        );

        match disposition {
            Disposition::Retired => {
                let _ = self.buckets.orphaned.remove(&key);
                upsert(&mut self.buckets.retired, key, event);
            }
            Disposition::Unretired => {
                let _ = self.buckets.orphaned.remove(&key);
                upsert(&mut self.buckets.unretired, key, event);
            }
            Disposition::Orphaned => {
                let _ = self
                    .orphan_actors
                    .entry(key.clone())
                    .or_insert_with(|| event.user.clone());
                upsert(&mut self.buckets.orphaned, key, event);
            }
            Disposition::Unorphaned => {
                let _ = self.buckets.orphaned.remove(&key);
                upsert(&mut self.buckets.unorphaned, key, event);
            }
            Disposition::SelfReversal => {
                let _ = self.buckets.orphaned.remove(&key);
            }
            Disposition::Changed => {
                let _ = self.buckets.orphaned.remove(&key);
                upsert(&mut self.buckets.changed, key, event);
            }
        }
    }

    /// Consume the classifier and hand over the buckets.
    pub fn finish(self) -> CategoryBuckets {
        self.buckets
    }
}

/// Classify a whole event sequence in arrival order.
pub fn classify(events: &[RawEvent]) -> CategoryBuckets {
    let mut classifier = Classifier::new();
    for event in events {
        classifier.observe(event);
    }
    classifier.finish()
}

/// Merge an event into a bucket: existing key gains the branch and keeps its
/// first-seen scalar fields, new key gets a fresh record.
fn upsert(bucket: &mut Bucket, key: ChangeKey, event: &RawEvent) {
    match bucket.entry(key) {
        Entry::Occupied(mut occupied) => occupied.get_mut().add_branch(&event.branch),
        Entry::Vacant(vacant) => {
            let _ = vacant.insert(ChangeRecord::from_event(event));
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
