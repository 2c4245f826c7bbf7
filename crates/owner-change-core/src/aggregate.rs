//! Collapsing per-branch classification slots into per-package report entries.
//!
//! Two slots merge only when every scalar field except the branch matches:
//! the grouping key is the full {package, summary, owner, user} tuple, not
//! the package name alone. The same package handed to two different owners
//! on two branches therefore stays as two entries, and both surface under
//! that package's name in the rendered report.

use std::collections::HashMap;

use crate::classify::{Bucket, CategoryBuckets, ChangeRecord};

/// One aggregated category: the per-slot count plus the merged entries.
///
/// `slot_count` is the number of distinct (package, branch) pairs the
/// category held before aggregation; the rendered count line reports this
/// number, not the merged entry count.
#[derive(Debug, Default)]
pub struct AggregatedCategory {
    /// Distinct (package, branch) slots before merging.
    pub slot_count: usize,
    /// Merged entries, one per distinct scalar tuple.
    pub entries: Vec<ChangeRecord>,
}

impl AggregatedCategory {
    fn from_bucket(bucket: Bucket) -> Self {
        Self {
            slot_count: bucket.len(),
            entries: aggregate_records(bucket.into_values()),
        }
    }
}

/// The five aggregated categories, ready for rendering.
#[derive(Debug, Default)]
pub struct AggregatedChanges {
    /// Packages that lost their maintainer.
    pub orphaned: AggregatedCategory,
    /// Packages picked up by the acting user.
    pub unorphaned: AggregatedCategory,
    /// Packages retired on a branch.
    pub retired: AggregatedCategory,
    /// Packages brought back from retirement.
    pub unretired: AggregatedCategory,
    /// Ordinary ownership transfers.
    pub changed: AggregatedCategory,
}

impl CategoryBuckets {
    /// Aggregate every category bucket into per-package entries.
    pub fn aggregate(self) -> AggregatedChanges {
        AggregatedChanges {
            orphaned: AggregatedCategory::from_bucket(self.orphaned),
            unorphaned: AggregatedCategory::from_bucket(self.unorphaned),
            retired: AggregatedCategory::from_bucket(self.retired),
            unretired: AggregatedCategory::from_bucket(self.unretired),
            changed: AggregatedCategory::from_bucket(self.changed),
        }
    }
}

/// Merge records sharing the same scalar tuple into one entry each.
///
/// Branch sets are unioned and deduplicated; output is sorted
/// case-insensitively by package name (owner and user break ties) so the
/// result is deterministic regardless of input order. Running the function
/// on its own output is a no-op.
pub fn aggregate_records(records: impl IntoIterator<Item = ChangeRecord>) -> Vec<ChangeRecord> {
    let mut merged: HashMap<(String, String, String, String), ChangeRecord> = HashMap::new();
    for record in records {
        match merged.entry(record.scalar_key()) {
            std::collections::hash_map::Entry::Occupied(mut occupied) => {
                occupied.get_mut().merge_branches(&record);
            }
            std::collections::hash_map::Entry::Vacant(vacant) => {
                let _ = vacant.insert(record);
            }
        }
    }

    let mut entries: Vec<ChangeRecord> = merged.into_values().collect();
    entries.sort_by(|a, b| {
        (a.package.to_lowercase(), &a.new_owner, &a.user).cmp(&(
            b.package.to_lowercase(),
            &b.new_owner,
            &b.user,
        ))
    });
    entries
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
