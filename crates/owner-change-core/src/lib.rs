//! # owner-change-core
//!
//! The pure core of the package ownership change reporter:
//!
//! - **Events**: [`RawEvent`] and [`RetirementState`] as produced by the
//!   event source adapter
//! - **Classification**: single-pass bucketing of events into the five
//!   category mappings (orphaned, unorphaned, retired, unretired, changed)
//!   keyed by (package, branch)
//! - **Aggregation**: collapsing per-branch entries into per-package entries
//!   with a sorted, comma-joined branch list
//! - **Rendering**: the plain-text change report
//!
//! No I/O lives here. Fetching events and delivering the finished report are
//! the concern of `owner-change-client` and the `owner-change` binary.

#![deny(unsafe_code)]

pub mod aggregate;
pub mod classify;
pub mod event;
pub mod report;

pub use aggregate::{AggregatedCategory, AggregatedChanges, aggregate_records};
pub use classify::{CategoryBuckets, ChangeKey, ChangeRecord, Classifier, Disposition, classify};
pub use event::{RawEvent, RetirementState};
pub use report::render;
