//! Plain-text rendering of the aggregated change report.
//!
//! Section order is fixed: header, orphaned, unorphaned, retired, unretired,
//! changed. Every section prints its count line and dashed rule even when
//! empty. The renderer holds no classification logic; it sorts the entries
//! it is handed and applies the string templates.

use crate::aggregate::{AggregatedCategory, AggregatedChanges};
use crate::classify::ChangeRecord;

/// Package detail page, linked under orphaned and retired entries.
const PKGDB_ACL_URL: &str = "https://admin.fedoraproject.org/pkgdb/acls/name/";

/// Indent for the summary and link detail lines.
const DETAIL_INDENT: &str = "     ";

/// Line template applied to a category's entries.
#[derive(Clone, Copy)]
enum EntryStyle {
    /// `{name} [{branches}] was {verb} by {user}`, with summary/link details.
    Lifecycle {
        verb: &'static str,
        details: bool,
    },
    /// `{user:<15} unorphaned : {name} [{branches}]`
    Unorphaned,
    /// `{user:<15} gave to {owner:<15}    : {name} [{branches}]`
    Changed,
}

/// Render the finished report for a lookback window given in seconds.
pub fn render(changes: &AggregatedChanges, lookback_seconds: u64) -> String {
    let hours = lookback_seconds / 3600;
    let header = format!("Change in ownership over the last {hours} hours");
    let mut out = String::new();
    out.push_str(&header);
    out.push('\n');
    out.push_str(&"=".repeat(header.len()));
    out.push('\n');

    section(
        &mut out,
        &changes.orphaned,
        "were orphaned",
        EntryStyle::Lifecycle {
            verb: "orphaned",
            details: true,
        },
    );
    section(&mut out, &changes.unorphaned, "unorphaned", EntryStyle::Unorphaned);
    section(
        &mut out,
        &changes.retired,
        "were retired",
        EntryStyle::Lifecycle {
            verb: "retired",
            details: true,
        },
    );
    section(
        &mut out,
        &changes.unretired,
        "were unretired",
        EntryStyle::Lifecycle {
            verb: "unretired",
            details: false,
        },
    );
    section(&mut out, &changes.changed, "changed owner", EntryStyle::Changed);

    out
}

fn section(out: &mut String, category: &AggregatedCategory, label: &str, style: EntryStyle) {
    let count_line = format!("{} packages {label}", category.slot_count);
    out.push('\n');
    out.push_str(&count_line);
    out.push('\n');
    out.push_str(&"-".repeat(count_line.len()));
    out.push('\n');

    let mut entries: Vec<&ChangeRecord> = category.entries.iter().collect();
    entries.sort_by_key(|record| record.package.to_lowercase());

    for record in entries {
        out.push_str(&entry_line(record, style));
        out.push('\n');
        if let EntryStyle::Lifecycle { details: true, .. } = style {
            out.push_str(DETAIL_INDENT);
            out.push_str(&record.summary);
            out.push('\n');
            out.push_str(DETAIL_INDENT);
            out.push_str(PKGDB_ACL_URL);
            out.push_str(&record.package);
            out.push('\n');
        }
    }
}

fn entry_line(record: &ChangeRecord, style: EntryStyle) -> String {
    let branches = record.branches_joined();
    match style {
        EntryStyle::Lifecycle { verb, .. } => format!(
            "{} [{branches}] was {verb} by {}",
            record.package, record.user
        ),
        EntryStyle::Unorphaned => format!(
            "{:<15} unorphaned : {} [{branches}]",
            record.user, record.package
        ),
        EntryStyle::Changed => format!(
            "{:<15} gave to {:<15}    : {} [{branches}]",
            record.user, record.new_owner, record.package
        ),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
