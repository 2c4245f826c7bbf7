//! Serde DTOs for the datagrepper wire format.
//!
//! The upstream schema is owned by the service, so every field the
//! classifier needs is declared optional here and validated in
//! [`RawMessage::into_event`]; a missing field becomes a [`DataShapeError`]
//! naming its dotted path instead of a blanket deserialization failure.

use serde::Deserialize;
use tracing::warn;

use owner_change_core::{RawEvent, RetirementState};

use crate::errors::DataShapeError;

/// One page of event history.
#[derive(Debug, Deserialize)]
pub struct EventsPage {
    /// Total number of pages for the query.
    pub pages: u32,
    /// Total number of matching events, across all pages.
    #[serde(default)]
    pub total: u64,
    /// The events on this page, in service order.
    #[serde(default)]
    pub raw_messages: Vec<RawMessage>,
}

/// One raw message as published on the bus.
#[derive(Debug, Deserialize)]
pub struct RawMessage {
    /// Topic the message was published under.
    #[serde(default)]
    pub topic: Option<String>,
    /// Seconds-since-epoch publication position.
    #[serde(default)]
    pub timestamp: f64,
    /// Topic-specific payload.
    #[serde(default)]
    pub msg: Option<MessageBody>,
}

/// The `msg` payload of an ownership or retirement message.
#[derive(Debug, Deserialize)]
pub struct MessageBody {
    /// Acting user.
    #[serde(default)]
    pub agent: Option<String>,
    /// Retirement state, present on retire/unretire messages.
    #[serde(default)]
    pub retirement: Option<String>,
    /// The package listing the change applies to.
    #[serde(default)]
    pub package_listing: Option<PackageListing>,
}

/// Ownership state of one package on one branch.
#[derive(Debug, Deserialize)]
pub struct PackageListing {
    /// Resulting owner.
    #[serde(default)]
    pub owner: Option<String>,
    /// The package itself.
    #[serde(default)]
    pub package: Option<PackageRef>,
    /// The branch (collection) the listing belongs to.
    #[serde(default)]
    pub collection: Option<CollectionRef>,
}

/// Package name and summary.
#[derive(Debug, Deserialize)]
pub struct PackageRef {
    /// Package name.
    #[serde(default)]
    pub name: Option<String>,
    /// One-line package summary.
    #[serde(default)]
    pub summary: Option<String>,
}

/// Branch reference.
#[derive(Debug, Deserialize)]
pub struct CollectionRef {
    /// Branch name, e.g. `f30` or `epel8`.
    #[serde(default)]
    pub branchname: Option<String>,
}

impl RawMessage {
    /// Flatten the wire message into a [`RawEvent`].
    ///
    /// Unknown retirement values are treated as absent with a warning so a
    /// new upstream state does not abort the run; genuinely missing fields
    /// do abort it.
    pub fn into_event(self) -> Result<RawEvent, DataShapeError> {
        let topic = self.topic.ok_or_else(|| DataShapeError::missing("topic"))?;
        let msg = self.msg.ok_or_else(|| DataShapeError::missing("msg"))?;
        let user = msg
            .agent
            .ok_or_else(|| DataShapeError::missing("msg.agent"))?;
        let listing = msg
            .package_listing
            .ok_or_else(|| DataShapeError::missing("msg.package_listing"))?;
        let new_owner = listing
            .owner
            .ok_or_else(|| DataShapeError::missing("msg.package_listing.owner"))?;
        let package = listing
            .package
            .ok_or_else(|| DataShapeError::missing("msg.package_listing.package"))?;
        let name = package
            .name
            .ok_or_else(|| DataShapeError::missing("msg.package_listing.package.name"))?;
        let summary = package
            .summary
            .ok_or_else(|| DataShapeError::missing("msg.package_listing.package.summary"))?;
        let branch = listing
            .collection
            .and_then(|c| c.branchname)
            .ok_or_else(|| {
                DataShapeError::missing("msg.package_listing.collection.branchname")
            })?;

        let retirement = match msg.retirement.as_deref() {
            None => None,
            Some("retired") => Some(RetirementState::Retired),
            Some("unretired") => Some(RetirementState::Unretired),
            Some(other) => {
                warn!(value = other, package = %name, "unknown retirement state, ignoring");
                None
            }
        };

        Ok(RawEvent {
            topic,
            timestamp: self.timestamp,
            package: name,
            summary,
            branch,
            new_owner,
            user,
            retirement,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
