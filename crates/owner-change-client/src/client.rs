//! The datagrepper client: sequential, transparent pagination.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use owner_change_core::RawEvent;

use crate::errors::{Result, TransportError};
use crate::wire::EventsPage;

/// Default public datagrepper endpoint.
pub const DEFAULT_DATAGREPPER_URL: &str = "https://apps.fedoraproject.org/datagrepper/raw/";

/// Wire sort order for the event query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Oldest first — matches the classifier's arrival-order semantics.
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// Newest first.
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    /// Query parameter value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Client for one datagrepper-style event history service.
///
/// Fetches are strictly sequential; no retries, no parallel pages.
#[derive(Debug, Clone)]
pub struct DatagrepperClient {
    http: reqwest::Client,
    base_url: String,
    page_size: u32,
    order: SortOrder,
}

impl DatagrepperClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>, page_size: u32, order: SortOrder) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .user_agent("owner-change/0.1")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
            page_size,
            order,
        }
    }

    /// Retrieve every event for `topics` within the last `delta_seconds`,
    /// following pagination until all pages are consumed.
    ///
    /// The total count reported by the service is logged for
    /// cross-validation but not enforced.
    pub async fn fetch_events(&self, delta_seconds: u64, topics: &[String]) -> Result<Vec<RawEvent>> {
        let mut events = Vec::new();
        let mut page = 1;
        let mut pages = 1;
        let mut reported_total = 0;

        while page <= pages {
            debug!(page, pages, "retrieving event page");
            let document = self.fetch_page(delta_seconds, topics, page).await?;
            pages = document.pages;
            reported_total = document.total;
            for message in document.raw_messages {
                events.push(message.into_event()?);
            }
            page += 1;
        }

        info!(
            retrieved = events.len(),
            reported = reported_total,
            "event retrieval complete"
        );
        if events.len() as u64 != reported_total {
            warn!(
                retrieved = events.len(),
                reported = reported_total,
                "retrieved event count differs from service-reported total"
            );
        }
        Ok(events)
    }

    async fn fetch_page(
        &self,
        delta_seconds: u64,
        topics: &[String],
        page: u32,
    ) -> std::result::Result<EventsPage, TransportError> {
        let mut query: Vec<(&str, String)> = vec![
            ("delta", delta_seconds.to_string()),
            ("rows_per_page", self.page_size.to_string()),
            ("page", page.to_string()),
            ("order", self.order.as_str().to_string()),
        ];
        for topic in topics {
            query.push(("topic", topic.clone()));
        }

        let response = self.http.get(&self.base_url).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                page,
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
