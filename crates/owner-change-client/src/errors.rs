//! Adapter error types.

use thiserror::Error;

/// Network or service failure while paginating through event history.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request itself failed (connection refused, DNS, timeout).
    #[error("datagrepper request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("datagrepper returned HTTP {status} for page {page}")]
    Status {
        /// HTTP status code of the failed page request.
        status: u16,
        /// Page number that failed.
        page: u32,
    },
    /// The response body was not the expected JSON document.
    #[error("malformed datagrepper response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

/// An event record was missing a field the classifier needs.
///
/// Defensive fallback for upstream schema drift; never recovered locally.
#[derive(Debug, Error)]
#[error("event record missing expected field `{path}`")]
pub struct DataShapeError {
    /// Dotted path of the missing field inside the raw message.
    pub path: &'static str,
}

impl DataShapeError {
    pub(crate) fn missing(path: &'static str) -> Self {
        Self { path }
    }
}

/// Any failure while fetching and decoding the event stream.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network/service failure or malformed page.
    #[error("{0}")]
    Transport(#[from] TransportError),
    /// Event record missing an expected field.
    #[error("{0}")]
    DataShape(#[from] DataShapeError),
}

/// Result type for adapter operations.
pub type Result<T> = std::result::Result<T, FetchError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display() {
        let err = TransportError::Status {
            status: 502,
            page: 3,
        };
        assert_eq!(err.to_string(), "datagrepper returned HTTP 502 for page 3");
    }

    #[test]
    fn data_shape_error_display() {
        let err = DataShapeError::missing("msg.package_listing.owner");
        assert_eq!(
            err.to_string(),
            "event record missing expected field `msg.package_listing.owner`"
        );
    }

    #[test]
    fn malformed_json_converts_to_transport() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: TransportError = json_err.into();
        assert!(matches!(err, TransportError::MalformedResponse(_)));
    }

    #[test]
    fn fetch_error_wraps_both_kinds() {
        let transport: FetchError = TransportError::Status {
            status: 500,
            page: 1,
        }
        .into();
        assert!(matches!(transport, FetchError::Transport(_)));

        let shape: FetchError = DataShapeError::missing("msg.agent").into();
        assert!(matches!(shape, FetchError::DataShape(_)));
    }
}
