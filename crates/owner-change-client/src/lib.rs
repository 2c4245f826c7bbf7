//! # owner-change-client
//!
//! Event source adapter for the ownership change reporter: a thin
//! datagrepper client that retrieves every ownership event within a lookback
//! window, transparently following pagination, and flattens the wire format
//! into [`owner_change_core::RawEvent`] values.
//!
//! The adapter performs no retries and recovers from nothing: an unreachable
//! service or malformed page is a [`TransportError`], an event missing an
//! expected field is a [`DataShapeError`], and both abort the run upstream.

#![deny(unsafe_code)]

pub mod client;
pub mod errors;
pub mod wire;

pub use client::{DEFAULT_DATAGREPPER_URL, DatagrepperClient, SortOrder};
pub use errors::{DataShapeError, FetchError, TransportError};
