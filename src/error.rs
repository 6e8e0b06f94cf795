//! Error types for station lookup and upstream feed retrieval.

use std::time::Duration;

/// Rejection of a station that is not in [`crate::stations::SUPPORTED`].
///
/// Both variants carry the path parameter exactly as it was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StationError {
    #[error("Station Type {0} is not yet supported.")]
    UnsupportedStationType(String),
    #[error("Station {0} is not yet supported.")]
    UnsupportedStation(String),
}

/// Failures while retrieving or decoding the upstream feed.
///
/// A peer closing the connection is not represented here: the client reports
/// it as an empty payload and the assembler falls back to sentinel values.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("upstream feed at {target} is unreachable: {reason}")]
    Unreachable { target: String, reason: String },

    #[error("upstream feed at {target} did not respond within {timeout:?}")]
    Timeout { target: String, timeout: Duration },

    #[error("upstream feed at {target} failed mid-read: {reason}")]
    Transport { target: String, reason: String },

    #[error("upstream payload is malformed: {0}")]
    MalformedPayload(String),
}
