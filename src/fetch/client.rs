use async_trait::async_trait;
use bytes::Bytes;

use crate::error::FeedError;

/// Retrieves one raw frame from the upstream feed for a request path.
///
/// An empty result means the peer closed the connection without sending
/// data. Every other failure is an error.
#[async_trait]
pub trait FeedClient: Send + Sync {
    async fn retrieve(&self, path: &str) -> Result<Bytes, FeedError>;
}
