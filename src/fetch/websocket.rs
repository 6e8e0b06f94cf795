use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::io;
use std::time::Duration;
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message, error::ProtocolError};
use tracing::{debug, warn};

use super::client::FeedClient;
use crate::config::ServiceConfig;
use crate::error::FeedError;

/// A [`FeedClient`] that opens a fresh WebSocket connection per call and
/// reads a single data frame from it.
///
/// Connections are never reused. Ping and pong frames received before the
/// data frame are skipped.
pub struct WebSocketClient {
    base: String,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl WebSocketClient {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            base: config.upstream.clone(),
            connect_timeout: config.connect_timeout,
            read_timeout: config.read_timeout,
        }
    }

    fn target(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

#[async_trait]
impl FeedClient for WebSocketClient {
    #[tracing::instrument(skip(self), fields(target = %self.target(path)))]
    async fn retrieve(&self, path: &str) -> Result<Bytes, FeedError> {
        let target = self.target(path);

        let mut stream = match timeout(self.connect_timeout, connect_async(target.as_str())).await {
            Err(_) => {
                return Err(FeedError::Timeout {
                    target,
                    timeout: self.connect_timeout,
                });
            }
            Ok(Err(e)) if is_closed(&e) => {
                debug!(error = %e, "Upstream closed during handshake");
                return Ok(Bytes::new());
            }
            Ok(Err(e)) => {
                return Err(FeedError::Unreachable {
                    target,
                    reason: e.to_string(),
                });
            }
            Ok(Ok((stream, _response))) => stream,
        };

        let frame = match timeout(self.read_timeout, read_data_frame(&mut stream)).await {
            Ok(frame) => frame,
            Err(_) => {
                return Err(FeedError::Timeout {
                    target,
                    timeout: self.read_timeout,
                });
            }
        };

        match frame {
            Ok(Some(data)) => {
                debug!(bytes = data.len(), "Upstream frame received");
                // Best effort; the peer may already be gone.
                let _ = timeout(self.read_timeout, stream.close(None)).await;
                Ok(data)
            }
            Ok(None) => {
                debug!("Upstream closed before sending a frame");
                Ok(Bytes::new())
            }
            Err(e) if is_closed(&e) => {
                debug!(error = %e, "Upstream connection dropped during read");
                Ok(Bytes::new())
            }
            Err(e) => {
                warn!(error = %e, "Upstream read failed");
                Err(FeedError::Transport {
                    target,
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// Returns the payload of the first text or binary frame, or `None` if the
/// stream ends or a close frame arrives first.
async fn read_data_frame<S>(stream: &mut S) -> Result<Option<Bytes>, WsError>
where
    S: Stream<Item = Result<Message, WsError>> + Unpin,
{
    while let Some(message) = stream.next().await {
        match message? {
            message @ (Message::Text(_) | Message::Binary(_)) => {
                return Ok(Some(message.into_data()));
            }
            Message::Close(frame) => {
                debug!(?frame, "Close frame received");
                return Ok(None);
            }
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
        }
    }
    Ok(None)
}

/// Whether `error` means the peer went away, as opposed to never being
/// reachable or violating the protocol.
fn is_closed(error: &WsError) -> bool {
    match error {
        WsError::ConnectionClosed | WsError::AlreadyClosed => true,
        WsError::Protocol(
            ProtocolError::ResetWithoutClosingHandshake | ProtocolError::HandshakeIncomplete,
        ) => true,
        WsError::Io(e) => matches!(
            e.kind(),
            io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::BrokenPipe
                | io::ErrorKind::UnexpectedEof
        ),
        _ => false,
    }
}
