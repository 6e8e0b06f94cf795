//! A local WebSocket upstream for exercising the real client.

#![allow(dead_code)]

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

pub const RECORD: &str =
    r#"{"series": {"values": [1, 5, 3], "sensor_id": 7, "label": 2}, "time": [10, 20, 30]}"#;

/// What the upstream does with each connection.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Send one text frame, then wait for the client to hang up.
    Reply(String),
    /// Send a ping before the text frame.
    PingThenReply(String),
    /// Complete the handshake, then send a close frame.
    Close,
    /// Complete the handshake, then drop the socket without a close frame.
    Drop,
    /// Drop the TCP connection before the WebSocket handshake.
    DropBeforeHandshake,
    /// Complete the handshake and never send anything.
    Stall,
}

pub struct Upstream {
    pub base: String,
    pub paths: mpsc::UnboundedReceiver<String>,
}

/// Binds an upstream on an ephemeral port and serves every connection with
/// `behavior`. Request paths are reported on `paths`.
pub async fn spawn_upstream(behavior: Behavior) -> Upstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((tcp, _)) = listener.accept().await {
            let tx = tx.clone();
            let behavior = behavior.clone();
            tokio::spawn(serve(tcp, behavior, tx));
        }
    });

    Upstream {
        base: format!("ws://{addr}"),
        paths: rx,
    }
}

/// An address nothing is listening on.
pub async fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("ws://{addr}")
}

async fn serve(tcp: TcpStream, behavior: Behavior, paths: mpsc::UnboundedSender<String>) {
    if let Behavior::DropBeforeHandshake = behavior {
        drop(tcp);
        return;
    }

    let callback = |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
        let _ = paths.send(req.uri().path().to_string());
        Ok(resp)
    };
    let Ok(mut ws) = accept_hdr_async(tcp, callback).await else {
        return;
    };

    match behavior {
        Behavior::Reply(body) => {
            let _ = ws.send(Message::text(body)).await;
            let _ = ws.next().await;
        }
        Behavior::PingThenReply(body) => {
            let _ = ws.send(Message::Ping(Bytes::from_static(b"hb"))).await;
            let _ = ws.send(Message::text(body)).await;
            let _ = ws.next().await;
        }
        Behavior::Close => {
            let _ = ws.close(None).await;
        }
        Behavior::Drop => drop(ws),
        Behavior::Stall => tokio::time::sleep(Duration::from_secs(30)).await,
        Behavior::DropBeforeHandshake => unreachable!(),
    }
}
