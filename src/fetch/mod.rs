mod client;
mod websocket;

pub use client::FeedClient;
pub use websocket::WebSocketClient;
