use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_UPSTREAM: &str = "ws://202.90.159.176:8080";
pub const DEFAULT_PARTITION: i64 = 6;
pub const DEFAULT_UNIT: &str = "m";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Process-wide settings, built once at startup and shared read-only.
///
/// `upstream` is the WebSocket base address; the inbound request path is
/// appended to it to address the feed. `partition`, `unit` and `plotbands`
/// are copied into every response unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub upstream: String,
    pub partition: i64,
    pub unit: String,
    pub plotbands: Option<Vec<Value>>,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            upstream: DEFAULT_UPSTREAM.to_string(),
            partition: DEFAULT_PARTITION,
            unit: DEFAULT_UNIT.to_string(),
            plotbands: Some(Vec::new()),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    /// Overrides the upstream base address.
    pub fn with_upstream(mut self, upstream: impl Into<String>) -> Self {
        self.upstream = upstream.into();
        self
    }

    /// Overrides both connect and read timeouts.
    pub fn with_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let config = ServiceConfig::default();
        assert_eq!(config.partition, 6);
        assert_eq!(config.unit, "m");
        assert_eq!(config.plotbands, Some(vec![]));
    }

    #[test]
    fn test_builders() {
        let config = ServiceConfig::default()
            .with_upstream("ws://127.0.0.1:9000")
            .with_timeouts(Duration::from_secs(1), Duration::from_secs(2));

        assert_eq!(config.upstream, "ws://127.0.0.1:9000");
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
        assert_eq!(config.read_timeout, Duration::from_secs(2));
    }
}
