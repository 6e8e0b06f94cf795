//! Log formatting for assembled payloads.

use anyhow::Result;
use tracing::{debug, info};

use crate::payload::ResponsePayload;

/// Logs a payload using Rust's debug pretty-print format.
pub fn print_pretty(payload: &ResponsePayload) {
    debug!("{:#?}", payload);
}

/// Logs a payload as pretty-printed JSON, exactly as the HTTP route returns it.
pub fn print_json(payload: &ResponsePayload) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(payload)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stations::SUPPORTED;
    use crate::stats::SeriesStats;

    fn fallback() -> ResponsePayload {
        ResponsePayload {
            series: SeriesStats::no_data(),
            plotbands: Some(vec![]),
            station: SUPPORTED[0].station("/station/5/987"),
            time: vec![],
            partition: 6,
            unit: "m".to_string(),
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&fallback());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&fallback()).unwrap();
    }
}
