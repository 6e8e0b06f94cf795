//! Turns raw upstream bytes into a [`ResponsePayload`].

use tracing::{debug, warn};

use crate::config::ServiceConfig;
use crate::error::FeedError;
use crate::parser::parse_record;
use crate::payload::{ResponsePayload, Timestamp};
use crate::stations::Station;
use crate::stats::SeriesStats;

pub struct ResponseAssembler<'a> {
    config: &'a ServiceConfig,
}

impl<'a> ResponseAssembler<'a> {
    pub fn new(config: &'a ServiceConfig) -> Self {
        Self { config }
    }

    /// Builds the response for `station` from one upstream frame.
    ///
    /// Empty `raw` means the upstream closed without sending data and yields
    /// the sentinel series with no timestamps. Anything else must decode
    /// into a complete record with at least one value.
    pub fn assemble(&self, raw: &[u8], station: Station) -> Result<ResponsePayload, FeedError> {
        let (series, time) = if raw.is_empty() {
            debug!(url = %station.url, "No upstream data, assembling fallback");
            (SeriesStats::no_data(), Vec::new())
        } else {
            let record = parse_record(raw)?;
            if record.time.len() != record.series.values.len() {
                warn!(
                    values = record.series.values.len(),
                    time = record.time.len(),
                    "Upstream time and values lengths differ"
                );
            }
            (SeriesStats::from_record(record.series)?, record.time)
        };

        Ok(self.payload(series, station, time))
    }

    fn payload(&self, series: SeriesStats, station: Station, time: Vec<Timestamp>) -> ResponsePayload {
        ResponsePayload {
            series,
            plotbands: self.config.plotbands.clone(),
            station,
            time,
            partition: self.config.partition,
            unit: self.config.unit.clone(),
        }
    }
}
