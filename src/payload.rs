//! The response body returned for a station request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::stations::Station;
use crate::stats::SeriesStats;

/// An upstream time value of any JSON type, passed through untouched.
pub type Timestamp = Value;

/// Fixed-shape response: always structurally complete, even without data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub series: SeriesStats,
    pub plotbands: Option<Vec<Value>>,
    pub station: Station,
    /// Aligned index-for-index with `series.values`.
    pub time: Vec<Timestamp>,
    pub partition: i64,
    pub unit: String,
}
