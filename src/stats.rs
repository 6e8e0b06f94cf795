use serde::{Deserialize, Serialize};

use crate::error::FeedError;
use crate::parser::SeriesRecord;

/// Sentinel used for every scalar field when the upstream had no data.
pub const NO_DATA: i64 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub maxval: f64,
    pub sensor_id: i64,
    pub label: i64,
    pub values: Vec<f64>,
}

impl SeriesStats {
    /// Builds stats from a decoded upstream series.
    ///
    /// # Errors
    ///
    /// An empty `values` has no maximum and is reported as a malformed payload.
    pub fn from_record(series: SeriesRecord) -> Result<Self, FeedError> {
        let maxval = Self::max(&series.values).ok_or_else(|| {
            FeedError::MalformedPayload("series.values is empty".to_string())
        })?;

        Ok(SeriesStats {
            maxval,
            sensor_id: series.sensor_id,
            label: series.label,
            values: series.values,
        })
    }

    /// The "no data" series: sentinel scalars and no readings.
    pub fn no_data() -> Self {
        SeriesStats {
            maxval: NO_DATA as f64,
            sensor_id: NO_DATA,
            label: NO_DATA,
            values: Vec::new(),
        }
    }

    pub fn max(values: &[f64]) -> Option<f64> {
        values.iter().copied().reduce(f64::max)
    }

    pub fn is_no_data(&self) -> bool {
        *self == Self::no_data()
    }
}
