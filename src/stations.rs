//! Supported stations and path-parameter validation.

use serde::{Deserialize, Serialize};

use crate::error::StationError;

/// Station metadata as it appears in the response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub url: String,
    pub station_id: i64,
    pub station_type_id: i64,
    pub lat: f64,
    pub lng: f64,
    pub verbose_name: String,
}

/// One row of the supported-station table.
#[derive(Debug)]
pub struct StationInfo {
    pub station_type_id: i64,
    pub station_id: i64,
    pub lat: f64,
    pub lng: f64,
    pub verbose_name: &'static str,
}

pub static SUPPORTED: &[StationInfo] = &[StationInfo {
    station_type_id: 5,
    station_id: 987,
    lat: 9.0,
    lng: 125.5167,
    verbose_name: "Agusan River Entr, Butuan Bay",
}];

impl StationInfo {
    /// Builds the response [`Station`] for a request made on `url`.
    pub fn station(&self, url: &str) -> Station {
        Station {
            url: url.to_string(),
            station_id: self.station_id,
            station_type_id: self.station_type_id,
            lat: self.lat,
            lng: self.lng,
            verbose_name: self.verbose_name.to_string(),
        }
    }
}

/// Finds the table row matching the raw path parameters.
///
/// Parameters are compared as literal strings, so `"05"` does not match
/// type `5`. The station type is checked first and names itself in the
/// error; a known type with an unknown station names the station instead.
pub fn lookup(station_type_id: &str, station_id: &str) -> Result<&'static StationInfo, StationError> {
    let mut of_type = SUPPORTED
        .iter()
        .filter(|s| s.station_type_id.to_string() == station_type_id)
        .peekable();

    if of_type.peek().is_none() {
        return Err(StationError::UnsupportedStationType(
            station_type_id.to_string(),
        ));
    }

    of_type
        .find(|s| s.station_id.to_string() == station_id)
        .ok_or_else(|| StationError::UnsupportedStation(station_id.to_string()))
}

/// Validates the path parameters and builds the [`Station`] for `url`.
pub fn resolve(station_type_id: &str, station_id: &str, url: &str) -> Result<Station, StationError> {
    lookup(station_type_id, station_id).map(|info| info.station(url))
}
