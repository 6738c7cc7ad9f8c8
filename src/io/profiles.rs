//! CSV import of normalized profile tables.
//!
//! The expected layout is one header row with a time column (`time`,
//! `timestamp` or `snapshot`) and the columns `pv_profile`, `wind_on_profile`,
//! `wind_off_profile`, `biomass_profile`, `hydro_profile` and `load_profile`.
//! Extra columns are ignored.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::model::{ProfilePoint, ProfileSeries};

/// Failure to read a profile table.
#[derive(Debug, Error)]
pub enum ProfileLoadError {
    #[error("cannot read profiles from \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed profile CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: cannot parse timestamp \"{value}\"")]
    Timestamp { row: usize, value: String },
}

#[derive(Debug, Deserialize)]
struct ProfileRecord {
    #[serde(alias = "timestamp", alias = "snapshot")]
    time: String,
    pv_profile: f64,
    wind_on_profile: f64,
    wind_off_profile: f64,
    biomass_profile: f64,
    hydro_profile: f64,
    load_profile: f64,
}

/// Reads a profile table from a CSV file.
///
/// # Errors
///
/// Returns a `ProfileLoadError` if the file cannot be opened, a row does not
/// match the expected columns, or a timestamp cannot be parsed.
pub fn read_profiles_file(path: &Path) -> Result<ProfileSeries, ProfileLoadError> {
    let file = File::open(path).map_err(|source| ProfileLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let series = read_profiles(BufReader::new(file))?;
    debug!(path = %path.display(), rows = series.len(), "read profile table");
    Ok(series)
}

/// Reads a profile table from any CSV reader.
///
/// Values are not range-checked here; the model builder validates them.
///
/// # Errors
///
/// Returns a `ProfileLoadError` on malformed CSV or timestamps.
pub fn read_profiles(reader: impl Read) -> Result<ProfileSeries, ProfileLoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut points = Vec::new();
    for (row, record) in rdr.deserialize::<ProfileRecord>().enumerate() {
        let record = record?;
        let time = parse_timestamp(&record.time).ok_or_else(|| ProfileLoadError::Timestamp {
            row,
            value: record.time.clone(),
        })?;
        points.push(ProfilePoint {
            time,
            pv: record.pv_profile,
            wind_on: record.wind_on_profile,
            wind_off: record.wind_off_profile,
            biomass: record.biomass_profile,
            hydro: record.hydro_profile,
            load: record.load_profile,
        });
    }
    Ok(ProfileSeries::new(points))
}

/// Parses RFC 3339 or `YYYY-MM-DD HH:MM[:SS]` timestamps, with or without a
/// UTC offset. Offsets are normalized to UTC.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}
