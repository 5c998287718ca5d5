// Display range strategies selected per visualization category
use crate::domain::collection::TimeSeriesCollection;
use crate::domain::time_range::{TimeRange, TimeRangeError};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::Serialize;
use thiserror::Error;

/// First month of a water year (October)
const WATER_YEAR_START_MONTH: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("no range strategy is implemented for this visualization")]
    Unimplemented,
    #[error(transparent)]
    Range(#[from] TimeRangeError),
    #[error("timestamp {0} ms is outside the representable calendar")]
    InvalidTimestamp(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeStrategy {
    /// Everything any series covers
    DataAvailability,
    /// The water year containing the latest data
    MostRecentWaterYear,
    Unimplemented,
}

impl RangeStrategy {
    pub fn range(&self, collection: &TimeSeriesCollection) -> Result<TimeRange, RangeError> {
        match self {
            RangeStrategy::DataAvailability => Ok(collection.get_time_range()?),
            RangeStrategy::MostRecentWaterYear => {
                let available = collection.get_time_range()?;
                let water_year = water_year_containing(available.end())?;
                Ok(TimeRange::new(
                    water_year.start().max(available.start()),
                    water_year.end(),
                )?)
            }
            RangeStrategy::Unimplemented => Err(RangeError::Unimplemented),
        }
    }
}

/// October 1 through September 30 (UTC) around `time_ms`
pub fn water_year_containing(time_ms: i64) -> Result<TimeRange, RangeError> {
    let instant = DateTime::<Utc>::from_timestamp_millis(time_ms)
        .ok_or(RangeError::InvalidTimestamp(time_ms))?;
    let start_year = if instant.month() >= WATER_YEAR_START_MONTH {
        instant.year()
    } else {
        instant.year() - 1
    };

    let start = october_first(start_year).ok_or(RangeError::InvalidTimestamp(time_ms))?;
    let next = october_first(start_year + 1).ok_or(RangeError::InvalidTimestamp(time_ms))?;
    Ok(TimeRange::new(start, next - 1)?)
}

fn october_first(year: i32) -> Option<i64> {
    Utc.with_ymd_and_hms(year, WATER_YEAR_START_MONTH, 1, 0, 0, 0)
        .single()
        .map(|dt| dt.timestamp_millis())
}
