// Time range value type (epoch milliseconds)
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeRangeError {
    #[error("time range start {start} is after end {end}")]
    Inverted { start: i64, end: i64 },
    #[error("cannot build a time range from an empty set of ranges")]
    Empty,
}

/// Closed interval `[start, end]` in epoch milliseconds.
///
/// `TimeRange` is `Copy`, so every accessor hands out a fresh value and
/// callers can never alias the copy held by a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeRange {
    start: i64,
    end: i64,
}

impl TimeRange {
    pub fn new(start: i64, end: i64) -> Result<Self, TimeRangeError> {
        if start > end {
            return Err(TimeRangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn contains(&self, time_ms: i64) -> bool {
        self.start <= time_ms && time_ms <= self.end
    }

    /// Smallest range covering both `self` and `other`.
    pub fn union(&self, other: &TimeRange) -> TimeRange {
        TimeRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Union of every range in `ranges`: min of starts, max of ends.
    pub fn of_all<I>(ranges: I) -> Result<TimeRange, TimeRangeError>
    where
        I: IntoIterator<Item = TimeRange>,
    {
        ranges
            .into_iter()
            .reduce(|acc, range| acc.union(&range))
            .ok_or(TimeRangeError::Empty)
    }
}
