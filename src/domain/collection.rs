// Aggregation of the time series behind one visualization
use crate::application::time_series_source::TimeSeriesSource;
use crate::domain::time_range::{TimeRange, TimeRangeError};
use crate::domain::time_series::{Retrieval, TimeSeries};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Additive set of time series with an incrementally maintained aggregate range.
///
/// Series ranges are immutable, so the cached aggregate can only go stale
/// through `add`, which recomputes it.
#[derive(Debug, Default)]
pub struct TimeSeriesCollection {
    series: Vec<TimeSeries>,
    time_range: Option<TimeRange>,
}

impl TimeSeriesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, series: TimeSeries) {
        let added = series.time_range();
        self.time_range = TimeRange::of_all(self.time_range.into_iter().chain(Some(added))).ok();
        self.series.push(series);
    }

    /// Union of every member range. Fails on an empty collection.
    pub fn get_time_range(&self) -> Result<TimeRange, TimeRangeError> {
        self.time_range.ok_or(TimeRangeError::Empty)
    }

    /// The most recently added series observing `observed_property`.
    pub fn get_time_series_by_observed_property(&self, observed_property: &str) -> Option<&TimeSeries> {
        self.series
            .iter()
            .rev()
            .find(|s| s.observed_property() == observed_property)
    }

    /// Starts a retrieval for every member without awaiting any of them.
    pub fn retrieve_data(
        &self,
        source: &Arc<dyn TimeSeriesSource>,
        cancel: &CancellationToken,
        timeout: Option<Duration>,
    ) -> Vec<Retrieval> {
        self.series
            .iter()
            .map(|s| s.retrieve_data(Arc::clone(source), cancel.child_token(), timeout))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeSeries> {
        self.series.iter()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
