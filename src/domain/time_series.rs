// Time series domain models
use crate::application::time_series_source::{RetrievalError, TimeSeriesSource};
use crate::domain::time_range::TimeRange;
use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::RwLock;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub time_ms: i64,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self { time_ms, value }
    }
}

/// Pending retrieval of one series. Resolves to the number of points stored.
pub type Retrieval = BoxFuture<'static, Result<usize, RetrievalError>>;

/// A dataset identified by its procedure and observed property.
///
/// The time range is fixed at construction; only the retrieved points change.
#[derive(Debug)]
pub struct TimeSeries {
    observed_property: String,
    procedure: String,
    time_range: TimeRange,
    points: Arc<RwLock<Vec<TimeSeriesPoint>>>,
}

impl TimeSeries {
    pub fn new(observed_property: String, procedure: String, time_range: TimeRange) -> Self {
        Self {
            observed_property,
            procedure,
            time_range,
            points: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn observed_property(&self) -> &str {
        &self.observed_property
    }

    pub fn procedure(&self) -> &str {
        &self.procedure
    }

    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    pub fn point_count(&self) -> usize {
        self.points.read().len()
    }

    /// Snapshot of the retrieved points falling inside `range`.
    pub fn points_within(&self, range: &TimeRange) -> Vec<TimeSeriesPoint> {
        self.points
            .read()
            .iter()
            .filter(|p| range.contains(p.time_ms))
            .cloned()
            .collect()
    }

    /// Starts fetching this series from `source`.
    ///
    /// The fetch runs on its own task once the returned future is first
    /// polled. Dropping the future does not stop that task; cancelling
    /// `cancel` does. Points from a previous retrieval are replaced only when
    /// the fetch succeeds.
    pub fn retrieve_data(
        &self,
        source: Arc<dyn TimeSeriesSource>,
        cancel: CancellationToken,
        timeout: Option<Duration>,
    ) -> Retrieval {
        let observed_property = self.observed_property.clone();
        let procedure = self.procedure.clone();
        let range = self.time_range;
        let points = Arc::clone(&self.points);
        let task_property = observed_property.clone();

        let fetch_task = async move {
            let outcome = {
                let fetch = source.fetch_observations(&procedure, &observed_property, range);
                tokio::select! {
                    _ = cancel.cancelled() => None,
                    outcome = bounded(fetch, timeout) => Some(outcome),
                }
            };

            match outcome {
                None => Err(RetrievalError::Cancelled { observed_property }),
                Some(None) => Err(RetrievalError::TimedOut {
                    observed_property,
                    timeout: timeout.unwrap_or_default(),
                }),
                Some(Some(Err(error))) => Err(RetrievalError::Source {
                    observed_property,
                    error,
                }),
                Some(Some(Ok(fetched))) => {
                    let count = fetched.len();
                    *points.write() = fetched;
                    tracing::debug!(
                        observed_property = %observed_property,
                        procedure = %procedure,
                        count,
                        "Retrieved time series"
                    );
                    Ok(count)
                }
            }
        };

        async move {
            match tokio::spawn(fetch_task).await {
                Ok(result) => result,
                Err(join_error) => Err(RetrievalError::Aborted {
                    observed_property: task_property,
                    reason: join_error.to_string(),
                }),
            }
        }
        .boxed()
    }
}

async fn bounded<F: Future>(future: F, limit: Option<Duration>) -> Option<F::Output> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, future).await.ok(),
        None => Some(future.await),
    }
}
