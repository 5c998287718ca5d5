// Source trait for on-demand time series retrieval
use crate::domain::time_range::TimeRange;
use crate::domain::time_series::TimeSeriesPoint;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("retrieval of {observed_property} was cancelled")]
    Cancelled { observed_property: String },
    #[error("retrieval of {observed_property} timed out after {timeout:?}")]
    TimedOut {
        observed_property: String,
        timeout: Duration,
    },
    #[error("retrieval of {observed_property} failed: {error:#}")]
    Source {
        observed_property: String,
        error: anyhow::Error,
    },
    #[error("retrieval task for {observed_property} ended abnormally: {reason}")]
    Aborted {
        observed_property: String,
        reason: String,
    },
}

impl RetrievalError {
    pub fn observed_property(&self) -> &str {
        match self {
            RetrievalError::Cancelled { observed_property }
            | RetrievalError::TimedOut { observed_property, .. }
            | RetrievalError::Source { observed_property, .. }
            | RetrievalError::Aborted { observed_property, .. } => observed_property,
        }
    }
}

#[async_trait]
pub trait TimeSeriesSource: Send + Sync {
    /// Fetch every observation of `observed_property` measured by `procedure` within `range`
    async fn fetch_observations(
        &self,
        procedure: &str,
        observed_property: &str,
        range: TimeRange,
    ) -> anyhow::Result<Vec<TimeSeriesPoint>>;
}
