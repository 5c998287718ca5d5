// HTTP observation service implementation
use crate::application::time_series_source::TimeSeriesSource;
use crate::domain::time_range::TimeRange;
use crate::domain::time_series::TimeSeriesPoint;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct HttpObservationSource {
    host: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ObservationResponse {
    #[serde(default)]
    observations: Vec<ObservationRow>,
}

#[derive(Debug, Deserialize)]
struct ObservationRow {
    time: String,
    value: Option<f64>,
}

impl HttpObservationSource {
    pub fn new(host: String) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn build_observation_url(&self, procedure: &str, observed_property: &str, range: TimeRange) -> Result<String> {
        let begin = format_instant(range.start())?;
        let end = format_instant(range.end())?;
        Ok(format!(
            "{}/observations?procedure={}&observedProperty={}&begin={}&end={}",
            self.host,
            urlencoding::encode(procedure),
            urlencoding::encode(observed_property),
            urlencoding::encode(&begin),
            urlencoding::encode(&end)
        ))
    }

    fn to_points(response: ObservationResponse) -> Vec<TimeSeriesPoint> {
        response
            .observations
            .into_iter()
            .filter_map(|row| {
                let value = row.value?;
                match DateTime::parse_from_rfc3339(&row.time) {
                    Ok(time) => Some(TimeSeriesPoint::new(time.timestamp_millis(), value)),
                    Err(e) => {
                        tracing::debug!("Skipping observation with bad time {}: {}", row.time, e);
                        None
                    }
                }
            })
            .collect()
    }
}

fn format_instant(time_ms: i64) -> Result<String> {
    let instant = DateTime::<Utc>::from_timestamp_millis(time_ms)
        .with_context(|| format!("Timestamp {} is out of range", time_ms))?;
    Ok(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[async_trait]
impl TimeSeriesSource for HttpObservationSource {
    async fn fetch_observations(
        &self,
        procedure: &str,
        observed_property: &str,
        range: TimeRange,
    ) -> Result<Vec<TimeSeriesPoint>> {
        let url = self.build_observation_url(procedure, observed_property, range)?;
        tracing::debug!("Requesting observations: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to observation service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Observation query failed with status {}: {}", status, body);
        }

        let data = response
            .json::<ObservationResponse>()
            .await
            .context("Failed to parse observation response")?;

        Ok(Self::to_points(data))
    }
}
