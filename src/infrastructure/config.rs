use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    pub server: ServerSettings,
    pub observations: ObservationSettings,
    #[serde(default)]
    pub visualizations: Vec<VisualizationConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_address: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservationSettings {
    pub host: String,
    /// Per-series retrieval limit; retrievals wait indefinitely when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ObservationSettings {
    pub fn retrieval_timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct VisualizationConfig {
    pub id: String,
    #[serde(default)]
    pub series: Vec<SeriesConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeriesConfig {
    pub procedure: String,
    pub observed_property: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Load `config/report.*`, overridden by `NAR__SECTION__KEY` environment variables
pub fn load_report_config() -> anyhow::Result<ReportConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/report"))
        .add_source(config::Environment::with_prefix("NAR").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
pub fn parse_report_config(toml: &str) -> anyhow::Result<ReportConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    Ok(settings.try_deserialize()?)
}
