// Full report service - Page-level control of every visualization
use crate::application::category_registry::CategoryRegistry;
use crate::application::plot_registry::{PlotContainer, PlotRegistry};
use crate::application::time_series_source::TimeSeriesSource;
use crate::application::visualization::{
    TimeSeriesVisualization, VisualizationError, VisualizationState, VisualizeOutcome,
};
use crate::domain::collection::TimeSeriesCollection;
use crate::domain::customization::IdComponents;
use crate::domain::time_range::{TimeRange, TimeRangeError};
use crate::domain::time_series::TimeSeries;
use crate::domain::time_slider::{SliderError, TimeSlider};
use crate::infrastructure::config::ReportConfig;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no visualization with id {0}")]
    UnknownVisualization(String),
    #[error("visualization {0} is configured more than once")]
    DuplicateVisualization(String),
    #[error("visualization {0} has no series to retrieve")]
    EmptyVisualization(String),
    #[error("invalid series {observed_property} in visualization {id}: {source}")]
    InvalidSeries {
        id: String,
        observed_property: String,
        #[source]
        source: TimeRangeError,
    },
    #[error(transparent)]
    Visualization(#[from] VisualizationError),
    #[error(transparent)]
    Slider(#[from] SliderError),
}

impl ReportError {
    /// The visualization this error concerns, when there is one
    pub fn visualization_id(&self) -> Option<&str> {
        match self {
            ReportError::UnknownVisualization(id)
            | ReportError::DuplicateVisualization(id)
            | ReportError::EmptyVisualization(id)
            | ReportError::InvalidSeries { id, .. } => Some(id),
            ReportError::Visualization(error) => Some(error.visualization_id()),
            ReportError::Slider(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VisualizationSummary {
    pub id: String,
    pub components: IdComponents,
    pub state: VisualizationState,
    pub series: usize,
    pub points: usize,
    pub time_range: Option<TimeRange>,
    pub allow_time_slider: bool,
    pub time_slider: Option<TimeSlider>,
    pub container: Option<PlotContainer>,
    pub plot_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportOverview {
    pub visualizations: Vec<String>,
    pub displayed: Vec<String>,
    pub number_of_plots: usize,
    pub instructions_visible: bool,
}

#[derive(Clone)]
pub struct FullReportService {
    visualizations: Arc<BTreeMap<String, Mutex<TimeSeriesVisualization>>>,
    registry: Arc<PlotRegistry>,
}

impl FullReportService {
    pub fn new(visualizations: Vec<TimeSeriesVisualization>, registry: Arc<PlotRegistry>) -> Result<Self, ReportError> {
        let mut by_id = BTreeMap::new();
        for visualization in visualizations {
            let id = visualization.id().to_string();
            if by_id.insert(id.clone(), Mutex::new(visualization)).is_some() {
                return Err(ReportError::DuplicateVisualization(id));
            }
        }
        Ok(Self {
            visualizations: Arc::new(by_id),
            registry,
        })
    }

    /// One collection and visualization per configured id
    pub fn from_config(
        config: &ReportConfig,
        source: Arc<dyn TimeSeriesSource>,
        categories: &CategoryRegistry,
        registry: Arc<PlotRegistry>,
    ) -> Result<Self, ReportError> {
        let timeout = config.observations.retrieval_timeout();
        let mut visualizations = Vec::with_capacity(config.visualizations.len());

        for viz_config in &config.visualizations {
            let mut collection = TimeSeriesCollection::new();
            for series in &viz_config.series {
                let range = TimeRange::new(series.start.timestamp_millis(), series.end.timestamp_millis())
                    .map_err(|source| ReportError::InvalidSeries {
                        id: viz_config.id.clone(),
                        observed_property: series.observed_property.clone(),
                        source,
                    })?;
                collection.add(TimeSeries::new(
                    series.observed_property.clone(),
                    series.procedure.clone(),
                    range,
                ));
            }
            if collection.is_empty() {
                return Err(ReportError::EmptyVisualization(viz_config.id.clone()));
            }

            let visualization = TimeSeriesVisualization::new(
                viz_config.id.clone(),
                collection,
                categories,
                Arc::clone(&source),
                Arc::clone(&registry),
            )
            .with_retrieval_timeout(timeout);
            visualizations.push(visualization);
        }

        tracing::info!("Configured {} visualizations", visualizations.len());
        Self::new(visualizations, registry)
    }

    fn lookup(&self, id: &str) -> Result<&Mutex<TimeSeriesVisualization>, ReportError> {
        self.visualizations
            .get(id)
            .ok_or_else(|| ReportError::UnknownVisualization(id.to_string()))
    }

    pub async fn visualize(&self, id: &str) -> Result<(VisualizeOutcome, VisualizationSummary), ReportError> {
        let mut visualization = self.lookup(id)?.lock().await;
        let outcome = visualization.visualize().await?;
        let summary = self.summarize(&visualization)?;
        Ok((outcome, summary))
    }

    pub async fn remove(&self, id: &str) -> Result<VisualizationSummary, ReportError> {
        let mut visualization = self.lookup(id)?.lock().await;
        visualization.remove()?;
        self.summarize(&visualization)
    }

    pub async fn describe(&self, id: &str) -> Result<VisualizationSummary, ReportError> {
        let visualization = self.lookup(id)?.lock().await;
        self.summarize(&visualization)
    }

    pub fn overview(&self) -> ReportOverview {
        ReportOverview {
            visualizations: self.visualizations.keys().cloned().collect(),
            displayed: self.registry.container_ids(),
            number_of_plots: self.registry.number_of_plots(),
            instructions_visible: self.registry.instructions_visible(),
        }
    }

    fn summarize(&self, visualization: &TimeSeriesVisualization) -> Result<VisualizationSummary, ReportError> {
        let collection = visualization.time_series_collection();
        Ok(VisualizationSummary {
            id: visualization.id().to_string(),
            components: visualization.components().clone(),
            state: visualization.state(),
            series: collection.len(),
            points: collection.iter().map(TimeSeries::point_count).sum(),
            time_range: collection.get_time_range().ok(),
            allow_time_slider: visualization.allow_time_slider(),
            time_slider: visualization.time_slider()?,
            container: visualization
                .plot_container()
                .and_then(|container_id| self.registry.container(container_id)),
            plot_active: visualization.plot().map(|plot| plot.is_active()),
        })
    }
}
