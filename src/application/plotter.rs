// Plotter capability and the built-in chart plotters
use crate::application::visualization::TimeSeriesVisualization;
use crate::domain::chart::{ChartData, ChartKind, SeriesData, SeriesRole};
use crate::domain::range_strategy::RangeError;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("cannot determine the display range: {0}")]
    Range(#[from] RangeError),
}

/// A live rendering. `shutdown` releases it; it is called at most once.
pub trait Plot: Send + Sync + fmt::Debug {
    fn chart(&self) -> &ChartData;
    fn shutdown(&mut self);
    fn is_active(&self) -> bool;
}

/// Builds a plot from a visualization whose series have all been retrieved.
pub trait Plotter: Send + Sync + fmt::Debug {
    fn plot(&self, visualization: &TimeSeriesVisualization) -> Result<Box<dyn Plot>, PlotError>;
}

#[derive(Debug)]
pub struct ChartPlot {
    chart: ChartData,
    active: bool,
}

impl ChartPlot {
    pub fn new(chart: ChartData) -> Self {
        Self { chart, active: true }
    }
}

impl Plot for ChartPlot {
    fn chart(&self) -> &ChartData {
        &self.chart
    }

    fn shutdown(&mut self) {
        self.active = false;
        self.chart.series.clear();
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Plots every series of the collection, clipped to the range the
/// visualization's strategy selects. Series named by the ancillary
/// descriptors are tagged as ancillary.
#[derive(Debug, Clone, Copy)]
pub struct ChartPlotter {
    kind: ChartKind,
}

impl ChartPlotter {
    pub fn new(kind: ChartKind) -> Self {
        Self { kind }
    }

    pub fn sample_concentration() -> Self {
        Self::new(ChartKind::SampleConcentration)
    }

    pub fn load() -> Self {
        Self::new(ChartKind::Load)
    }

    pub fn flow() -> Self {
        Self::new(ChartKind::Flow)
    }

    fn title(&self, visualization: &TimeSeriesVisualization) -> String {
        let subject = visualization
            .components()
            .constituent
            .as_deref()
            .unwrap_or(visualization.id());
        format!("{} {}", subject, self.kind.label())
    }
}

impl Plotter for ChartPlotter {
    fn plot(&self, visualization: &TimeSeriesVisualization) -> Result<Box<dyn Plot>, PlotError> {
        let collection = visualization.time_series_collection();
        let range = visualization.ranger().range(collection)?;
        let ancillary = visualization.ancillary_data();

        let mut series: Vec<SeriesData> = collection
            .iter()
            .filter(|s| !ancillary.iter().any(|a| a.observed_property == s.observed_property()))
            .map(|s| {
                SeriesData::new(
                    s.observed_property().to_string(),
                    s.procedure().to_string(),
                    SeriesRole::Primary,
                    s.points_within(&range),
                )
            })
            .collect();

        for descriptor in ancillary {
            match collection.get_time_series_by_observed_property(&descriptor.observed_property) {
                Some(s) => series.push(SeriesData::new(
                    s.observed_property().to_string(),
                    s.procedure().to_string(),
                    SeriesRole::Ancillary,
                    s.points_within(&range),
                )),
                None => tracing::warn!(
                    visualization = %visualization.id(),
                    observed_property = %descriptor.observed_property,
                    "Ancillary series missing from collection"
                ),
            }
        }

        let chart = ChartData::new(
            visualization.id().to_string(),
            self.title(visualization),
            self.kind,
            range,
            series,
        );
        Ok(Box::new(ChartPlot::new(chart)))
    }
}
