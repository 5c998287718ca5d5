// Chart models produced by plotters
use crate::domain::time_range::TimeRange;
use crate::domain::time_series::TimeSeriesPoint;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    SampleConcentration,
    Load,
    Flow,
}

impl ChartKind {
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::SampleConcentration => "sample concentrations",
            ChartKind::Load => "loads",
            ChartKind::Flow => "discharge",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesRole {
    Primary,
    Ancillary,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesData {
    pub observed_property: String,
    pub procedure: String,
    pub role: SeriesRole,
    pub points: Vec<TimeSeriesPoint>,
}

impl SeriesData {
    pub fn new(
        observed_property: String,
        procedure: String,
        role: SeriesRole,
        points: Vec<TimeSeriesPoint>,
    ) -> Self {
        Self {
            observed_property,
            procedure,
            role,
            points,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    pub range: TimeRange,
    pub series: Vec<SeriesData>,
}

impl ChartData {
    pub fn new(id: String, title: String, kind: ChartKind, range: TimeRange, series: Vec<SeriesData>) -> Self {
        Self {
            id,
            title,
            kind,
            range,
            series,
        }
    }
}

#[cfg(test)]
impl ChartData {
    pub fn series_with_role(&self, role: SeriesRole) -> impl Iterator<Item = &SeriesData> {
        self.series.iter().filter(move |s| s.role == role)
    }
}
