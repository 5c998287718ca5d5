// Visualization lifecycle: retrieve every series, plot once, tear down on removal
use crate::application::category_registry::{CategoryRegistry, Customization};
use crate::application::plot_registry::{plot_container_id, ContainerContent, PlotRegistry};
use crate::application::plotter::{Plot, PlotError, Plotter};
use crate::application::time_series_source::{RetrievalError, TimeSeriesSource};
use crate::domain::collection::TimeSeriesCollection;
use crate::domain::customization::{AncillaryDescriptor, IdComponents};
use crate::domain::range_strategy::RangeStrategy;
use crate::domain::time_slider::{SliderError, TimeSlider};
use futures::future::try_join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum VisualizationError {
    #[error("data retrieval failed for visualization {id}: {source}")]
    RetrievalFailed {
        id: String,
        #[source]
        source: RetrievalError,
    },
    #[error("plotting failed for visualization {id}: {source}")]
    PlotFailed {
        id: String,
        #[source]
        source: PlotError,
    },
    #[error("visualization {id} is not displayed")]
    NotVisualized { id: String },
}

impl VisualizationError {
    pub fn visualization_id(&self) -> &str {
        match self {
            VisualizationError::RetrievalFailed { id, .. }
            | VisualizationError::PlotFailed { id, .. }
            | VisualizationError::NotVisualized { id } => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualizationState {
    Uninitialized,
    Retrieving,
    Visualized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualizeOutcome {
    /// Data was retrieved and a plot or placeholder was rendered
    Rendered,
    /// A container for this id was already on the page; nothing was rendered
    AlreadyDisplayed,
}

/// Controller for one visualization id on a report page.
pub struct TimeSeriesVisualization {
    id: String,
    components: IdComponents,
    customization: Customization,
    time_series_collection: TimeSeriesCollection,
    source: Arc<dyn TimeSeriesSource>,
    registry: Arc<PlotRegistry>,
    retrieval_timeout: Option<Duration>,
    plot: Option<Box<dyn Plot>>,
    plot_container: Option<String>,
    state: VisualizationState,
}

impl TimeSeriesVisualization {
    pub fn new(
        id: String,
        time_series_collection: TimeSeriesCollection,
        categories: &CategoryRegistry,
        source: Arc<dyn TimeSeriesSource>,
        registry: Arc<PlotRegistry>,
    ) -> Self {
        let components = IdComponents::parse(&id);
        if components.constituent.is_none() {
            tracing::warn!(visualization = %id, "Unrecognized constituent in visualization id");
        }
        let customization = categories.resolve(&components);
        Self {
            id,
            components,
            customization,
            time_series_collection,
            source,
            registry,
            retrieval_timeout: None,
            plot: None,
            plot_container: None,
            state: VisualizationState::Uninitialized,
        }
    }

    pub fn with_retrieval_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.retrieval_timeout = timeout;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn components(&self) -> &IdComponents {
        &self.components
    }

    pub fn time_series_collection(&self) -> &TimeSeriesCollection {
        &self.time_series_collection
    }

    pub fn ranger(&self) -> RangeStrategy {
        self.customization.ranger
    }

    pub fn ancillary_data(&self) -> &[AncillaryDescriptor] {
        &self.customization.ancillary
    }

    pub fn allow_time_slider(&self) -> bool {
        self.customization.allow_time_slider
    }

    pub fn plot(&self) -> Option<&dyn Plot> {
        self.plot.as_deref()
    }

    pub fn plot_container(&self) -> Option<&str> {
        self.plot_container.as_deref()
    }

    pub fn state(&self) -> VisualizationState {
        self.state
    }

    /// Slider over the collection's range, if this category permits one
    pub fn time_slider(&self) -> Result<Option<TimeSlider>, SliderError> {
        if !self.allow_time_slider() {
            return Ok(None);
        }
        let Ok(range) = self.time_series_collection.get_time_range() else {
            return Ok(None);
        };
        let mut slider = TimeSlider::new();
        slider.configure(range)?;
        Ok(Some(slider))
    }

    /// Retrieves every series and renders the plot.
    ///
    /// If a container for this id is already on the page, returns
    /// immediately without retrieving or rendering. On failure the container
    /// is withdrawn, the plot counter is untouched and the visualization can
    /// be attempted again. Dropping the returned future before it resolves
    /// has the same effect as a failed retrieval.
    pub async fn visualize(&mut self) -> Result<VisualizeOutcome, VisualizationError> {
        let container_id = plot_container_id(&self.id);
        if !self.registry.insert_container(&container_id) {
            tracing::debug!(visualization = %self.id, "Plot container already present");
            return Ok(VisualizeOutcome::AlreadyDisplayed);
        }
        self.plot_container = Some(container_id.clone());
        self.state = VisualizationState::Retrieving;

        let attempt = PendingAttempt {
            id: &self.id,
            registry: &self.registry,
            plot_container: &mut self.plot_container,
            state: &mut self.state,
            armed: true,
        };
        let cancel = CancellationToken::new();
        // fetch tasks outlive their futures; this stops whichever are still running
        let _stragglers = cancel.clone().drop_guard();
        let retrievals =
            self.time_series_collection
                .retrieve_data(&self.source, &cancel, self.retrieval_timeout);
        tracing::info!(
            visualization = %self.id,
            series = retrievals.len(),
            "Retrieving time series"
        );

        let retrieved = try_join_all(retrievals).await;
        attempt.settle();

        if let Err(error) = retrieved {
            self.withdraw_container();
            tracing::error!(
                visualization = %self.id,
                series = %error.observed_property(),
                error = %error,
                "Data retrieval failed"
            );
            return Err(VisualizationError::RetrievalFailed {
                id: self.id.clone(),
                source: error,
            });
        }

        let content = match self.customization.plotter.clone() {
            Some(plotter) => match plotter.plot(self) {
                Ok(plot) => {
                    let chart = plot.chart().clone();
                    self.plot = Some(plot);
                    ContainerContent::Chart { chart }
                }
                Err(error) => {
                    self.withdraw_container();
                    tracing::error!(visualization = %self.id, error = %error, "Plotting failed");
                    return Err(VisualizationError::PlotFailed {
                        id: self.id.clone(),
                        source: error,
                    });
                }
            },
            None => ContainerContent::Placeholder {
                text: self.id.clone(),
            },
        };
        self.registry.set_content(&container_id, content);

        let number_of_plots = self.registry.plot_added();
        self.state = VisualizationState::Visualized;
        tracing::info!(visualization = %self.id, number_of_plots, "Visualization displayed");
        Ok(VisualizeOutcome::Rendered)
    }

    /// Tears down the container and plot rendered by `visualize`.
    pub fn remove(&mut self) -> Result<(), VisualizationError> {
        if self.state != VisualizationState::Visualized {
            return Err(VisualizationError::NotVisualized {
                id: self.id.clone(),
            });
        }

        if let Some(container_id) = self.plot_container.take() {
            self.registry.remove_container(&container_id);
        }
        if let Some(mut plot) = self.plot.take() {
            plot.shutdown();
        }

        let number_of_plots = self.registry.plot_removed();
        self.state = VisualizationState::Uninitialized;
        tracing::info!(visualization = %self.id, number_of_plots, "Visualization removed");
        Ok(())
    }

    fn withdraw_container(&mut self) {
        if let Some(container_id) = self.plot_container.take() {
            self.registry.remove_container(&container_id);
        }
        self.state = VisualizationState::Uninitialized;
    }
}

/// Withdraws the container of an attempt that is dropped while retrieving.
struct PendingAttempt<'a> {
    id: &'a str,
    registry: &'a PlotRegistry,
    plot_container: &'a mut Option<String>,
    state: &'a mut VisualizationState,
    armed: bool,
}

impl PendingAttempt<'_> {
    /// Retrieval finished; the caller takes over the container.
    fn settle(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingAttempt<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Some(container_id) = self.plot_container.take() {
            self.registry.remove_container(&container_id);
        }
        *self.state = VisualizationState::Uninitialized;
        tracing::warn!(visualization = %self.id, "Visualization abandoned during retrieval");
    }
}
