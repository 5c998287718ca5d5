// HTTP request handlers
use crate::application::report_service::{ReportError, ReportOverview, VisualizationSummary};
use crate::application::visualization::{VisualizationError, VisualizeOutcome};
use crate::domain::time_slider::{slider_labels, SliderLabel};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub struct ApiError(ReportError);

impl From<ReportError> for ApiError {
    fn from(error: ReportError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ReportError::UnknownVisualization(_) => StatusCode::NOT_FOUND,
            ReportError::Visualization(VisualizationError::NotVisualized { .. }) => StatusCode::CONFLICT,
            ReportError::Visualization(VisualizationError::RetrievalFailed { .. }) => StatusCode::BAD_GATEWAY,
            ReportError::Slider(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }
        let body = serde_json::json!({
            "error": self.0.to_string(),
            "visualization": self.0.visualization_id(),
        });
        (status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
pub struct VisualizeResponse {
    pub outcome: VisualizeOutcome,
    pub visualization: VisualizationSummary,
}

#[derive(Deserialize)]
pub struct TickQuery {
    pub min: f64,
    pub max: f64,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn list_visualizations(State(state): State<Arc<AppState>>) -> Json<ReportOverview> {
    Json(state.report_service.overview())
}

pub async fn describe_visualization(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<VisualizationSummary>, ApiError> {
    Ok(Json(state.report_service.describe(&id).await?))
}

/// Display a visualization; 201 when it was rendered by this request
pub async fn visualize(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<VisualizeResponse>), ApiError> {
    let (outcome, visualization) = state.report_service.visualize(&id).await?;
    let status = match outcome {
        VisualizeOutcome::Rendered => StatusCode::CREATED,
        VisualizeOutcome::AlreadyDisplayed => StatusCode::OK,
    };
    Ok((status, Json(VisualizeResponse { outcome, visualization })))
}

pub async fn remove_visualization(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<VisualizationSummary>, ApiError> {
    Ok(Json(state.report_service.remove(&id).await?))
}

pub async fn slider_ticks(Query(query): Query<TickQuery>) -> Result<Json<Vec<SliderLabel>>, ApiError> {
    let labels = slider_labels(query.min, query.max).map_err(ReportError::from)?;
    Ok(Json(labels))
}
