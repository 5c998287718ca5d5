// Router construction
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    describe_visualization, health_check, list_visualizations, remove_visualization, slider_ticks, visualize,
};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    // ids contain '/', so they are captured with a wildcard
    Router::new()
        .route("/healthz", get(health_check))
        .route("/visualizations", get(list_visualizations))
        .route(
            "/visualizations/*id",
            get(describe_visualization)
                .post(visualize)
                .delete(remove_visualization),
        )
        .route("/slider/ticks", get(slider_ticks))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::category_registry::CategoryRegistry;
    use crate::application::plot_registry::PlotRegistry;
    use crate::application::report_service::FullReportService;
    use crate::application::time_series_source::fakes::StaticSource;
    use crate::application::visualization::TimeSeriesVisualization;
    use crate::domain::collection::TimeSeriesCollection;
    use crate::domain::time_range::TimeRange;
    use crate::domain::time_series::TimeSeries;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn router() -> Router {
        let registry = Arc::new(PlotRegistry::new());
        let source = Arc::new(StaticSource::new().failing("broken"));
        let categories = CategoryRegistry::standard();

        let make = |id: &str, property: &str| {
            let mut collection = TimeSeriesCollection::new();
            collection.add(TimeSeries::new(
                property.to_string(),
                "proc".to_string(),
                TimeRange::new(946_684_800_000, 1_262_304_000_000).unwrap(),
            ));
            TimeSeriesVisualization::new(id.to_string(), collection, &categories, source.clone(), registry.clone())
        };

        let service = FullReportService::new(
            vec![make("tp/load", "load"), make("nh3/discrete", "broken")],
            registry.clone(),
        )
        .unwrap();
        build_router(Arc::new(AppState { report_service: service }))
    }

    async fn send(router: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_visualize_lifecycle_over_http() {
        let router = router();

        let (status, body) = send(&router, Method::POST, "/visualizations/tp/load").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["outcome"], "rendered");
        assert_eq!(body["visualization"]["state"], "visualized");
        assert_eq!(body["visualization"]["container"]["id"], "tp/load_full_report_plot");
        assert_eq!(body["visualization"]["container"]["content"]["type"], "chart");

        let (status, body) = send(&router, Method::POST, "/visualizations/tp/load").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "already_displayed");

        let (_, overview) = send(&router, Method::GET, "/visualizations").await;
        assert_eq!(overview["number_of_plots"], 1);
        assert_eq!(overview["instructions_visible"], false);

        let (status, body) = send(&router, Method::DELETE, "/visualizations/tp/load").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "uninitialized");

        let (_, overview) = send(&router, Method::GET, "/visualizations").await;
        assert_eq!(overview["number_of_plots"], 0);
        assert_eq!(overview["instructions_visible"], true);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let router = router();

        let (status, body) = send(&router, Method::GET, "/visualizations/no/such").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["visualization"], "no/such");

        let (status, body) = send(&router, Method::DELETE, "/visualizations/tp/load").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["visualization"], "tp/load");

        let (status, body) = send(&router, Method::POST, "/visualizations/nh3/discrete").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("nh3/discrete"));
        assert_eq!(body["visualization"], "nh3/discrete");
    }

    #[tokio::test]
    async fn test_slider_ticks_and_health() {
        let router = router();

        let (status, body) = send(&router, Method::GET, "/slider/ticks?min=0&max=100").await;
        assert_eq!(status, StatusCode::OK);
        let labels = body.as_array().unwrap();
        assert_eq!(labels.len(), 11);
        assert_eq!(labels[10]["left_percent"], 100);
        assert_eq!(labels[0]["text"], "1970");

        let (status, body) = send(&router, Method::GET, "/slider/ticks?min=10&max=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["visualization"].is_null());

        let (status, _) = send(&router, Method::GET, "/healthz").await;
        assert_eq!(status, StatusCode::OK);
    }
}
