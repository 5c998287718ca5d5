// Application state for HTTP handlers
use crate::application::report_service::FullReportService;

#[derive(Clone)]
pub struct AppState {
    pub report_service: FullReportService,
}
