// Presentation layer - HTTP API driving the report page
pub mod app_state;
pub mod handlers;
pub mod routes;
