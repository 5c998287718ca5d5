// Application layer - Retrieval seam, plotting and the visualization lifecycle
pub mod category_registry;
pub mod plot_registry;
pub mod plotter;
pub mod report_service;
pub mod time_series_source;
pub mod visualization;
