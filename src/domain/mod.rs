// Domain layer - Time ranges, series and the pure algorithms over them
pub mod chart;
pub mod collection;
pub mod customization;
pub mod range_strategy;
pub mod time_range;
pub mod time_series;
pub mod time_slider;
