// Year-range slider model and tick label computation
use crate::domain::time_range::TimeRange;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Ticks are placed at every `100 / TICK_STEPS` percent of the domain.
pub const TICK_STEPS: u32 = 10;

#[derive(Debug, Error, PartialEq)]
pub enum SliderError {
    #[error("slider domain [{min}, {max}] is not a finite, ordered interval")]
    InvalidDomain { min: f64, max: f64 },
    #[error("timestamp {0} ms cannot be shown as a year")]
    TimestampOutOfRange(f64),
}

/// Four-digit year of `timestamp_ms` (UTC)
pub fn format_label(timestamp_ms: f64) -> Result<String, SliderError> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms.round() as i64)
        .map(|dt| dt.format("%Y").to_string())
        .ok_or(SliderError::TimestampOutOfRange(timestamp_ms))
}

/// `TICK_STEPS + 1` year labels evenly spaced from `min` to `max` inclusive.
///
/// A zero-width domain yields the same label at every tick.
pub fn year_ticks(min: f64, max: f64) -> Result<Vec<String>, SliderError> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(SliderError::InvalidDomain { min, max });
    }
    let difference = max - min;
    (0..=TICK_STEPS)
        .map(|step| {
            let fraction = f64::from(step) / f64::from(TICK_STEPS);
            format_label(min + fraction * difference)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderLabel {
    pub text: String,
    pub left_percent: u32,
}

pub fn slider_labels(min: f64, max: f64) -> Result<Vec<SliderLabel>, SliderError> {
    let step_percent = 100 / TICK_STEPS;
    Ok(year_ticks(min, max)?
        .into_iter()
        .zip(0..)
        .map(|(text, index)| SliderLabel {
            text,
            left_percent: index * step_percent,
        })
        .collect())
}

/// Two-handle range slider. Starts disabled until a domain is configured.
#[derive(Debug, Clone, Serialize)]
pub struct TimeSlider {
    min: i64,
    max: i64,
    values: (i64, i64),
    disabled: bool,
    labels: Vec<SliderLabel>,
}

impl Default for TimeSlider {
    fn default() -> Self {
        Self {
            min: 0,
            max: 0,
            values: (0, 0),
            disabled: true,
            labels: Vec::new(),
        }
    }
}

impl TimeSlider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the domain to `range`, selects all of it and enables the slider
    pub fn configure(&mut self, range: TimeRange) -> Result<(), SliderError> {
        self.min = range.start();
        self.max = range.end();
        self.values = (self.min, self.max);
        self.update_labels()?;
        self.disabled = false;
        Ok(())
    }

    pub fn update_labels(&mut self) -> Result<(), SliderError> {
        self.labels = slider_labels(self.min as f64, self.max as f64)?;
        Ok(())
    }

}

#[cfg(test)]
impl TimeSlider {
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn values(&self) -> (i64, i64) {
        self.values
    }

    pub fn labels(&self) -> &[SliderLabel] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn millis(year: i32) -> f64 {
        Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap().timestamp_millis() as f64
    }

    #[test]
    fn test_eleven_ticks_over_small_domain() {
        let ticks = year_ticks(0.0, 100.0).unwrap();
        assert_eq!(ticks.len(), 11);
        assert!(ticks.iter().all(|t| t == "1970"));
    }

    #[test]
    fn test_ticks_span_the_domain() {
        let ticks = year_ticks(millis(1990), millis(2010)).unwrap();
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks.first().map(String::as_str), Some("1990"));
        assert_eq!(ticks[5], "2000");
        assert_eq!(ticks.last().map(String::as_str), Some("2010"));
        assert!(ticks.iter().all(|t| t.len() == 4 && t.parse::<i32>().is_ok()));
    }

    #[test]
    fn test_degenerate_domain() {
        let ticks = year_ticks(millis(2005), millis(2005)).unwrap();
        assert_eq!(ticks, vec!["2005".to_string(); 11]);
    }

    #[test]
    fn test_invalid_domains() {
        assert!(matches!(year_ticks(10.0, 0.0), Err(SliderError::InvalidDomain { .. })));
        assert!(matches!(year_ticks(f64::NAN, 0.0), Err(SliderError::InvalidDomain { .. })));
        assert!(matches!(year_ticks(0.0, 1e300), Err(SliderError::TimestampOutOfRange(_))));
    }

    #[test]
    fn test_labels_are_positioned_every_ten_percent() {
        let labels = slider_labels(0.0, 100.0).unwrap();
        let positions: Vec<u32> = labels.iter().map(|l| l.left_percent).collect();
        assert_eq!(positions, vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
    }

    #[test]
    fn test_slider_lifecycle() {
        let mut slider = TimeSlider::new();
        assert!(slider.is_disabled());
        assert!(slider.labels().is_empty());

        let range = TimeRange::new(millis(2000) as i64, millis(2010) as i64).unwrap();
        slider.configure(range).unwrap();
        assert!(!slider.is_disabled());
        assert_eq!(slider.values(), (range.start(), range.end()));
        assert_eq!(slider.labels().len(), 11);
        assert_eq!(slider.labels()[0].text, "2000");
        assert_eq!(slider.labels()[10].text, "2010");
    }
}
