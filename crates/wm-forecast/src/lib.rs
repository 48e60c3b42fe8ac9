//! Demand-forecast domain logic.
//!
//! The dashboard charts a predicted-demand series that comes from a static
//! per-country forecast document when one is available, and from a synthetic
//! two-day generator when it is not. Parsing, label derivation, the
//! generator, and the summary statistics all live here so they stay testable
//! off the browser.

use chrono::NaiveDateTime;
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("forecast document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("forecast document is empty")]
    Empty,
    #[error("`ds` and `yhat_corrected` differ in length ({ds} vs {yhat})")]
    MismatchedArrays { ds: usize, yhat: usize },
}

/// Raw per-country forecast document: parallel arrays of timestamps and
/// corrected predictions.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastDoc {
    pub ds: Vec<String>,
    pub yhat_corrected: Vec<f64>,
}

/// Chart-ready series: one label per value, same order as the source.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ForecastDoc {
    pub fn parse(json: &str) -> Result<ForecastDoc, ForecastError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the parallel arrays and derive chart labels. A length
    /// mismatch is malformed input, not something to truncate: a chart with
    /// silently misaligned labels and values is worse than the fallback.
    pub fn into_series(self) -> Result<ForecastSeries, ForecastError> {
        if self.ds.len() != self.yhat_corrected.len() {
            return Err(ForecastError::MismatchedArrays {
                ds: self.ds.len(),
                yhat: self.yhat_corrected.len(),
            });
        }
        if self.ds.is_empty() {
            return Err(ForecastError::Empty);
        }
        Ok(ForecastSeries {
            labels: self.ds.iter().map(|ts| timestamp_label(ts)).collect(),
            values: self.yhat_corrected,
        })
    }
}

/// Format a forecast timestamp as the chart label "M/D H:00".
/// Unparseable stamps fall through as-is rather than dropping the point.
pub fn timestamp_label(ts: &str) -> String {
    use chrono::{Datelike, Timelike};

    let parsed = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M"));
    match parsed {
        Ok(dt) => format!("{}/{} {}:00", dt.month(), dt.day(), dt.hour()),
        Err(_) => ts.trim().to_string(),
    }
}

// ── Synthetic fallback generator ──

pub const SYNTHETIC_POINTS: usize = 48;
pub const BASE_LOAD: f64 = 100.0;

/// Sinusoidal daytime contribution for an hour of day. Exactly zero outside
/// the [8, 20] window.
pub fn daytime_peak(hour: u32) -> f64 {
    let h = hour % 24;
    if (8..=20).contains(&h) {
        (((h - 8) as f64) * std::f64::consts::PI / 12.0).sin() * 50.0
    } else {
        0.0
    }
}

/// Two-day hourly series: base load plus daytime peak plus uniform noise in
/// [-10, 10], floored at zero. Labels run "Day 1 0:00" through "Day 2 23:00".
pub fn synthetic_series<R: Rng>(rng: &mut R) -> ForecastSeries {
    let mut labels = Vec::with_capacity(SYNTHETIC_POINTS);
    let mut values = Vec::with_capacity(SYNTHETIC_POINTS);
    for i in 0..SYNTHETIC_POINTS {
        let hour = (i % 24) as u32;
        let day = if i < 24 { "Day 1" } else { "Day 2" };
        labels.push(format!("{day} {hour}:00"));
        let noise = rng.gen_range(-10.0..10.0);
        values.push((BASE_LOAD + daytime_peak(hour) + noise).max(0.0));
    }
    ForecastSeries { labels, values }
}

// ── Summary statistics ──

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    pub peak_label: String,
    pub low_label: String,
}

impl SeriesStats {
    /// Max, min, arithmetic mean, and the labels at the first max/min index.
    pub fn compute(series: &ForecastSeries) -> Option<SeriesStats> {
        if series.values.is_empty() || series.labels.len() != series.values.len() {
            return None;
        }
        let mut max_idx = 0;
        let mut min_idx = 0;
        for (i, v) in series.values.iter().enumerate() {
            if *v > series.values[max_idx] {
                max_idx = i;
            }
            if *v < series.values[min_idx] {
                min_idx = i;
            }
        }
        let mean = series.values.iter().sum::<f64>() / series.values.len() as f64;
        Some(SeriesStats {
            max: series.values[max_idx],
            min: series.values[min_idx],
            mean,
            peak_label: series.labels[max_idx].clone(),
            low_label: series.labels[min_idx].clone(),
        })
    }
}

/// Time-of-day token of a chart label: its last whitespace-delimited part
/// ("Day 1 13:00" → "13:00", "6/1 13:00" → "13:00").
pub fn time_of_day(label: &str) -> &str {
    label.split_whitespace().last().unwrap_or(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn parses_document_and_derives_labels() {
        let doc = ForecastDoc::parse(
            r#"{"ds": ["2024-06-01 13:00:00", "2024-06-01 14:00:00"],
                "yhat_corrected": [5.0, 15.0]}"#,
        )
        .unwrap();
        let series = doc.into_series().unwrap();
        assert_eq!(series.labels, vec!["6/1 13:00", "6/1 14:00"]);
        assert_eq!(series.values, vec![5.0, 15.0]);
    }

    #[test]
    fn stats_from_two_point_series() {
        // max 15 at index 1, min 5 at index 0, mean 10
        let series = ForecastSeries {
            labels: vec!["6/1 13:00".into(), "6/1 14:00".into()],
            values: vec![5.0, 15.0],
        };
        let stats = SeriesStats::compute(&series).unwrap();
        assert_eq!(stats.max, 15.0);
        assert_eq!(stats.min, 5.0);
        assert_eq!(stats.mean, 10.0);
        assert_eq!(stats.peak_label, "6/1 14:00");
        assert_eq!(stats.low_label, "6/1 13:00");
        assert_eq!(time_of_day(&stats.peak_label), "14:00");
    }

    #[test]
    fn stats_take_first_occurrence_on_ties() {
        let series = ForecastSeries {
            labels: vec!["a 1:00".into(), "b 2:00".into(), "c 3:00".into()],
            values: vec![7.0, 7.0, 7.0],
        };
        let stats = SeriesStats::compute(&series).unwrap();
        assert_eq!(stats.peak_label, "a 1:00");
        assert_eq!(stats.low_label, "a 1:00");
    }

    #[test]
    fn mismatched_arrays_are_rejected() {
        let doc = ForecastDoc {
            ds: vec!["2024-06-01 13:00:00".into()],
            yhat_corrected: vec![1.0, 2.0],
        };
        assert!(matches!(
            doc.into_series(),
            Err(ForecastError::MismatchedArrays { ds: 1, yhat: 2 })
        ));
    }

    #[test]
    fn empty_document_is_rejected() {
        let doc = ForecastDoc { ds: vec![], yhat_corrected: vec![] };
        assert!(matches!(doc.into_series(), Err(ForecastError::Empty)));
    }

    #[test]
    fn daytime_peak_window() {
        for h in (0..8).chain(21..24) {
            assert_eq!(daytime_peak(h), 0.0, "hour {h} is outside the window");
        }
        // midpoint of the window: sin(pi/2) * 50
        assert!((daytime_peak(14) - 50.0).abs() < 1e-9);
        assert!(daytime_peak(8).abs() < 1e-9);
        // wraps past a single day
        assert_eq!(daytime_peak(24 + 3), 0.0);
        assert!((daytime_peak(24 + 14) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn synthetic_series_shape_and_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let series = synthetic_series(&mut rng);
        assert_eq!(series.values.len(), SYNTHETIC_POINTS);
        assert_eq!(series.labels.len(), SYNTHETIC_POINTS);
        assert_eq!(series.labels[0], "Day 1 0:00");
        assert_eq!(series.labels[23], "Day 1 23:00");
        assert_eq!(series.labels[24], "Day 2 0:00");
        assert_eq!(series.labels[47], "Day 2 23:00");
        for (i, v) in series.values.iter().enumerate() {
            assert!(*v >= 0.0, "point {i} went negative: {v}");
            assert!(*v <= BASE_LOAD + 50.0 + 10.0, "point {i} above ceiling: {v}");
            let hour = (i % 24) as u32;
            if !(8..=20).contains(&hour) {
                // off-peak points are base load plus noise only
                assert!((*v - BASE_LOAD).abs() <= 10.0, "off-peak point {i}: {v}");
            }
        }
    }

    #[test]
    fn unparseable_timestamp_falls_through() {
        assert_eq!(timestamp_label("  Day 1 9:00 "), "Day 1 9:00");
        assert_eq!(timestamp_label("2024-06-01T05:00:00"), "6/1 5:00");
    }
}
