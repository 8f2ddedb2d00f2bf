//! Projects when the target accuracy will be reached from the per-day
//! accuracy series.
//!
//! The fit is plain ordinary least squares over day indices, used as a
//! cheap explainable trend signal rather than for statistical rigor.
//! The guard rails in front of it (minimum sample, zero variance) keep
//! small noisy samples from producing nonsense.

use chrono::{Duration, NaiveDate};

use crate::types::{DailyAccuracy, Forecast};

/// Minimum distinct study days before any projection is attempted.
const MIN_SAMPLE_DAYS: usize = 3;
/// Slopes at or below this are treated as flat.
const FLAT_SLOPE: f64 = 0.001;
/// Projections further out than this report a warning instead of a date.
const MAX_PROJECTION_DAYS: f64 = 365.0;

const VARIANCE_EPSILON: f64 = 1e-12;

pub fn forecast_goal_date(
    series: &[DailyAccuracy],
    target_rate: f64,
    current_rate: f64,
    today: NaiveDate,
) -> Forecast {
    if series.len() < MIN_SAMPLE_DAYS {
        return Forecast::InsufficientData;
    }

    let values: Vec<f64> = series.iter().map(|d| d.accuracy).collect();
    if variance(&values) < VARIANCE_EPSILON {
        return Forecast::NoChange;
    }

    let (slope, intercept) = fit_line(&values);

    if current_rate >= target_rate {
        return Forecast::Achieved;
    }
    if slope <= FLAT_SLOPE {
        return Forecast::NoImprovement;
    }

    let day_index_needed = (target_rate - intercept) / slope;
    let current_day = (values.len() - 1) as f64;
    let days_remaining = day_index_needed - current_day;

    if days_remaining <= 0.0 {
        Forecast::Imminent
    } else if days_remaining > MAX_PROJECTION_DAYS {
        Forecast::FarFuture
    } else {
        Forecast::Date(today + Duration::days(days_remaining.floor() as i64))
    }
}

/// Least-squares slope and intercept over indices 0..n-1.
fn fit_line(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let sum_x: f64 = (0..values.len()).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
    let sum_xx: f64 = (0..values.len()).map(|i| (i as f64).powi(2)).sum();

    let denominator = n * sum_xx - sum_x.powi(2);
    if denominator.abs() < 1e-10 {
        return (0.0, mean(values));
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    (slope, intercept)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}
