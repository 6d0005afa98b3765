//! Per-factor trend detection
//!
//! Fits an ordinary-least-squares line to each factor series (value against
//! entry index) and flags factors with material drift.

use serde::Serialize;

use crate::analysis::factors::{FactorMap, ALL_FACTORS, Factor};

/// Direction labels for a trend slope.
///
/// These are raw numeric labels: rising is `improving`, falling is
/// `declining`. The synthesizer re-reads them for inverse factors, where
/// a declining slope is the healthy direction.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Declining,
}

/// A factor with a significant drift over the analyzed entries
#[derive(Debug, Clone, Serialize)]
pub struct TrendResult {
    pub factor: Factor,
    /// OLS slope of value against 0-based entry index
    pub slope: f64,
    pub direction: TrendDirection,
}

/// Slope of the least-squares regression line of `values` against index.
///
/// slope = Σ((i - x̄)(yᵢ - ȳ)) / Σ((i - x̄)²), x̄ = (n-1)/2.
/// A zero denominator (n <= 1) yields 0.
pub fn regression_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }

    let x_mean = (n as f64 - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n as f64;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Minimum points before a trend is considered at all
pub const MIN_TREND_POINTS: usize = 5;

/// Find factors drifting beyond the slope threshold.
///
/// Factors with fewer than `min_points` values are skipped regardless of
/// slope. Results come out in factor declaration order, not ranked by
/// magnitude; the synthesizer caps in this discovery order, so a stronger
/// later trend can lose its slot to a weaker earlier one. That matches the
/// observed product behavior and is covered by a test rather than fixed.
pub fn detect_trends(factors: &FactorMap, min_points: usize, threshold: f64) -> Vec<TrendResult> {
    let mut trends = Vec::new();

    for factor in ALL_FACTORS {
        let Some(values) = factors.get(&factor) else {
            continue;
        };
        if values.len() < min_points {
            continue;
        }

        let slope = regression_slope(values);
        if slope.abs() > threshold {
            trends.push(TrendResult {
                factor,
                slope,
                direction: if slope > 0.0 {
                    TrendDirection::Improving
                } else {
                    TrendDirection::Declining
                },
            });
        }
    }

    trends
}
