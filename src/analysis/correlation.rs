//! Pairwise correlation analysis
//!
//! Computes the Pearson coefficient for every unordered pair of factor
//! series, keeps the statistically interesting pairs, and ranks them by
//! strength.

use serde::Serialize;

use crate::analysis::factors::{FactorMap, ALL_FACTORS, Factor};
use crate::store::types::Direction;

/// A correlated pair of factors
#[derive(Debug, Clone, Serialize)]
pub struct FactorPair {
    pub factor_a: Factor,
    pub factor_b: Factor,
    /// Pearson coefficient in [-1, 1]
    pub correlation: f64,
    pub direction: Direction,
    /// Absolute value of the coefficient
    pub strength: f64,
}

/// Calculate the Pearson correlation coefficient between two series.
///
/// Returns a value between -1 and 1:
/// - 1: perfect positive correlation
/// - 0: no correlation
/// - -1: perfect negative correlation
///
/// Degenerate inputs are defined, not errors: fewer than 3 points or zero
/// variance in either series yields 0, which the strength threshold then
/// filters out.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 3 {
        return 0.0;
    }

    let n = x.len() as f64;

    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y.iter()).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|b| b * b).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x.powi(2)) * (n * sum_y2 - sum_y.powi(2))).sqrt();

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Find all factor pairs correlated at or above the threshold.
///
/// Pairs are returned sorted by descending strength. Equal strengths keep
/// discovery order (the fixed factor declaration order) because the sort is
/// stable. A coefficient of exactly zero never clears the threshold, so the
/// neutral direction is never emitted here.
pub fn find_correlations(factors: &FactorMap, threshold: f64) -> Vec<FactorPair> {
    let mut pairs = Vec::new();

    for i in 0..ALL_FACTORS.len() {
        for j in (i + 1)..ALL_FACTORS.len() {
            let factor_a = ALL_FACTORS[i];
            let factor_b = ALL_FACTORS[j];

            let (Some(series_a), Some(series_b)) =
                (factors.get(&factor_a), factors.get(&factor_b))
            else {
                continue;
            };

            let r = pearson_correlation(series_a, series_b);
            if r.abs() >= threshold && !r.is_nan() {
                pairs.push(FactorPair {
                    factor_a,
                    factor_b,
                    correlation: r,
                    direction: if r > 0.0 {
                        Direction::Positive
                    } else {
                        Direction::Negative
                    },
                    strength: r.abs(),
                });
            }
        }
    }

    pairs.sort_by(|a, b| {
        b.strength
            .partial_cmp(&a.strength)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    pairs
}
