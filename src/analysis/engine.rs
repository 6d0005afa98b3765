//! Insight Engine
//!
//! Orchestrates the analysis pipeline: factor extraction, pairwise
//! correlation, trend detection, and symptom aggregation, then synthesizes
//! a bounded set of natural-language insight records and writes them
//! through the store.
//!
//! The engine is stateless between runs; every invocation pulls the user's
//! full history fresh. Concurrent runs for the same user are not serialized
//! here and will each persist their own insights - callers wanting
//! once-only semantics must gate generation themselves.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::analysis::correlation::{find_correlations, FactorPair};
use crate::analysis::factors::extract_factors;
use crate::analysis::symptoms::{aggregate_symptoms, SymptomGroup};
use crate::analysis::trend::{detect_trends, TrendResult};
use crate::store::types::{Direction, Insight, InsightDraft, InsightFactor, InsightStatus, InsightType};
use crate::store::{Store, StoreError};

/// Confidence ceiling for correlation insights
const CORRELATION_CONFIDENCE_CAP: f64 = 0.95;
/// Confidence ceiling for trend insights
const TREND_CONFIDENCE_CAP: f64 = 0.90;
/// Confidence ceiling for symptom insights
const SYMPTOM_CONFIDENCE_CAP: f64 = 0.85;

/// Analysis thresholds and caps
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Minimum journal entries before analysis runs at all
    #[serde(default = "default_min_entries")]
    pub min_entries: usize,

    /// Minimum |r| for a factor pair to be considered interesting
    #[serde(default = "default_correlation_threshold")]
    pub correlation_threshold: f64,

    /// Minimum series length before trend detection applies to a factor
    #[serde(default = "default_trend_min_points")]
    pub trend_min_points: usize,

    /// Minimum |slope| for a trend to be reported
    #[serde(default = "default_trend_threshold")]
    pub trend_threshold: f64,

    /// Correlation insights synthesized per run
    #[serde(default = "default_max_correlation_insights")]
    pub max_correlation_insights: usize,

    /// Trend insights synthesized per run
    #[serde(default = "default_max_trend_insights")]
    pub max_trend_insights: usize,
}

fn default_min_entries() -> usize {
    7
}

fn default_correlation_threshold() -> f64 {
    0.3
}

fn default_trend_min_points() -> usize {
    5
}

fn default_trend_threshold() -> f64 {
    0.05
}

fn default_max_correlation_insights() -> usize {
    3
}

fn default_max_trend_insights() -> usize {
    2
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_entries: default_min_entries(),
            correlation_threshold: default_correlation_threshold(),
            trend_min_points: default_trend_min_points(),
            trend_threshold: default_trend_threshold(),
            max_correlation_insights: default_max_correlation_insights(),
            max_trend_insights: default_max_trend_insights(),
        }
    }
}

/// Errors that can occur during insight generation
#[derive(Debug, Error)]
pub enum EngineError {
    /// Too few entries for meaningful analysis; recoverable by the caller
    #[error("Need at least {need} entries for analysis (have {have})")]
    InsufficientData { have: usize, need: usize },

    /// Store read or write failed; halts synthesis for this run but leaves
    /// already-written insights in place
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Supporting-data payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Pre-cap totals from one analysis run
///
/// Counts reflect everything discovered, not the subset that survived the
/// synthesis caps.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMeta {
    pub entries_analyzed: usize,
    pub correlations_found: usize,
    pub trends_found: usize,
    pub symptoms_tracked: usize,
}

/// Result of one generation run
#[derive(Debug, Clone, Serialize)]
pub struct InsightReport {
    /// Newly persisted insights, in synthesis order
    pub insights: Vec<Insight>,
    pub meta: AnalysisMeta,
}

/// Generates and persists insights from a user's journal history
pub struct InsightEngine {
    store: Arc<dyn Store>,
    config: AnalysisConfig,
}

impl InsightEngine {
    /// Create a new insight engine over the given store
    pub fn new(store: Arc<dyn Store>, config: AnalysisConfig) -> Self {
        Self { store, config }
    }

    /// Run the full analysis pipeline for one user.
    ///
    /// Reads all entries and markers, synthesizes up to
    /// `max_correlation_insights + max_trend_insights + 1` insights, and
    /// persists each one before returning it. Each write is independent;
    /// a failure partway leaves earlier insights persisted (no rollback).
    pub async fn generate_insights(&self, user_id: &str) -> Result<InsightReport, EngineError> {
        let entries = self.store.entries_for_analysis(user_id).await?;
        if entries.len() < self.config.min_entries {
            return Err(EngineError::InsufficientData {
                have: entries.len(),
                need: self.config.min_entries,
            });
        }

        let markers = self.store.markers_for_user(user_id).await?;

        let factors = extract_factors(&entries);
        let correlations = find_correlations(&factors, self.config.correlation_threshold);
        let trends = detect_trends(
            &factors,
            self.config.trend_min_points,
            self.config.trend_threshold,
        );
        let symptom_groups = aggregate_symptoms(&markers);

        tracing::debug!(
            user_id,
            entries = entries.len(),
            correlations = correlations.len(),
            trends = trends.len(),
            symptom_groups = symptom_groups.len(),
            "Analysis pass complete"
        );

        let meta = AnalysisMeta {
            entries_analyzed: entries.len(),
            correlations_found: correlations.len(),
            trends_found: trends.len(),
            symptoms_tracked: symptom_groups.len(),
        };

        let mut insights = Vec::new();

        for pair in correlations.iter().take(self.config.max_correlation_insights) {
            let draft = correlation_draft(user_id, pair)?;
            insights.push(self.store.create_insight(draft).await?);
        }

        // Capped in discovery order, deliberately not re-ranked by magnitude
        for trend in trends.iter().take(self.config.max_trend_insights) {
            let draft = trend_draft(user_id, trend)?;
            insights.push(self.store.create_insight(draft).await?);
        }

        if let Some(top) = symptom_groups.first() {
            let draft = symptom_draft(user_id, top)?;
            insights.push(self.store.create_insight(draft).await?);
        }

        tracing::info!(
            user_id,
            generated = insights.len(),
            entries_analyzed = meta.entries_analyzed,
            "Insight generation complete"
        );

        Ok(InsightReport { insights, meta })
    }
}

/// Synthesize a correlation insight from a top-ranked factor pair
fn correlation_draft(user_id: &str, pair: &FactorPair) -> Result<InsightDraft, EngineError> {
    let name_a = pair.factor_a.display_name();
    let name_b = pair.factor_b.display_name();
    let percent = (pair.strength * 100.0).round() as i64;

    let (title, description) = if pair.direction == Direction::Positive {
        (
            format!("{} and {} move together", name_a, name_b),
            format!(
                "When your {} goes up, your {} tends to go up too. This {}% correlation \
                 suggests these factors are connected for you.",
                name_a.to_lowercase(),
                name_b.to_lowercase(),
                percent
            ),
        )
    } else {
        (
            format!("{} inversely affects {}", name_a, name_b),
            format!(
                "Higher {} tends to correspond with lower {}. This inverse relationship \
                 ({}% strength) is worth monitoring.",
                name_a.to_lowercase(),
                name_b.to_lowercase(),
                percent
            ),
        )
    };

    Ok(InsightDraft {
        user_id: user_id.to_string(),
        insight_type: InsightType::Correlation,
        title,
        description,
        confidence: (pair.strength + 0.10).min(CORRELATION_CONFIDENCE_CAP),
        factors: vec![
            InsightFactor {
                name: name_a.to_string(),
                direction: pair.direction,
                strength: pair.strength,
            },
            InsightFactor {
                name: name_b.to_string(),
                direction: pair.direction,
                strength: pair.strength,
            },
        ],
        supporting_data: serde_json::to_value(pair)?,
        status: InsightStatus::Active,
    })
}

/// Synthesize a trend insight, re-reading direction for inverse factors
/// (declining stress is the healthy direction).
fn trend_draft(user_id: &str, trend: &TrendResult) -> Result<InsightDraft, EngineError> {
    let name = trend.factor.display_name();
    let improving = if trend.factor.is_inverse() {
        trend.slope < 0.0
    } else {
        trend.slope > 0.0
    };

    let (title, description) = if improving {
        (
            format!("{} is trending upward \u{1F4C8}", name),
            format!(
                "Your {} has been gradually improving over your recent entries. \
                 Keep up the positive habits!",
                name.to_lowercase()
            ),
        )
    } else {
        (
            format!("{} needs attention \u{1F4C9}", name),
            format!(
                "Your {} shows a declining trend. Consider reviewing recent lifestyle \
                 changes that may be contributing.",
                name.to_lowercase()
            ),
        )
    };

    Ok(InsightDraft {
        user_id: user_id.to_string(),
        insight_type: InsightType::Trend,
        title,
        description,
        confidence: (trend.slope.abs() * 5.0 + 0.50).min(TREND_CONFIDENCE_CAP),
        factors: vec![InsightFactor {
            name: name.to_string(),
            direction: if improving {
                Direction::Positive
            } else {
                Direction::Negative
            },
            strength: (trend.slope.abs() * 5.0).min(1.0),
        }],
        supporting_data: serde_json::to_value(trend)?,
        status: InsightStatus::Active,
    })
}

/// Synthesize the single symptom insight from the most frequent group
fn symptom_draft(user_id: &str, group: &SymptomGroup) -> Result<InsightDraft, EngineError> {
    let region_name = group.region.replace('_', " ");

    Ok(InsightDraft {
        user_id: user_id.to_string(),
        insight_type: InsightType::Prediction,
        title: format!("Recurring {} in {}", group.symptom, region_name),
        description: format!(
            "You've reported {} in your {} area {} times with an average intensity of \
             {:.1}/10. Consider discussing this pattern with your healthcare provider.",
            group.symptom.to_lowercase(),
            region_name,
            group.count,
            group.avg_intensity
        ),
        confidence: (group.count as f64 * 0.10 + 0.40).min(SYMPTOM_CONFIDENCE_CAP),
        factors: vec![InsightFactor {
            name: format!("{} ({})", group.symptom, region_name),
            direction: Direction::Negative,
            strength: (group.avg_intensity / 10.0).min(1.0),
        }],
        supporting_data: serde_json::to_value(group)?,
        status: InsightStatus::Active,
    })
}
