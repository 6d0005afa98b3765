//! Core domain types for the Meridian journaling store
//!
//! This module defines the entities persisted by the store:
//! - `JournalEntry`: one day of self-reported wellness data
//! - `BodyMarker`: a symptom pinned to a body-map location
//! - `Insight`: a synthesized observation about the user's data
//!
//! Draft types (`EntryDraft`, `MarkerDraft`, `InsightDraft`) carry the
//! caller-supplied fields; the store assigns ids and timestamps.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One journal entry: a single user's self-reported metrics for one date.
///
/// All tracked fields are optional; the analysis layer substitutes neutral
/// defaults for absent values. At most one entry exists per (user, date).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalEntry {
    pub id: String,
    pub user_id: String,
    /// Calendar date this entry describes (unique per user)
    pub entry_date: NaiveDate,
    /// Hours slept (fractional allowed)
    pub sleep_hours: Option<f64>,
    /// Subjective sleep quality, 1-5
    pub sleep_quality: Option<i32>,
    /// Stress level, 1-5
    pub stress_level: Option<i32>,
    /// Energy level, 1-5
    pub energy_level: Option<i32>,
    /// Mood score, 1-5
    pub mood_score: Option<i32>,
    /// Minutes of exercise
    pub exercise_mins: Option<i32>,
    /// Free-text exercise description ("run", "yoga", ...)
    pub exercise_type: Option<String>,
    /// Water intake in millilitres
    pub water_intake_ml: Option<i32>,
    /// Free-text notes
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new journal entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryDraft {
    pub user_id: String,
    pub entry_date: NaiveDate,
    #[serde(default)]
    pub sleep_hours: Option<f64>,
    #[serde(default)]
    pub sleep_quality: Option<i32>,
    #[serde(default)]
    pub stress_level: Option<i32>,
    #[serde(default)]
    pub energy_level: Option<i32>,
    #[serde(default)]
    pub mood_score: Option<i32>,
    #[serde(default)]
    pub exercise_mins: Option<i32>,
    #[serde(default)]
    pub exercise_type: Option<String>,
    #[serde(default)]
    pub water_intake_ml: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl EntryDraft {
    /// Create a draft with only the required fields set
    pub fn new(user_id: impl Into<String>, entry_date: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            entry_date,
            ..Default::default()
        }
    }

    /// Builder method: hours slept
    pub fn sleep_hours(mut self, hours: f64) -> Self {
        self.sleep_hours = Some(hours);
        self
    }

    /// Builder method: sleep quality (1-5)
    pub fn sleep_quality(mut self, quality: i32) -> Self {
        self.sleep_quality = Some(quality);
        self
    }

    /// Builder method: stress level (1-5)
    pub fn stress(mut self, level: i32) -> Self {
        self.stress_level = Some(level);
        self
    }

    /// Builder method: energy level (1-5)
    pub fn energy(mut self, level: i32) -> Self {
        self.energy_level = Some(level);
        self
    }

    /// Builder method: mood score (1-5)
    pub fn mood(mut self, score: i32) -> Self {
        self.mood_score = Some(score);
        self
    }

    /// Builder method: exercise minutes
    pub fn exercise_mins(mut self, mins: i32) -> Self {
        self.exercise_mins = Some(mins);
        self
    }

    /// Builder method: water intake (ml)
    pub fn water_ml(mut self, ml: i32) -> Self {
        self.water_intake_ml = Some(ml);
        self
    }
}

/// A symptom marker placed on the body map
///
/// Position is normalized to 0-100 on each axis so the client rendering
/// size does not matter. Intensity is a 1-10 integer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BodyMarker {
    pub id: String,
    /// Entry this marker was recorded with
    pub entry_id: String,
    pub user_id: String,
    /// Coarse body region ("head", "lower_back", ...)
    pub body_region: String,
    pub x_pos: f64,
    pub y_pos: f64,
    /// Symptom label ("Throbbing", "Ache", ...)
    pub symptom: String,
    /// Severity, 1-10
    pub intensity: i32,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new body marker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerDraft {
    pub entry_id: String,
    pub user_id: String,
    pub body_region: String,
    pub x_pos: f64,
    pub y_pos: f64,
    pub symptom: String,
    pub intensity: i32,
}

/// Kind of pattern an insight describes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    /// Two factors moving together (or inversely)
    Correlation,
    /// A single factor drifting over time
    Trend,
    /// A recurring symptom pattern worth watching
    Prediction,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::Correlation => "correlation",
            InsightType::Trend => "trend",
            InsightType::Prediction => "prediction",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "correlation" => Some(InsightType::Correlation),
            "trend" => Some(InsightType::Trend),
            "prediction" => Some(InsightType::Prediction),
            _ => None,
        }
    }
}

impl std::fmt::Display for InsightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of an insight
///
/// Insights start `active`. Negative feedback transitions them to
/// `dismissed`, with no way back. `confirmed` exists in the model for
/// positive feedback but no transition currently produces it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsightStatus {
    Active,
    Dismissed,
    Confirmed,
}

impl InsightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightStatus::Active => "active",
            InsightStatus::Dismissed => "dismissed",
            InsightStatus::Confirmed => "confirmed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(InsightStatus::Active),
            "dismissed" => Some(InsightStatus::Dismissed),
            "confirmed" => Some(InsightStatus::Confirmed),
            _ => None,
        }
    }
}

impl std::fmt::Display for InsightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a detected relationship
///
/// `Neutral` is representable for persisted insights, but correlation
/// analysis never emits it: a zero coefficient cannot clear the strength
/// threshold, so every surviving pair is strictly positive or negative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Positive,
    Negative,
    Neutral,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Positive => "positive",
            Direction::Negative => "negative",
            Direction::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A factor's contribution to an insight
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightFactor {
    /// Human-readable factor name ("Sleep Duration")
    pub name: String,
    pub direction: Direction,
    /// Contribution strength in [0, 1]
    pub strength: f64,
}

/// A persisted, synthesized observation about the user's data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insight {
    pub id: String,
    pub user_id: String,
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    /// Confidence score in [0, 1]
    pub confidence: f64,
    /// Contributing factors, for display
    pub factors: Vec<InsightFactor>,
    /// Originating analysis record (factor pair, trend, or symptom group),
    /// kept opaque for audit and debugging
    pub supporting_data: serde_json::Value,
    pub status: InsightStatus,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new insight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightDraft {
    pub user_id: String,
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    pub confidence: f64,
    pub factors: Vec<InsightFactor>,
    pub supporting_data: serde_json::Value,
    pub status: InsightStatus,
}
