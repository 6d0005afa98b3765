//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisMeta;
use crate::store::types::{BodyMarker, Insight, InsightStatus, JournalEntry};

// ============================================
// ENTRY DTOs
// ============================================

/// Create-entry request: one day of journal data plus optional body markers
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub user_id: String,
    /// Calendar date, "YYYY-MM-DD"
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
    /// Body-map markers recorded with this entry
    #[serde(default)]
    pub markers: Vec<MarkerInput>,
}

/// One body-map marker in a create-entry request
#[derive(Debug, Deserialize)]
pub struct MarkerInput {
    pub body_region: String,
    /// Normalized position, 0-100
    pub x_pos: f64,
    /// Normalized position, 0-100
    pub y_pos: f64,
    pub symptom: String,
    /// Severity, 1-10
    pub intensity: i32,
}

/// Create-entry response
#[derive(Debug, Serialize)]
pub struct CreateEntryResponse {
    pub entry: JournalEntry,
    pub markers: Vec<BodyMarker>,
}

/// Single-entry detail response: the entry with its body markers
#[derive(Debug, Serialize)]
pub struct EntryDetailResponse {
    pub entry: JournalEntry,
    pub markers: Vec<BodyMarker>,
}

/// Entry deletion response
#[derive(Debug, Serialize)]
pub struct DeleteEntryResponse {
    pub success: bool,
}

/// Query parameters for listing entries
#[derive(Debug, Deserialize)]
pub struct EntriesQuery {
    pub user_id: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Entry list response
#[derive(Debug, Serialize)]
pub struct EntriesResponse {
    pub entries: Vec<JournalEntry>,
    pub count: usize,
}

// ============================================
// INSIGHT DTOs
// ============================================

/// Query parameters identifying the user
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

/// Response from insight generation
#[derive(Debug, Serialize)]
pub struct GenerateInsightsResponse {
    pub insights: Vec<Insight>,
    pub meta: AnalysisMeta,
}

/// Active insight list response
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: Vec<Insight>,
}

/// Insight feedback request
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    /// Did the user find this insight helpful?
    pub helpful: bool,
}

/// Insight feedback response
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub success: bool,
    /// Status after applying the feedback
    pub status: InsightStatus,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub storage: String,
    pub uptime_seconds: u64,
    pub version: String,
}
