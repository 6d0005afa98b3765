//! Journal Entry Routes
//!
//! - POST   /api/v1/entries - Create a day's entry (with optional markers)
//! - GET    /api/v1/entries - List a user's recent entries
//! - GET    /api/v1/entries/:id - One entry with its markers
//! - DELETE /api/v1/entries/:id - Delete an entry and its markers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{
    CreateEntryRequest, CreateEntryResponse, DeleteEntryResponse, EntriesQuery, EntriesResponse,
    EntryDetailResponse, UserQuery,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::store::types::{EntryDraft, MarkerDraft};

const DEFAULT_LIST_LIMIT: usize = 10;
const MAX_LIST_LIMIT: usize = 100;

fn check_scale(value: Option<i32>, name: &str) -> Result<(), ApiError> {
    if let Some(v) = value {
        if !(1..=5).contains(&v) {
            return Err(ApiError::Validation(format!("{} must be 1-5", name)));
        }
    }
    Ok(())
}

fn validate(req: &CreateEntryRequest) -> Result<(), ApiError> {
    if req.user_id.trim().is_empty() {
        return Err(ApiError::Validation("user_id is required".to_string()));
    }
    if let Some(hours) = req.sleep_hours {
        if !(0.0..=24.0).contains(&hours) {
            return Err(ApiError::Validation(
                "sleep_hours must be between 0 and 24".to_string(),
            ));
        }
    }
    check_scale(req.sleep_quality, "sleep_quality")?;
    check_scale(req.stress_level, "stress_level")?;
    check_scale(req.energy_level, "energy_level")?;
    check_scale(req.mood_score, "mood_score")?;
    if req.exercise_mins.is_some_and(|m| m < 0) {
        return Err(ApiError::Validation(
            "exercise_mins must be non-negative".to_string(),
        ));
    }
    if req.water_intake_ml.is_some_and(|ml| ml < 0) {
        return Err(ApiError::Validation(
            "water_intake_ml must be non-negative".to_string(),
        ));
    }

    for marker in &req.markers {
        if marker.body_region.trim().is_empty() || marker.symptom.trim().is_empty() {
            return Err(ApiError::Validation(
                "marker body_region and symptom are required".to_string(),
            ));
        }
        if !(1..=10).contains(&marker.intensity) {
            return Err(ApiError::Validation(
                "marker intensity must be 1-10".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&marker.x_pos) || !(0.0..=100.0).contains(&marker.y_pos) {
            return Err(ApiError::Validation(
                "marker position must be 0-100 on each axis".to_string(),
            ));
        }
    }

    Ok(())
}

/// POST /api/v1/entries
///
/// Create a journal entry for one (user, date) together with any body-map
/// markers recorded that day. Rejects a second entry for the same date
/// with 409.
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateEntryRequest>,
) -> ApiResult<(StatusCode, Json<CreateEntryResponse>)> {
    validate(&req)?;

    let draft = EntryDraft {
        user_id: req.user_id.clone(),
        entry_date: req.entry_date,
        sleep_hours: req.sleep_hours,
        sleep_quality: req.sleep_quality,
        stress_level: req.stress_level,
        energy_level: req.energy_level,
        mood_score: req.mood_score,
        exercise_mins: req.exercise_mins,
        exercise_type: req.exercise_type,
        water_intake_ml: req.water_intake_ml,
        notes: req.notes,
    };
    let entry = state.store.create_entry(draft).await?;

    let mut markers = Vec::with_capacity(req.markers.len());
    for input in req.markers {
        let marker = state
            .store
            .create_marker(MarkerDraft {
                entry_id: entry.id.clone(),
                user_id: req.user_id.clone(),
                body_region: input.body_region,
                x_pos: input.x_pos,
                y_pos: input.y_pos,
                symptom: input.symptom,
                intensity: input.intensity,
            })
            .await?;
        markers.push(marker);
    }

    tracing::debug!(
        user_id = %entry.user_id,
        entry_date = %entry.entry_date,
        markers = markers.len(),
        "Journal entry created"
    );

    Ok((StatusCode::CREATED, Json(CreateEntryResponse { entry, markers })))
}

/// GET /api/v1/entries/:id?user_id=...
///
/// One entry with the body markers recorded alongside it. 404 if the id
/// does not exist or belongs to another user.
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<EntryDetailResponse>> {
    if query.user_id.trim().is_empty() {
        return Err(ApiError::Validation("user_id is required".to_string()));
    }

    let entry = state.store.entry_by_id(&id, &query.user_id).await?;
    let markers = state.store.markers_for_entry(&entry.id).await?;

    Ok(Json(EntryDetailResponse { entry, markers }))
}

/// DELETE /api/v1/entries/:id?user_id=...
///
/// Delete an entry and its markers, freeing the (user, date) slot so the
/// day can be re-logged. 404 if the id does not exist or belongs to
/// another user.
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<DeleteEntryResponse>> {
    if query.user_id.trim().is_empty() {
        return Err(ApiError::Validation("user_id is required".to_string()));
    }

    state.store.delete_entry(&id, &query.user_id).await?;
    tracing::debug!(entry_id = %id, user_id = %query.user_id, "Journal entry deleted");

    Ok(Json(DeleteEntryResponse { success: true }))
}

/// GET /api/v1/entries?user_id=...&limit=...
///
/// List a user's most recent entries, newest first.
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EntriesQuery>,
) -> ApiResult<Json<EntriesResponse>> {
    if query.user_id.trim().is_empty() {
        return Err(ApiError::Validation("user_id is required".to_string()));
    }

    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT);
    let entries = state.store.recent_entries(&query.user_id, limit).await?;
    let count = entries.len();

    Ok(Json(EntriesResponse { entries, count }))
}
