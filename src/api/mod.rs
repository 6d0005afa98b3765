//! Meridian REST API
//!
//! HTTP API layer for Meridian, built with Axum.
//!
//! # Endpoints
//!
//! ## Journal
//! - `POST /api/v1/entries` - Create a day's entry (with optional markers)
//! - `GET /api/v1/entries` - List recent entries
//! - `GET /api/v1/entries/:id` - One entry with its markers
//! - `DELETE /api/v1/entries/:id` - Delete an entry and its markers
//!
//! ## Insights
//! - `POST /api/v1/insights/generate` - Run the analysis pipeline
//! - `GET /api/v1/insights` - List active insights
//! - `POST /api/v1/insights/:id/feedback` - Record helpful/not-helpful
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! Authentication is a fronting concern; handlers identify the user by an
//! explicit `user_id` parameter.

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Journal routes
        .route(
            "/entries",
            post(routes::entries::create_entry).get(routes::entries::list_entries),
        )
        .route(
            "/entries/:id",
            get(routes::entries::get_entry).delete(routes::entries::delete_entry),
        )
        // Insight routes
        .route(
            "/insights/generate",
            post(routes::insights::generate_insights),
        )
        .route("/insights", get(routes::insights::list_insights))
        .route(
            "/insights/:id/feedback",
            post(routes::insights::insight_feedback),
        );

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()) // Configure properly in production
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Meridian API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Meridian API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisConfig;
    use crate::store::types::EntryDraft;
    use crate::store::{MemoryStore, Store};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::NaiveDate;
    use tower::util::ServiceExt;

    fn create_test_app() -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), AnalysisConfig::default());
        (build_router(state), store)
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let (app, _) = create_test_app();

        for uri in ["/health/live", "/health/ready", "/health"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_create_entry_with_markers() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/entries")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        r#"{
                            "user_id": "u1",
                            "entry_date": "2024-03-01",
                            "sleep_hours": 7.5,
                            "mood_score": 4,
                            "markers": [
                                {"body_region": "head", "x_pos": 48.0, "y_pos": 9.0,
                                 "symptom": "Throbbing", "intensity": 6}
                            ]
                        }"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["entry"]["user_id"], "u1");
        assert_eq!(json["markers"][0]["symptom"], "Throbbing");
    }

    #[tokio::test]
    async fn test_duplicate_entry_conflict() {
        let (app, store) = create_test_app();
        store
            .create_entry(EntryDraft::new("u1", date(1)))
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/entries")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        r#"{"user_id": "u1", "entry_date": "2024-03-01"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_get_entry_detail_scoped_to_owner() {
        let (app, store) = create_test_app();
        let entry = store
            .create_entry(EntryDraft::new("u1", date(1)).sleep_hours(7.0))
            .await
            .unwrap();
        store
            .create_marker(crate::store::MarkerDraft {
                entry_id: entry.id.clone(),
                user_id: "u1".to_string(),
                body_region: "head".to_string(),
                x_pos: 48.0,
                y_pos: 9.0,
                symptom: "Throbbing".to_string(),
                intensity: 6,
            })
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/entries/{}?user_id=u1", entry.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["entry"]["id"], entry.id);
        assert_eq!(json["markers"][0]["symptom"], "Throbbing");

        // Another user's id never resolves
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/entries/{}?user_id=u2", entry.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_entry_frees_the_date() {
        let (app, store) = create_test_app();
        let entry = store
            .create_entry(EntryDraft::new("u1", date(1)))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/entries/{}?user_id=u1", entry.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);

        // Re-logging the same date is no longer a conflict
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/entries")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        r#"{"user_id": "u1", "entry_date": "2024-03-01"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_invalid_mood_rejected() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/entries")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        r#"{"user_id": "u1", "entry_date": "2024-03-01", "mood_score": 11}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_requires_enough_entries() {
        let (app, store) = create_test_app();
        for day in 1..=6 {
            store
                .create_entry(EntryDraft::new("u1", date(day)).sleep_hours(7.0))
                .await
                .unwrap();
        }

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/insights/generate?user_id=u1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INSUFFICIENT_DATA");
    }

    #[tokio::test]
    async fn test_generate_then_list_and_dismiss() {
        let (app, store) = create_test_app();
        for day in 0..7u32 {
            store
                .create_entry(
                    EntryDraft::new("u1", date(day + 1))
                        .sleep_hours(5.0 + day as f64 * 0.5)
                        .exercise_mins(10 + day as i32 * 10),
                )
                .await
                .unwrap();
        }

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/insights/generate?user_id=u1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["meta"]["entries_analyzed"], 7);
        let first_id = json["insights"][0]["id"].as_str().unwrap().to_string();

        // Listed while active
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/insights?user_id=u1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        let before = json["insights"].as_array().unwrap().len();
        assert!(before >= 1);

        // Negative feedback dismisses it
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/insights/{}/feedback", first_id))
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"helpful": false}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "dismissed");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/insights?user_id=u1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["insights"].as_array().unwrap().len(), before - 1);
    }

    #[tokio::test]
    async fn test_feedback_on_missing_insight_is_404_either_way() {
        let (app, _) = create_test_app();

        for body in [r#"{"helpful": false}"#, r#"{"helpful": true}"#] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/api/v1/insights/nope/feedback")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{body}");
        }
    }

    #[tokio::test]
    async fn test_positive_feedback_leaves_insight_active() {
        let (app, store) = create_test_app();
        for day in 0..7u32 {
            store
                .create_entry(EntryDraft::new("u1", date(day + 1)).sleep_hours(5.0 + day as f64 * 0.5))
                .await
                .unwrap();
        }

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/insights/generate?user_id=u1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        let id = json["insights"][0]["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/insights/{}/feedback", id))
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"helpful": true}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "active");

        // Still listed
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/insights?user_id=u1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert!(json["insights"]
            .as_array()
            .unwrap()
            .iter()
            .any(|i| i["id"] == id.as_str()));
    }
}
