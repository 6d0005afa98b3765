//! # Meridian
//!
//! Personal health journaling backend: daily wellness entries, body-map
//! symptom markers, and a correlation-based insight engine.
//!
//! ## Features
//!
//! - **Journal storage**: one entry per (user, date) with optional metrics
//! - **Body map**: symptom markers with normalized positions and intensity
//! - **Insight engine**: Pearson correlations, OLS trends, and symptom
//!   aggregation synthesized into ranked, confidence-scored insights
//! - **Pluggable storage**: SQLite or in-memory behind one trait
//! - **REST API**: Axum server with health probes and feedback endpoints
//!
//! Insights surface associative signals only; they are explicitly
//! non-diagnostic.
//!
//! ## Modules
//!
//! - [`store`]: Persistence layer (`Store` trait, SQLite and memory backends)
//! - [`analysis`]: The insight-generation pipeline
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use meridian::analysis::{AnalysisConfig, InsightEngine};
//! use meridian::store::{EntryDraft, MemoryStore, Store};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new());
//!
//!     // Log a week of entries
//!     for day in 1..=7 {
//!         let date = chrono::NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
//!         store
//!             .create_entry(EntryDraft::new("user-1", date).sleep_hours(6.0 + day as f64 * 0.25))
//!             .await?;
//!     }
//!
//!     // Generate insights
//!     let engine = InsightEngine::new(store, AnalysisConfig::default());
//!     let report = engine.generate_insights("user-1").await?;
//!
//!     println!("Generated {} insights", report.insights.len());
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod store;

// Re-export top-level types for convenience
pub use store::{
    BodyMarker, Direction, EntryDraft, Insight, InsightDraft, InsightFactor, InsightStatus,
    InsightType, JournalEntry, MarkerDraft, MemoryStore, SqliteStore, Store, StoreError,
    StoreResult,
};

pub use analysis::{
    AnalysisConfig, AnalysisMeta, EngineError, Factor, FactorMap, FactorPair, InsightEngine,
    InsightReport, SymptomGroup, TrendDirection, TrendResult, ALL_FACTORS,
};

pub use api::{build_router, serve, ApiError, ApiResult, AppState};

pub use config::{Config, ConfigError, LoggingConfig};
