//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::analysis::{AnalysisConfig, InsightEngine};
use crate::store::Store;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Store for entries, markers, and insights
    pub store: Arc<dyn Store>,
    /// Insight generation engine (stateless; shares the store)
    pub engine: Arc<InsightEngine>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create application state over a store
    pub fn new(store: Arc<dyn Store>, analysis: AnalysisConfig) -> Self {
        let engine = Arc::new(InsightEngine::new(Arc::clone(&store), analysis));
        Self {
            store,
            engine,
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
