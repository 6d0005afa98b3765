//! Analysis pipeline
//!
//! Single-pass, stateless insight generation over a user's journal
//! history:
//!
//! 1. [`factors`]: entries -> aligned numeric series per tracked factor
//! 2. [`correlation`]: pairwise Pearson coefficients, filtered and ranked
//! 3. [`trend`]: OLS slope per factor, significant drift only
//! 4. [`symptoms`]: body markers grouped by (region, symptom)
//! 5. [`engine`]: synthesis into persisted, confidence-scored insights
//!
//! Data flows one direction; nothing is cached between invocations.

pub mod correlation;
pub mod engine;
pub mod factors;
pub mod symptoms;
pub mod trend;

pub use correlation::{find_correlations, pearson_correlation, FactorPair};
pub use engine::{AnalysisConfig, AnalysisMeta, EngineError, InsightEngine, InsightReport};
pub use factors::{extract_factors, Factor, FactorMap, ALL_FACTORS};
pub use symptoms::{aggregate_symptoms, SymptomGroup};
pub use trend::{detect_trends, regression_slope, TrendDirection, TrendResult};
