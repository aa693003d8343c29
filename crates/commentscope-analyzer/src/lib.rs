//! CommentScope Analyzer
//!
//! Ties the detectors and the recommendation engine into a single
//! per-comment analysis, and reports on labeled datasets:
//! - Analysis context built once at startup from configuration
//! - Concurrent per-comment analysis with degraded-path metrics
//! - Dataset loading (JSON, JSON lines, YAML) with a seed fallback
//! - City and regional location analytics

pub mod analytics;
pub mod analyzer;
pub mod context;
pub mod dataset;
pub mod metrics;

pub use analytics::{
    city_trends, location_insights, regional_performance, CityAnalytics, CityTrends,
    LocationAnalytics, LocationInsights, RegionalPerformanceReport, ScoredComment,
};
pub use analyzer::{Analyzer, CommentAnalysis, HealthReport, SentimentPair};
pub use context::{AnalysisConfig, AnalysisContext};
pub use dataset::{load_dataset, seed_dataset};
pub use crate::metrics::{AnalysisMetrics, FallbackKind, MetricsSnapshot};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::analyzer::{Analyzer, CommentAnalysis};
    pub use crate::context::{AnalysisConfig, AnalysisContext};
    pub use crate::metrics::AnalysisMetrics;
}
