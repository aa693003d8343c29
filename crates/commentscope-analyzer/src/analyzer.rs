//! Per-comment analysis
//!
//! Runs the detector groups concurrently, joins their results and hands
//! them to the recommendation engine.

use crate::analytics::{self, LocationAnalytics, LocationInsights, ScoredComment};
use crate::context::AnalysisContext;
use crate::metrics::{FallbackKind, MetricsSnapshot};
use commentscope_classifiers::{CacheStats, CategorySource};
use commentscope_core::{
    Aspect, Category, Error, LocationInfo, Recommendation, Region, Result, SentimentResult,
};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Learned and lexicon results side by side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentPair {
    pub learned: SentimentResult,
    pub lexicon: SentimentResult,
}

/// Full result for one comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentAnalysis {
    pub input_text: String,
    pub category: Category,
    pub category_source: CategorySource,
    pub aspects: Vec<Aspect>,
    pub location: LocationInfo,
    pub sentiment: SentimentPair,
    pub recommendation: Recommendation,
}

/// Comment analyzer over a shared context
#[derive(Clone)]
pub struct Analyzer {
    context: Arc<AnalysisContext>,
}

impl Analyzer {
    pub fn new(context: Arc<AnalysisContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AnalysisContext {
        &self.context
    }

    /// Analyze one comment. Blank text is rejected; every other input
    /// produces a complete analysis.
    pub async fn analyze(&self, text: &str) -> Result<CommentAnalysis> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::invalid_input("Text cannot be empty"));
        }

        let start = Instant::now();
        let ctx = &self.context;

        let ((learned, lexicon), aspects, location, prediction) = tokio::join!(
            async { tokio::join!(ctx.learned().classify(text), async { ctx.lexicon().score(text) }) },
            async { ctx.aspects().tag(text) },
            async { ctx.locations().resolve(text) },
            async { ctx.intent().classify(text) },
        );

        if prediction.source == CategorySource::Fallback {
            ctx.metrics().record_fallback(FallbackKind::Intent);
        }
        if learned.is_degraded() {
            ctx.metrics().record_fallback(FallbackKind::LearnedSentiment);
        }

        let recommendation =
            ctx.engine()
                .recommend(prediction.category, &aspects, &location, &learned, &lexicon);

        let latency_us = start.elapsed().as_micros() as u64;
        ctx.metrics().record_analysis(latency_us);
        debug!(
            category = %prediction.category,
            source = ?prediction.source,
            aspects = aspects.len(),
            has_location = location.has_location,
            latency_us,
            "Comment analyzed"
        );

        Ok(CommentAnalysis {
            input_text: text.to_string(),
            category: prediction.category,
            category_source: prediction.source,
            aspects,
            location,
            sentiment: SentimentPair { learned, lexicon },
            recommendation,
        })
    }

    /// Analyze many comments with bounded concurrency. Results keep input order.
    pub async fn analyze_batch<I, S>(&self, texts: I) -> Vec<Result<CommentAnalysis>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let concurrency = self.context.config().batch_concurrency.max(1);
        stream::iter(texts)
            .map(|text| async move { self.analyze(text.as_ref()).await })
            .buffered(concurrency)
            .collect()
            .await
    }

    /// Location analytics over the loaded dataset.
    ///
    /// Uses the learned label per comment, or the lexicon label when the
    /// learned result is degraded.
    pub async fn location_analytics(&self) -> LocationAnalytics {
        let ctx = &self.context;
        let concurrency = ctx.config().batch_concurrency.max(1);

        let located = ctx.dataset().iter().filter_map(|example| {
            example
                .location
                .as_deref()
                .map(|location| (example, location.to_string()))
        });

        let comments: Vec<ScoredComment> = stream::iter(located)
            .map(|(example, location)| async move {
                let learned = ctx.learned().classify(&example.text).await;
                let sentiment = if learned.is_degraded() {
                    ctx.lexicon().score(&example.text).label
                } else {
                    learned.label
                };
                ScoredComment {
                    text: example.text.clone(),
                    category: example.category,
                    location,
                    sentiment,
                }
            })
            .buffered(concurrency)
            .collect()
            .await;

        debug!(comments = comments.len(), "Computing location analytics");
        LocationAnalytics::from_comments(&comments)
    }

    /// Dataset insights for the locations a comment names. `Ok(None)` when
    /// the comment names no location.
    pub async fn location_insights(&self, text: &str) -> Result<Option<LocationInsights>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::invalid_input("Text cannot be empty"));
        }

        let location = self.context.locations().resolve(text);
        if !location.has_location {
            return Ok(None);
        }
        let analytics = self.location_analytics().await;
        Ok(analytics::location_insights(&location, &analytics))
    }

    /// Which models loaded and how the caches are doing
    pub fn health(&self) -> HealthReport {
        let ctx = &self.context;
        HealthReport {
            status: "healthy".to_string(),
            models: ModelHealth {
                learned_loaded: ctx.learned().is_available(),
                learned_model: ctx.learned().model_name().map(str::to_string),
                lexicon_loaded: true,
                intent_model_loaded: ctx.intent().has_model(),
                intent_classes: ctx.intent().classes().to_vec(),
                dataset_loaded: !ctx.dataset().is_empty(),
                dataset_records: ctx.dataset().len(),
            },
            features: FeatureHealth {
                location_detection: format!(
                    "{} cities, {} states",
                    ctx.locations().city_count(),
                    ctx.locations().state_count()
                ),
                regional_analysis: format!("{} regions", Region::ALL.len()),
                recommendation_rules: ctx.engine().rules().len(),
            },
            caches: CacheHealth {
                learned: ctx.learned().cache_stats(),
                aspects: ctx.aspects().cache_stats(),
                locations: ctx.locations().cache_stats(),
            },
            metrics: ctx.metrics().snapshot(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub models: ModelHealth,
    pub features: FeatureHealth,
    pub caches: CacheHealth,
    pub metrics: MetricsSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelHealth {
    pub learned_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learned_model: Option<String>,
    pub lexicon_loaded: bool,
    pub intent_model_loaded: bool,
    pub intent_classes: Vec<Category>,
    pub dataset_loaded: bool,
    pub dataset_records: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureHealth {
    pub location_detection: String,
    pub regional_analysis: String,
    pub recommendation_rules: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheHealth {
    pub learned: CacheStats,
    pub aspects: CacheStats,
    pub locations: CacheStats,
}
