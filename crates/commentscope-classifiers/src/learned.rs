//! Learned sentiment classifier (Tier C)
//!
//! Wraps a pretrained text-classification model behind [`SentimentModel`] and
//! maps whatever label vocabulary it emits onto positive / negative / neutral.
//! When no model could be loaded, or inference fails or times out, every call
//! returns the neutral sentinel with an `error` diagnostic instead of failing.

use crate::cache::{CacheStats, DetectionCache};
use crate::classifier::{Detector, DetectorTier};
use crate::config::LearnedModelConfig;
use commentscope_core::{Result, SentimentLabel, SentimentResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Diagnostic used when no model is loaded
pub const MODEL_UNAVAILABLE: &str = "sentiment model not available";

/// A raw model prediction, before label normalization
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentPrediction {
    /// Label exactly as emitted by the model (e.g. "LABEL_2", "POSITIVE")
    pub label: String,

    /// Probability of that label
    pub score: f64,
}

/// Why a learned prediction could not be produced
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FailureReason {
    #[error("sentiment model not available")]
    Unavailable,

    #[error("sentiment inference failed: {0}")]
    Inference(String),

    #[error("sentiment inference timed out after {0:?}")]
    Timeout(Duration),
}

/// A synchronous sentiment model. Implementations are CPU-bound and are
/// driven from the blocking pool.
pub trait SentimentModel: Send + Sync {
    /// Predict the most likely label for the text
    fn predict(&self, text: &str) -> Result<SentimentPrediction>;

    /// Model identifier for logs and health output
    fn name(&self) -> &str;
}

/// Map a model label onto the three-way label space
pub fn normalize_label(raw: &str) -> SentimentLabel {
    match raw {
        "POSITIVE" | "LABEL_2" => SentimentLabel::Positive,
        "NEGATIVE" | "LABEL_0" => SentimentLabel::Negative,
        "NEUTRAL" | "LABEL_1" => SentimentLabel::Neutral,
        other => match other.to_lowercase().as_str() {
            "positive" => SentimentLabel::Positive,
            "negative" => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        },
    }
}

/// Learned sentiment detector with a per-text cache
pub struct LearnedSentimentClassifier {
    name: String,
    model: Option<Arc<dyn SentimentModel>>,
    timeout: Duration,
    cache: DetectionCache<SentimentResult>,
}

impl LearnedSentimentClassifier {
    /// Wrap a loaded model
    pub fn new(model: Arc<dyn SentimentModel>, timeout: Duration, cache_capacity: usize) -> Self {
        Self {
            name: format!("learned-sentiment({})", model.name()),
            model: Some(model),
            timeout,
            cache: DetectionCache::new(cache_capacity),
        }
    }

    /// A classifier with no model; every call yields the neutral sentinel
    pub fn unavailable() -> Self {
        Self {
            name: "learned-sentiment(unavailable)".to_string(),
            model: None,
            timeout: Duration::ZERO,
            cache: DetectionCache::new(1),
        }
    }

    /// Load the first model candidate that succeeds, or degrade to unavailable
    pub fn from_config(config: &LearnedModelConfig, cache_capacity: usize) -> Self {
        if !config.enabled {
            info!("Learned sentiment model disabled by configuration");
            return Self::unavailable();
        }

        match crate::transformer::TransformerSentimentModel::load(config) {
            Ok(model) => {
                info!(model = model.name(), "Learned sentiment model loaded");
                Self::new(Arc::new(model), config.timeout(), cache_capacity)
            }
            Err(e) => {
                warn!(error = %e, "Learned sentiment model unavailable, using neutral fallback");
                Self::unavailable()
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    /// Name of the underlying model, if one is loaded
    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref().map(|m| m.name())
    }

    /// Classify a comment. Never fails; degraded results carry `error`.
    pub async fn classify(&self, text: &str) -> SentimentResult {
        match self.try_classify(text).await {
            Ok(result) => result,
            Err(reason) => {
                if reason != FailureReason::Unavailable {
                    warn!(%reason, "Learned sentiment degraded to neutral");
                }
                SentimentResult::unavailable(reason.to_string())
            }
        }
    }

    async fn try_classify(&self, text: &str) -> std::result::Result<SentimentResult, FailureReason> {
        let model = self.model.clone().ok_or(FailureReason::Unavailable)?;

        if let Some(cached) = self.cache.get(text) {
            return Ok(cached);
        }

        let owned = text.to_string();
        let task = tokio::task::spawn_blocking(move || model.predict(&owned));

        let prediction = match tokio::time::timeout(self.timeout, task).await {
            Err(_) => return Err(FailureReason::Timeout(self.timeout)),
            Ok(Err(join_error)) => return Err(FailureReason::Inference(join_error.to_string())),
            Ok(Ok(Err(e))) => return Err(FailureReason::Inference(e.to_string())),
            Ok(Ok(Ok(prediction))) => prediction,
        };

        let label = normalize_label(&prediction.label);
        debug!(raw = %prediction.label, %label, score = prediction.score, "Learned sentiment");

        let result = SentimentResult::learned(label, prediction.score, prediction.label);
        // Only successful predictions are cached
        self.cache.insert(text, result.clone());
        Ok(result)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[async_trait::async_trait]
impl Detector for LearnedSentimentClassifier {
    type Output = SentimentResult;

    async fn detect(&self, text: &str) -> SentimentResult {
        self.classify(text).await
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tier(&self) -> DetectorTier {
        DetectorTier::C
    }
}
