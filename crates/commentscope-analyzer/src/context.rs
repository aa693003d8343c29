//! Process-wide analysis state
//!
//! Every detector, the trained intent model and the recommendation engine
//! are built once here and shared read-only by all analyses.

use crate::dataset::{load_dataset, seed_dataset};
use crate::metrics::AnalysisMetrics;
use commentscope_classifiers::{
    AspectTagger, DetectorConfig, IntentClassifier, LabeledExample, LearnedSentimentClassifier,
    LexiconSentimentScorer, LocationResolver,
};
use commentscope_core::{Error, Result};
use commentscope_recommend::{RecommendationEngine, RuleTable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Detector and model settings
    #[serde(default)]
    pub detectors: DetectorConfig,

    /// Labeled dataset used for intent training and location analytics
    #[serde(default = "default_dataset_path")]
    pub dataset: PathBuf,

    /// Replacement rule table (YAML); the built-in table when unset
    #[serde(default)]
    pub rules: Option<PathBuf>,

    /// Comments analyzed concurrently in batch mode
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            detectors: DetectorConfig::default(),
            dataset: default_dataset_path(),
            rules: None,
            batch_concurrency: default_batch_concurrency(),
        }
    }
}

impl AnalysisConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("data/comments.json")
}

fn default_batch_concurrency() -> usize {
    8
}

/// Shared detectors, models and rules
pub struct AnalysisContext {
    config: AnalysisConfig,
    lexicon: LexiconSentimentScorer,
    learned: LearnedSentimentClassifier,
    aspects: AspectTagger,
    locations: LocationResolver,
    intent: IntentClassifier,
    engine: RecommendationEngine,
    dataset: Vec<LabeledExample>,
    metrics: AnalysisMetrics,
}

impl AnalysisContext {
    /// Load the dataset and learned model, then build every component.
    ///
    /// An unreadable or malformed dataset never stops startup; the seed
    /// dataset takes its place. Model loading and intent training run on
    /// the blocking pool.
    pub async fn build(config: AnalysisConfig) -> Result<Self> {
        let dataset = match load_dataset(&config.dataset) {
            Ok(dataset) => dataset,
            Err(e) => {
                warn!(
                    path = %config.dataset.display(),
                    error = %e,
                    "Dataset unusable, using seed dataset"
                );
                seed_dataset()
            }
        };

        let learned_config = config.detectors.learned.clone();
        let capacity = config.detectors.cache_capacity;
        let learned = tokio::task::spawn_blocking(move || {
            LearnedSentimentClassifier::from_config(&learned_config, capacity)
        })
        .await
        .map_err(|e| Error::internal(format!("Model loading task failed: {e}")))?;

        let intent_config = config.detectors.intent.clone();
        let (intent, dataset) = tokio::task::spawn_blocking(move || {
            let intent = IntentClassifier::train(&dataset, &intent_config);
            (intent, dataset)
        })
        .await
        .map_err(|e| Error::internal(format!("Intent training task failed: {e}")))?;

        Self::assemble(config, dataset, learned, intent)
    }

    /// Build from an in-memory dataset and an already constructed learned
    /// classifier. Trains the intent model synchronously.
    pub fn with_learned(
        config: AnalysisConfig,
        dataset: Vec<LabeledExample>,
        learned: LearnedSentimentClassifier,
    ) -> Result<Self> {
        let intent = IntentClassifier::train(&dataset, &config.detectors.intent);
        Self::assemble(config, dataset, learned, intent)
    }

    fn assemble(
        config: AnalysisConfig,
        dataset: Vec<LabeledExample>,
        learned: LearnedSentimentClassifier,
        intent: IntentClassifier,
    ) -> Result<Self> {
        let capacity = config.detectors.cache_capacity;

        let rules = match &config.rules {
            Some(path) => RuleTable::from_file(path)?,
            None => RuleTable::builtin(),
        };

        let context = Self {
            lexicon: LexiconSentimentScorer::new(),
            aspects: AspectTagger::with_cache_capacity(capacity)?,
            locations: LocationResolver::with_cache_capacity(capacity)?,
            engine: RecommendationEngine::new(rules),
            metrics: AnalysisMetrics::new(),
            config,
            learned,
            intent,
            dataset,
        };

        info!(
            learned_model = context.learned.model_name().unwrap_or("unavailable"),
            intent_model = context.intent.has_model(),
            dataset_records = context.dataset.len(),
            rules = context.engine.rules().len(),
            "Analysis context ready"
        );
        Ok(context)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &LexiconSentimentScorer {
        &self.lexicon
    }

    pub fn learned(&self) -> &LearnedSentimentClassifier {
        &self.learned
    }

    pub fn aspects(&self) -> &AspectTagger {
        &self.aspects
    }

    pub fn locations(&self) -> &LocationResolver {
        &self.locations
    }

    pub fn intent(&self) -> &IntentClassifier {
        &self.intent
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    pub fn dataset(&self) -> &[LabeledExample] {
        &self.dataset
    }

    pub fn metrics(&self) -> &AnalysisMetrics {
        &self.metrics
    }
}
