//! Mock sentiment models for testing
//!
//! Configurable implementations of the `SentimentModel` trait for exercising
//! the learned classifier's caching, label normalization and degradation
//! paths without loading real weights.

use commentscope_classifiers::{
    Detector, DetectorTier, LearnedSentimentClassifier, SentimentModel, SentimentPrediction,
    MODEL_UNAVAILABLE,
};
use commentscope_core::{Result, SentimentLabel};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A configurable mock model
pub struct MockModel {
    name: String,
    label: String,
    score: f64,
    simulated_latency: Option<Duration>,
    call_count: AtomicU32,
}

impl MockModel {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: "NEUTRAL".to_string(),
            score: 0.5,
            simulated_latency: None,
            call_count: AtomicU32::new(0),
        }
    }

    /// Set the raw label this model emits
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Block for this long inside `predict`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = Some(latency);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl SentimentModel for MockModel {
    fn predict(&self, text: &str) -> Result<SentimentPrediction> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        if let Some(latency) = self.simulated_latency {
            std::thread::sleep(latency);
        }

        // Dynamic labels based on text content
        let label = if text.contains("GOOD") {
            "LABEL_2".to_string()
        } else if text.contains("BAD") {
            "LABEL_0".to_string()
        } else {
            self.label.clone()
        };

        Ok(SentimentPrediction {
            label,
            score: self.score,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A model that always fails
pub struct FailingModel {
    error_message: String,
}

impl FailingModel {
    pub fn new() -> Self {
        Self {
            error_message: "Simulated inference failure".to_string(),
        }
    }

    pub fn with_error(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }
}

impl SentimentModel for FailingModel {
    fn predict(&self, _text: &str) -> Result<SentimentPrediction> {
        Err(commentscope_core::Error::model(&self.error_message))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

fn classifier_with(model: Arc<dyn SentimentModel>) -> LearnedSentimentClassifier {
    LearnedSentimentClassifier::new(model, Duration::from_secs(2), 16)
}

#[tokio::test]
async fn test_binary_vocabulary_is_normalized() {
    let model = Arc::new(MockModel::new("sst2").with_label("NEGATIVE").with_score(0.99));
    let classifier = classifier_with(model);

    let result = classifier.classify("The clutch is stiff").await;
    assert_eq!(result.label, SentimentLabel::Negative);
    assert_eq!(result.score, 0.99);
    assert_eq!(result.raw_label.as_deref(), Some("NEGATIVE"));
}

#[tokio::test]
async fn test_three_class_vocabulary_is_normalized() {
    let classifier = classifier_with(Arc::new(MockModel::new("roberta")));

    assert_eq!(
        classifier.classify("GOOD car").await.label,
        SentimentLabel::Positive
    );
    assert_eq!(
        classifier.classify("BAD car").await.label,
        SentimentLabel::Negative
    );
    assert_eq!(
        classifier.classify("a car").await.label,
        SentimentLabel::Neutral
    );
}

#[tokio::test]
async fn test_identical_text_hits_cache() {
    let model = Arc::new(MockModel::new("counted"));
    let classifier = classifier_with(model.clone());

    for _ in 0..5 {
        classifier.classify("same comment").await;
    }

    assert_eq!(model.call_count(), 1);
    let stats = classifier.cache_stats();
    assert_eq!(stats.hits, 4);
    assert_eq!(stats.len, 1);
}

#[tokio::test]
async fn test_failure_is_absorbed() {
    let classifier = classifier_with(Arc::new(FailingModel::new().with_error("CUDA OOM")));

    let result = classifier.classify("anything").await;
    assert_eq!(result.label, SentimentLabel::Neutral);
    assert_eq!(result.score, 0.0);
    assert!(result.error.as_deref().unwrap_or_default().contains("CUDA OOM"));
}

#[tokio::test]
async fn test_slow_model_times_out() {
    let model = Arc::new(MockModel::new("slow").with_latency(Duration::from_millis(300)));
    let classifier = LearnedSentimentClassifier::new(model, Duration::from_millis(20), 16);

    let result = classifier.classify("anything").await;
    assert!(result.is_degraded());
    assert_eq!(classifier.cache_stats().len, 0);
}

#[tokio::test]
async fn test_unavailable_detector() {
    let classifier = LearnedSentimentClassifier::unavailable();

    let result = classifier.detect("anything").await;
    assert_eq!(result.error.as_deref(), Some(MODEL_UNAVAILABLE));
    assert_eq!(classifier.tier(), DetectorTier::C);
}
