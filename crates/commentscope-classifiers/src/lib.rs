//! CommentScope Classifiers
//!
//! Per-comment detectors for customer feedback analysis.
//!
//! Detectors are organized into tiers based on latency budgets:
//! - Tier A (<2ms): Lexicon sentiment, aspect keywords, gazetteer lookup, keyword fallback
//! - Tier B (<5ms): Trained TF-IDF intent classifier
//! - Tier C (timeout-bounded): Transformer sentiment model
//!
//! Detectors never fail at call time. Degraded states show up in their output.

pub mod aspects;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod fallback;
pub mod gazetteer;
pub mod intent;
pub mod learned;
pub mod lexicon;
pub mod location;
pub mod transformer;

pub use aspects::AspectTagger;
pub use cache::{CacheStats, DetectionCache, DEFAULT_CACHE_CAPACITY};
pub use classifier::{Detector, DetectorTier};
pub use config::{DetectorConfig, DeviceSpec, IntentConfig, LearnedModelConfig};
pub use fallback::KeywordFallback;
pub use intent::{
    CategoryPrediction, CategorySource, IntentClassifier, IntentModel, LabeledExample,
    TfidfVectorizer,
};
pub use learned::{
    FailureReason, LearnedSentimentClassifier, SentimentModel, SentimentPrediction,
    MODEL_UNAVAILABLE,
};
pub use lexicon::LexiconSentimentScorer;
pub use location::LocationResolver;
pub use transformer::TransformerSentimentModel;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::aspects::AspectTagger;
    pub use crate::classifier::Detector;
    pub use crate::intent::{IntentClassifier, LabeledExample};
    pub use crate::learned::LearnedSentimentClassifier;
    pub use crate::lexicon::LexiconSentimentScorer;
    pub use crate::location::LocationResolver;
}
