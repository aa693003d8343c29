//! Configuration for detectors and model loading

use crate::cache::DEFAULT_CACHE_CAPACITY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for all detectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Entries per detector cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Learned sentiment model
    #[serde(default)]
    pub learned: LearnedModelConfig,

    /// Intent classifier training
    #[serde(default)]
    pub intent: IntentConfig,
}

/// Learned sentiment model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnedModelConfig {
    /// Whether to try loading a model at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Hugging Face repository ids, tried in order
    #[serde(default = "default_candidates")]
    pub candidates: Vec<String>,

    /// Local model directory (config.json, tokenizer.json, model.safetensors).
    /// Takes precedence over `candidates` when set.
    #[serde(default)]
    pub model_dir: Option<PathBuf>,

    /// Device to run inference on
    #[serde(default)]
    pub device: DeviceSpec,

    /// Per-call inference timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Tokens kept per comment
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

/// Intent classifier hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentConfig {
    /// Vocabulary bound (most frequent terms kept)
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Inverse regularization strength
    #[serde(default = "default_c")]
    pub c: f64,

    /// Gradient descent iterations per class
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    /// Weight each class's positives and negatives equally during training
    #[serde(default = "default_true")]
    pub balance_classes: bool,
}

/// Device specification (for config files)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSpec {
    #[default]
    Cpu,
    Cuda {
        index: Option<usize>,
    },
    Metal {
        index: Option<usize>,
    },
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            learned: LearnedModelConfig::default(),
            intent: IntentConfig::default(),
        }
    }
}

impl Default for LearnedModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            candidates: default_candidates(),
            model_dir: None,
            device: DeviceSpec::Cpu,
            timeout_ms: default_timeout_ms(),
            max_length: default_max_length(),
        }
    }
}

impl LearnedModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            max_features: default_max_features(),
            c: default_c(),
            max_iterations: default_max_iterations(),
            learning_rate: default_learning_rate(),
            balance_classes: true,
        }
    }
}

impl DetectorConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_true() -> bool {
    true
}

fn default_candidates() -> Vec<String> {
    vec![
        "cardiffnlp/twitter-roberta-base-sentiment-latest".to_string(),
        "distilbert-base-uncased-finetuned-sst-2-english".to_string(),
    ]
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_max_length() -> usize {
    512
}

fn default_max_features() -> usize {
    5000
}

fn default_c() -> f64 {
    1.0
}

fn default_max_iterations() -> usize {
    800
}

fn default_learning_rate() -> f64 {
    1.0
}
