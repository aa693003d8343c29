//! Intent classifier (Tier B)
//!
//! TF-IDF features feeding a one-vs-rest L2-regularized logistic regression,
//! trained once from labeled comments by deterministic full-batch gradient
//! descent. When no model could be trained the keyword fallback answers.

use crate::classifier::{Detector, DetectorTier};
use crate::config::IntentConfig;
use crate::fallback::KeywordFallback;
use commentscope_core::{Category, Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{info, warn};

/// A labeled training comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub text: String,
    pub category: Category,

    /// Free-text location column used by dataset analytics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl LabeledExample {
    pub fn new(text: impl Into<String>, category: Category) -> Self {
        Self {
            text: text.into(),
            category,
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "be", "became", "because", "become", "becomes", "been", "before",
    "beforehand", "behind", "being", "below", "beside", "besides", "between", "beyond", "both",
    "but", "by", "can", "cannot", "could", "did", "do", "does", "done", "down", "due", "during",
    "each", "eg", "either", "else", "elsewhere", "enough", "etc", "even", "ever", "every",
    "everyone", "everything", "everywhere", "except", "few", "for", "former", "formerly",
    "from", "further", "had", "has", "have", "he", "hence", "her", "here", "hereafter",
    "hereby", "herein", "hers", "herself", "him", "himself", "his", "how", "however", "i",
    "ie", "if", "in", "indeed", "into", "is", "it", "its", "itself", "just", "last", "latter",
    "least", "less", "ltd", "many", "may", "me", "meanwhile", "might", "mine", "more",
    "moreover", "most", "mostly", "much", "must", "my", "myself", "namely", "neither", "never",
    "nevertheless", "next", "no", "nobody", "none", "nor", "not", "nothing", "now", "nowhere",
    "of", "off", "often", "on", "once", "one", "only", "onto", "or", "other", "others",
    "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per", "perhaps", "please",
    "rather", "re", "same", "seem", "seemed", "seeming", "seems", "several", "she", "should",
    "since", "so", "some", "somehow", "someone", "something", "sometime", "sometimes",
    "somewhere", "still", "such", "than", "that", "the", "their", "them", "themselves", "then",
    "thence", "there", "thereafter", "thereby", "therefore", "therein", "thereupon", "these",
    "they", "this", "those", "though", "through", "throughout", "thru", "thus", "to",
    "together", "too", "toward", "towards", "under", "until", "up", "upon", "us", "very", "via",
    "was", "we", "were", "what", "whatever", "when", "whence", "whenever", "where",
    "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever", "whether", "which",
    "while", "whither", "who", "whoever", "whole", "whom", "whose", "why", "will", "with",
    "within", "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// Term-frequency / inverse-document-frequency vectorizer with a bounded
/// vocabulary, smooth IDF and L2-normalized rows.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    token_pattern: Regex,
    stop_words: HashSet<&'static str>,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

/// Sparse feature row: (term index, weight), sorted by index
pub type SparseRow = Vec<(usize, f64)>;

impl TfidfVectorizer {
    fn new() -> Result<Self> {
        let token_pattern = Regex::new(r"\b\w\w+\b")
            .map_err(|e| Error::training(format!("Invalid token pattern: {}", e)))?;
        Ok(Self {
            token_pattern,
            stop_words: STOP_WORDS.iter().copied().collect(),
            vocabulary: HashMap::new(),
            idf: Vec::new(),
        })
    }

    /// Fit the vocabulary and IDF weights, returning the transformed corpus
    pub fn fit_transform(documents: &[&str], max_features: usize) -> Result<(Self, Vec<SparseRow>)> {
        let mut vectorizer = Self::new()?;
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| vectorizer.tokenize(d)).collect();

        let mut term_counts: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for tokens in &tokenized {
            let mut seen = HashSet::new();
            for token in tokens {
                *term_counts.entry(token).or_insert(0) += 1;
                if seen.insert(token.as_str()) {
                    *doc_freq.entry(token).or_insert(0) += 1;
                }
            }
        }

        if term_counts.is_empty() {
            return Err(Error::training("empty vocabulary after stop-word filtering"));
        }

        // Keep the most frequent terms; ties resolve alphabetically
        let mut ranked: Vec<(&str, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|(ta, ca), (tb, cb)| cb.cmp(ca).then_with(|| ta.cmp(tb)));
        ranked.truncate(max_features.max(1));

        let mut kept: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort_unstable();

        let n_docs = documents.len() as f64;
        vectorizer.idf = kept
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        vectorizer.vocabulary = kept
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect();

        let rows = tokenized
            .iter()
            .map(|tokens| vectorizer.weigh(tokens))
            .collect();
        Ok((vectorizer, rows))
    }

    /// Transform one document with the fitted vocabulary
    pub fn transform(&self, document: &str) -> SparseRow {
        self.weigh(&self.tokenize(document))
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    fn tokenize(&self, document: &str) -> Vec<String> {
        let lowered = document.to_lowercase();
        self.token_pattern
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .map(str::to_string)
            .collect()
    }

    fn weigh(&self, tokens: &[String]) -> SparseRow {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokens {
            if let Some(&idx) = self.vocabulary.get(token) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut row: SparseRow = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();

        let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut row {
                *w /= norm;
            }
        }
        row
    }
}

/// Binary logistic regression weights for one class
#[derive(Debug, Clone)]
struct BinaryModel {
    weights: Vec<f64>,
    intercept: f64,
}

impl BinaryModel {
    fn decision(&self, row: &SparseRow) -> f64 {
        self.intercept + row.iter().map(|(idx, w)| self.weights[*idx] * w).sum::<f64>()
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// A trained intent model
#[derive(Debug, Clone)]
pub struct IntentModel {
    vectorizer: TfidfVectorizer,
    classes: Vec<Category>,
    models: Vec<BinaryModel>,
}

impl IntentModel {
    /// Train from labeled examples. Rows with blank text are ignored.
    pub fn train(examples: &[LabeledExample], config: &IntentConfig) -> Result<Self> {
        let clean: Vec<&LabeledExample> = examples
            .iter()
            .filter(|e| !e.text.trim().is_empty())
            .collect();
        if clean.is_empty() {
            return Err(Error::training("no valid training data after cleaning"));
        }

        let mut classes: Vec<Category> = clean.iter().map(|e| e.category).collect();
        classes.sort_by_key(|c| c.as_str());
        classes.dedup();
        if classes.len() < 2 {
            return Err(Error::training(format!(
                "need at least two categories, found {}",
                classes.len()
            )));
        }

        let documents: Vec<&str> = clean.iter().map(|e| e.text.as_str()).collect();
        let (vectorizer, rows) = TfidfVectorizer::fit_transform(&documents, config.max_features)?;

        info!(
            samples = clean.len(),
            categories = classes.len(),
            vocabulary = vectorizer.vocabulary_size(),
            "Training intent classifier"
        );

        let n = rows.len() as f64;
        let lambda = 1.0 / (config.c.max(f64::EPSILON) * n);
        let models = classes
            .iter()
            .map(|class| {
                let targets: Vec<f64> = clean
                    .iter()
                    .map(|e| if e.category == *class { 1.0 } else { 0.0 })
                    .collect();
                let weights = sample_weights(&targets, config.balance_classes);
                fit_binary(
                    &rows,
                    &targets,
                    &weights,
                    vectorizer.vocabulary_size(),
                    lambda,
                    config.learning_rate,
                    config.max_iterations,
                )
            })
            .collect();

        Ok(Self {
            vectorizer,
            classes,
            models,
        })
    }

    /// Predict the single most likely category
    pub fn predict(&self, text: &str) -> Category {
        self.predict_row(&self.vectorizer.transform(text))
    }

    /// Predict only when the text shares at least one term with the
    /// training vocabulary. Otherwise the decision would rest on the
    /// intercepts alone.
    pub fn predict_known(&self, text: &str) -> Option<Category> {
        let row = self.vectorizer.transform(text);
        if row.is_empty() {
            None
        } else {
            Some(self.predict_row(&row))
        }
    }

    fn predict_row(&self, row: &SparseRow) -> Category {
        let mut best = (self.classes[0], f64::NEG_INFINITY);
        for (class, model) in self.classes.iter().zip(&self.models) {
            let score = model.decision(row);
            if score > best.1 {
                best = (*class, score);
            }
        }
        best.0
    }

    /// One-vs-rest probabilities, normalized to sum to one
    pub fn predict_proba(&self, text: &str) -> Vec<(Category, f64)> {
        let row = self.vectorizer.transform(text);
        let raw: Vec<f64> = self.models.iter().map(|m| sigmoid(m.decision(&row))).collect();
        let total: f64 = raw.iter().sum();
        self.classes
            .iter()
            .zip(raw)
            .map(|(class, p)| (*class, if total > 0.0 { p / total } else { 0.0 }))
            .collect()
    }

    /// Labels seen during training, sorted by display label
    pub fn classes(&self) -> &[Category] {
        &self.classes
    }
}

/// Per-sample weights. Balanced weighting gives positives and negatives
/// the same total mass, `n / (2 * class_count)` each.
fn sample_weights(targets: &[f64], balanced: bool) -> Vec<f64> {
    let n = targets.len() as f64;
    let positives = targets.iter().filter(|t| **t > 0.5).count() as f64;
    let negatives = n - positives;
    if !balanced || positives == 0.0 || negatives == 0.0 {
        return vec![1.0; targets.len()];
    }
    targets
        .iter()
        .map(|t| {
            if *t > 0.5 {
                n / (2.0 * positives)
            } else {
                n / (2.0 * negatives)
            }
        })
        .collect()
}

fn fit_binary(
    rows: &[SparseRow],
    targets: &[f64],
    sample_weights: &[f64],
    dim: usize,
    lambda: f64,
    learning_rate: f64,
    iterations: usize,
) -> BinaryModel {
    let n = rows.len() as f64;
    let mut model = BinaryModel {
        weights: vec![0.0; dim],
        intercept: 0.0,
    };
    let mut grad = vec![0.0; dim];

    for _ in 0..iterations {
        grad.iter_mut().for_each(|g| *g = 0.0);
        let mut grad_intercept = 0.0;

        for ((row, target), weight) in rows.iter().zip(targets).zip(sample_weights) {
            let error = (sigmoid(model.decision(row)) - target) * weight;
            grad_intercept += error;
            for (idx, w) in row {
                grad[*idx] += error * w;
            }
        }

        for (weight, g) in model.weights.iter_mut().zip(&grad) {
            *weight -= learning_rate * (g / n + lambda * *weight);
        }
        model.intercept -= learning_rate * grad_intercept / n;
    }

    model
}

/// Where a category decision came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategorySource {
    Model,
    Fallback,
}

/// Category plus provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPrediction {
    pub category: Category,
    pub source: CategorySource,
}

/// Trained model with the keyword fallback behind it
pub struct IntentClassifier {
    name: String,
    model: Option<IntentModel>,
    fallback: KeywordFallback,
}

impl IntentClassifier {
    /// Train from examples; a training failure leaves only the fallback
    pub fn train(examples: &[LabeledExample], config: &IntentConfig) -> Self {
        match IntentModel::train(examples, config) {
            Ok(model) => {
                let labels: Vec<&str> = model.classes().iter().map(|c| c.as_str()).collect();
                info!(?labels, "Intent classifier trained");
                Self::with_model(Some(model))
            }
            Err(e) => {
                warn!(error = %e, "Intent classifier unavailable, using keyword fallback");
                Self::with_model(None)
            }
        }
    }

    pub fn with_model(model: Option<IntentModel>) -> Self {
        Self {
            name: "intent-classifier".to_string(),
            model,
            fallback: KeywordFallback::new(),
        }
    }

    /// Categorize a comment
    pub fn classify(&self, text: &str) -> CategoryPrediction {
        match self.model.as_ref().and_then(|m| m.predict_known(text)) {
            Some(category) => CategoryPrediction {
                category,
                source: CategorySource::Model,
            },
            None => CategoryPrediction {
                category: self.fallback.classify(text),
                source: CategorySource::Fallback,
            },
        }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn classes(&self) -> &[Category] {
        self.model.as_ref().map(IntentModel::classes).unwrap_or(&[])
    }
}

#[async_trait::async_trait]
impl Detector for IntentClassifier {
    type Output = CategoryPrediction;

    async fn detect(&self, text: &str) -> CategoryPrediction {
        self.classify(text)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tier(&self) -> DetectorTier {
        DetectorTier::B
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable_dataset() -> Vec<LabeledExample> {
        let rows = [
            ("terrible awful broken engine", Category::Complaint),
            ("awful rude staff terrible", Category::Complaint),
            ("broken door terrible experience", Category::Complaint),
            ("rude awful broken promises", Category::Complaint),
            ("love fantastic smooth ride", Category::Praise),
            ("fantastic comfortable love it", Category::Praise),
            ("smooth fantastic delightful love", Category::Praise),
            ("delightful comfortable smooth cabin", Category::Praise),
            ("add sunroof option please consider", Category::Suggestion),
            ("consider adding wireless charger option", Category::Suggestion),
            ("sunroof option consider adding", Category::Suggestion),
            ("wireless option add consider", Category::Suggestion),
        ];
        rows.iter()
            .map(|(text, cat)| LabeledExample::new(*text, *cat))
            .collect()
    }

    #[test]
    fn test_vectorizer_filters_stop_words_and_short_tokens() {
        let (vectorizer, rows) =
            TfidfVectorizer::fit_transform(&["The car is a gem", "a car to buy"], 100).unwrap();
        // "the", "is", "a", "to" are dropped
        assert_eq!(vectorizer.vocabulary_size(), 3);
        let norm: f64 = rows[0].iter().map(|(_, w)| w * w).sum();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_vectorizer_max_features() {
        let (vectorizer, _) =
            TfidfVectorizer::fit_transform(&["alpha alpha beta gamma", "alpha beta"], 2).unwrap();
        assert_eq!(vectorizer.vocabulary_size(), 2);
        assert!(vectorizer.transform("gamma").is_empty());
    }

    #[test]
    fn test_empty_vocabulary_fails() {
        let result = TfidfVectorizer::fit_transform(&["the a an", "is it"], 100);
        assert!(result.is_err());
    }

    #[test]
    fn test_train_and_predict() {
        let model = IntentModel::train(&separable_dataset(), &IntentConfig::default()).unwrap();
        assert_eq!(
            model.classes(),
            &[Category::Complaint, Category::Praise, Category::Suggestion]
        );
        assert_eq!(model.predict("terrible awful broken"), Category::Complaint);
        assert_eq!(model.predict("love fantastic smooth"), Category::Praise);
        assert_eq!(model.predict("consider sunroof option"), Category::Suggestion);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let model = IntentModel::train(&separable_dataset(), &IntentConfig::default()).unwrap();
        let probs = model.predict_proba("rude staff");
        let total: f64 = probs.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
        let (top, _) = probs
            .iter()
            .copied()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap();
        assert_eq!(top, Category::Complaint);
    }

    #[test]
    fn test_training_is_deterministic() {
        let data = separable_dataset();
        let a = IntentModel::train(&data, &IntentConfig::default()).unwrap();
        let b = IntentModel::train(&data, &IntentConfig::default()).unwrap();
        assert_eq!(a.predict_proba("smooth cabin"), b.predict_proba("smooth cabin"));
    }

    #[test]
    fn test_empty_training_set_fails() {
        assert!(IntentModel::train(&[], &IntentConfig::default()).is_err());
        let blank = vec![LabeledExample::new("   ", Category::Praise)];
        assert!(IntentModel::train(&blank, &IntentConfig::default()).is_err());
    }

    #[test]
    fn test_single_class_fails() {
        let data = vec![
            LabeledExample::new("great car", Category::Praise),
            LabeledExample::new("lovely drive", Category::Praise),
        ];
        assert!(IntentModel::train(&data, &IntentConfig::default()).is_err());
    }

    #[test]
    fn test_classifier_falls_back_without_model() {
        let classifier = IntentClassifier::train(&[], &IntentConfig::default());
        assert!(!classifier.has_model());
        assert!(classifier.classes().is_empty());

        let prediction = classifier.classify("The dealer was terrible");
        assert_eq!(prediction.category, Category::Complaint);
        assert_eq!(prediction.source, CategorySource::Fallback);
    }

    #[test]
    fn test_balanced_weights_equalize_class_mass() {
        let targets = [1.0, 0.0, 0.0, 0.0];
        let weights = sample_weights(&targets, true);
        assert_eq!(weights, vec![2.0, 4.0 / 6.0, 4.0 / 6.0, 4.0 / 6.0]);
        let positive: f64 = weights[..1].iter().sum();
        let negative: f64 = weights[1..].iter().sum();
        assert!((positive - negative).abs() < 1e-9);

        assert_eq!(sample_weights(&targets, false), vec![1.0; 4]);
    }

    #[test]
    fn test_minority_class_survives_imbalance() {
        let mut data = separable_dataset();
        // Swamp the other classes with praise
        for text in ["lovely smooth drive", "fantastic cabin love", "smooth comfortable ride"] {
            for _ in 0..4 {
                data.push(LabeledExample::new(text, Category::Praise));
            }
        }
        let model = IntentModel::train(&data, &IntentConfig::default()).unwrap();
        assert_eq!(model.predict("sunroof option please"), Category::Suggestion);
        assert_eq!(model.predict("rude staff broken door"), Category::Complaint);
    }

    #[test]
    fn test_unknown_vocabulary_uses_fallback() {
        let classifier = IntentClassifier::train(&separable_dataset(), &IntentConfig::default());
        assert!(classifier.has_model());

        // No term overlaps the training vocabulary
        let prediction = classifier.classify("Which variant fits a family budget?");
        assert_eq!(prediction.category, Category::PurchaseIntent);
        assert_eq!(prediction.source, CategorySource::Fallback);
    }

    #[test]
    fn test_classifier_uses_model() {
        let classifier = IntentClassifier::train(&separable_dataset(), &IntentConfig::default());
        assert!(classifier.has_model());
        let prediction = classifier.classify("fantastic smooth love");
        assert_eq!(prediction.category, Category::Praise);
        assert_eq!(prediction.source, CategorySource::Model);
    }
}
