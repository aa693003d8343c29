//! Keyword-based category fallback (Tier A)

use crate::classifier::{Detector, DetectorTier};
use commentscope_core::Category;

/// Keyword buckets in priority order. The first bucket with any substring
/// hit decides the category.
pub const FALLBACK_BUCKETS: &[(Category, &[&str])] = &[
    (
        Category::Complaint,
        &[
            "terrible", "bad", "worst", "hate", "awful", "disappointed", "problem", "issue",
            "complain",
        ],
    ),
    (
        Category::Praise,
        &[
            "love", "great", "excellent", "amazing", "fantastic", "best", "good", "awesome",
            "recommend",
        ],
    ),
    (
        Category::Suggestion,
        &[
            "should", "could", "wish", "hope", "suggest", "improve", "better", "add", "include",
        ],
    ),
    (
        Category::PurchaseIntent,
        &["buy", "purchase", "confused", "which", "variant", "price", "cost", "thinking"],
    ),
    (
        Category::CompetitiveComparison,
        &["vs", "versus", "compared", "better than", "hyundai", "maruti", "kia"],
    ),
];

/// Ordered keyword cascade used when no intent model is available
#[derive(Debug, Clone, Default)]
pub struct KeywordFallback;

impl KeywordFallback {
    pub fn new() -> Self {
        Self
    }

    /// Categorize by the first matching bucket, else General Feedback
    pub fn classify(&self, text: &str) -> Category {
        let text_lower = text.to_lowercase();
        FALLBACK_BUCKETS
            .iter()
            .find(|(_, words)| words.iter().any(|w| text_lower.contains(w)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::GeneralFeedback)
    }
}

#[async_trait::async_trait]
impl Detector for KeywordFallback {
    type Output = Category;

    async fn detect(&self, text: &str) -> Category {
        self.classify(text)
    }

    fn name(&self) -> &str {
        "keyword-fallback"
    }

    fn tier(&self) -> DetectorTier {
        DetectorTier::A
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_bucket() {
        let fallback = KeywordFallback::new();
        assert_eq!(fallback.classify("Worst purchase ever"), Category::Complaint);
        assert_eq!(fallback.classify("Excellent mileage"), Category::Praise);
        assert_eq!(fallback.classify("Please include ventilated seats"), Category::Suggestion);
        assert_eq!(fallback.classify("Planning to buy the XZ variant"), Category::PurchaseIntent);
        assert_eq!(fallback.classify("Nexon vs Creta"), Category::CompetitiveComparison);
        assert_eq!(fallback.classify("Took delivery yesterday"), Category::GeneralFeedback);
    }

    #[test]
    fn test_bucket_priority() {
        let fallback = KeywordFallback::new();
        // complaint outranks praise
        assert_eq!(fallback.classify("Great car, terrible dealer"), Category::Complaint);
        // "better than" is shadowed by the suggestion bucket's "better"
        assert_eq!(
            fallback.classify("Tiago is better than the rest"),
            Category::Suggestion
        );
    }

    #[test]
    fn test_substring_matching() {
        let fallback = KeywordFallback::new();
        // "bad" inside "badge"
        assert_eq!(fallback.classify("The badge on the grille"), Category::Complaint);
    }
}
