//! Sentiment consensus between the learned and lexicon scorers

use commentscope_core::{Category, Priority, SentimentLabel, SentimentResult};
use std::fmt;

/// Pair of sentiment labels used to strengthen priority decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentimentConsensus {
    pub learned: SentimentLabel,
    pub lexicon: SentimentLabel,
}

impl SentimentConsensus {
    pub fn new(learned: SentimentLabel, lexicon: SentimentLabel) -> Self {
        Self { learned, lexicon }
    }

    /// Degraded learned results carry a neutral label, so they never count
    /// toward a negative agreement.
    pub fn from_results(learned: &SentimentResult, lexicon: &SentimentResult) -> Self {
        Self::new(learned.label, lexicon.label)
    }

    pub fn both_negative(&self) -> bool {
        self.learned == SentimentLabel::Negative && self.lexicon == SentimentLabel::Negative
    }

    /// Priority of the generic default recommendation
    pub fn baseline_priority(&self, category: Category) -> Priority {
        if category == Category::Complaint || self.both_negative() {
            Priority::High
        } else if category == Category::Suggestion {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

impl fmt::Display for SentimentConsensus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "learned: {}, lexicon: {}", self.learned, self.lexicon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_format() {
        let consensus = SentimentConsensus::new(SentimentLabel::Positive, SentimentLabel::Neutral);
        assert_eq!(consensus.to_string(), "learned: positive, lexicon: neutral");
    }

    #[test]
    fn test_baseline_priority() {
        use SentimentLabel::*;

        let agree = SentimentConsensus::new(Negative, Negative);
        let split = SentimentConsensus::new(Negative, Positive);

        assert_eq!(agree.baseline_priority(Category::GeneralFeedback), Priority::High);
        assert_eq!(split.baseline_priority(Category::GeneralFeedback), Priority::Low);
        assert_eq!(split.baseline_priority(Category::Complaint), Priority::High);
        assert_eq!(split.baseline_priority(Category::Suggestion), Priority::Medium);
        assert_eq!(agree.baseline_priority(Category::Suggestion), Priority::High);
    }

    #[test]
    fn test_degraded_learned_result_is_neutral() {
        let learned = SentimentResult::unavailable("sentiment model not available");
        let lexicon = SentimentResult::learned(SentimentLabel::Negative, 0.9, "NEGATIVE");
        let consensus = SentimentConsensus::from_results(&learned, &lexicon);
        assert_eq!(consensus.learned, SentimentLabel::Neutral);
        assert!(!consensus.both_negative());
    }
}
