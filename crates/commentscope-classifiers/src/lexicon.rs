//! Valence-aware lexicon sentiment scorer (Tier A)
//!
//! Each token is looked up in a built-in valence lexicon (-4.0..=4.0). Valences
//! are adjusted for boosters in the preceding three tokens, negation in the
//! preceding three tokens, ALL-CAPS emphasis, the contrastive "but", and
//! trailing punctuation, then summed and squashed into a compound score in
//! `[-1, 1]`.

use crate::classifier::{Detector, DetectorTier};
use commentscope_core::{round4, PolarityScores, SentimentResult};
use std::collections::{HashMap, HashSet};

/// Normalization constant for the compound score
const ALPHA: f64 = 15.0;

/// Increment applied by booster words
const BOOSTER_INCREMENT: f64 = 0.293;

/// Extra valence for an ALL-CAPS sentiment word in mixed-case text
const CAPS_INCREMENT: f64 = 0.733;

/// Scale applied to a negated valence
const NEGATION_SCALAR: f64 = -0.74;

/// Tokens looked back over for boosters and negations
const LOOKBACK: usize = 3;

const LEXICON: &[(&str, f64)] = &[
    // positive
    ("good", 1.9),
    ("great", 3.1),
    ("excellent", 3.2),
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("fantastic", 2.6),
    ("wonderful", 2.7),
    ("love", 3.2),
    ("loved", 2.9),
    ("loving", 2.9),
    ("like", 1.5),
    ("liked", 1.8),
    ("best", 3.2),
    ("better", 1.9),
    ("nice", 1.8),
    ("happy", 2.7),
    ("glad", 2.0),
    ("pleased", 1.9),
    ("satisfied", 1.8),
    ("impressed", 2.1),
    ("impressive", 2.3),
    ("perfect", 2.7),
    ("superb", 3.1),
    ("outstanding", 3.0),
    ("brilliant", 2.8),
    ("beautiful", 2.9),
    ("comfortable", 1.6),
    ("smooth", 1.2),
    ("reliable", 1.7),
    ("helpful", 1.8),
    ("friendly", 2.2),
    ("polite", 1.7),
    ("professional", 1.2),
    ("courteous", 1.9),
    ("quick", 1.0),
    ("efficient", 1.6),
    ("recommend", 1.5),
    ("recommended", 1.5),
    ("worth", 0.9),
    ("value", 0.8),
    ("affordable", 1.1),
    ("solid", 1.4),
    ("sturdy", 1.2),
    ("safe", 1.9),
    ("secure", 1.4),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("thanks", 1.9),
    ("thank", 1.5),
    ("appreciate", 2.0),
    ("appreciated", 2.1),
    ("fun", 2.3),
    ("exciting", 2.2),
    ("excited", 1.4),
    ("stylish", 1.9),
    ("attractive", 1.9),
    ("powerful", 1.8),
    ("responsive", 1.5),
    ("spacious", 1.3),
    ("premium", 1.2),
    ("fabulous", 3.0),
    ("incredible", 2.9),
    ("delighted", 2.8),
    ("favorite", 2.0),
    ("win", 2.8),
    ("winner", 2.8),
    ("success", 2.7),
    ("successful", 2.8),
    ("improved", 2.1),
    ("benefit", 2.0),
    ("easy", 1.9),
    ("clean", 1.7),
    ("fine", 0.8),
    ("ok", 0.9),
    ("okay", 0.9),
    ("cool", 1.3),
    ("hope", 1.9),
    ("wish", 1.7),
    ("yes", 1.7),
    // negative
    ("bad", -2.5),
    ("terrible", -2.1),
    ("awful", -2.0),
    ("horrible", -2.5),
    ("worst", -3.1),
    ("worse", -2.1),
    ("poor", -2.1),
    ("hate", -2.7),
    ("hated", -3.2),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("disappointment", -2.3),
    ("unprofessional", -1.9),
    ("rude", -2.0),
    ("slow", -1.0),
    ("expensive", -1.2),
    ("overpriced", -1.8),
    ("problem", -1.7),
    ("problems", -1.7),
    ("issue", -0.8),
    ("issues", -1.0),
    ("broken", -2.1),
    ("broke", -1.8),
    ("fail", -2.5),
    ("failed", -2.3),
    ("failure", -2.3),
    ("faulty", -1.9),
    ("defective", -2.1),
    ("useless", -1.8),
    ("waste", -1.8),
    ("annoying", -1.7),
    ("annoyed", -1.6),
    ("angry", -2.3),
    ("frustrated", -2.4),
    ("frustrating", -1.9),
    ("upset", -1.6),
    ("unhappy", -1.8),
    ("sad", -2.1),
    ("complain", -1.5),
    ("complaint", -1.2),
    ("noisy", -1.0),
    ("uncomfortable", -1.6),
    ("ugly", -2.3),
    ("cheap", -0.6),
    ("weak", -1.9),
    ("lacking", -1.2),
    ("lack", -1.3),
    ("delay", -1.3),
    ("delayed", -0.9),
    ("pathetic", -2.6),
    ("worthless", -2.3),
    ("disgusting", -2.9),
    ("nightmare", -2.4),
    ("unreliable", -1.6),
    ("unsafe", -2.1),
    ("dangerous", -2.1),
    ("bug", -1.0),
    ("buggy", -1.6),
    ("crash", -1.7),
    ("crashes", -1.4),
    ("scam", -2.6),
    ("cheated", -2.3),
    ("ignored", -1.5),
    ("mess", -1.5),
    ("regret", -1.9),
    ("unacceptable", -2.0),
    ("no", -1.2),
];

/// Words that scale the next sentiment word up or down
const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", BOOSTER_INCREMENT),
    ("amazingly", BOOSTER_INCREMENT),
    ("completely", BOOSTER_INCREMENT),
    ("considerably", BOOSTER_INCREMENT),
    ("deeply", BOOSTER_INCREMENT),
    ("extremely", BOOSTER_INCREMENT),
    ("highly", BOOSTER_INCREMENT),
    ("incredibly", BOOSTER_INCREMENT),
    ("really", BOOSTER_INCREMENT),
    ("so", BOOSTER_INCREMENT),
    ("super", BOOSTER_INCREMENT),
    ("totally", BOOSTER_INCREMENT),
    ("truly", BOOSTER_INCREMENT),
    ("very", BOOSTER_INCREMENT),
    ("most", BOOSTER_INCREMENT),
    ("more", BOOSTER_INCREMENT),
    ("barely", -BOOSTER_INCREMENT),
    ("hardly", -BOOSTER_INCREMENT),
    ("slightly", -BOOSTER_INCREMENT),
    ("somewhat", -BOOSTER_INCREMENT),
    ("marginally", -BOOSTER_INCREMENT),
    ("less", -BOOSTER_INCREMENT),
    ("little", -BOOSTER_INCREMENT),
    ("partly", -BOOSTER_INCREMENT),
];

const NEGATIONS: &[&str] = &[
    "no", "not", "never", "none", "nobody", "nothing", "neither", "nor", "nowhere", "without",
    "cannot", "cant", "dont", "doesnt", "didnt", "isnt", "wasnt", "werent", "wont", "wouldnt",
    "shouldnt", "couldnt", "hasnt", "havent", "hadnt", "aint", "rarely", "seldom",
];

/// Lexicon-based sentiment scorer. Immutable after construction.
pub struct LexiconSentimentScorer {
    name: String,
    lexicon: HashMap<&'static str, f64>,
    boosters: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
}

impl LexiconSentimentScorer {
    pub fn new() -> Self {
        Self::with_name("lexicon-sentiment")
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lexicon: LEXICON.iter().copied().collect(),
            boosters: BOOSTERS.iter().copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
        }
    }

    /// Score a comment. Empty text scores neutral with a zero compound.
    pub fn score(&self, text: &str) -> SentimentResult {
        SentimentResult::lexicon(self.polarity_scores(text))
    }

    /// Compute the proportion breakdown and compound score
    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return PolarityScores {
                positive: 0.0,
                neutral: 0.0,
                negative: 0.0,
                compound: 0.0,
            };
        }

        let caps_differential = has_caps_differential(&tokens);
        let lowered: Vec<String> = tokens.iter().map(|t| normalize_token(t)).collect();

        let mut sentiments = Vec::with_capacity(tokens.len());
        for (i, word) in lowered.iter().enumerate() {
            if self.boosters.contains_key(word.as_str()) {
                sentiments.push(0.0);
                continue;
            }
            // "no" before a sentiment word negates it instead of scoring itself
            if word == "no"
                && lowered
                    .get(i + 1)
                    .is_some_and(|next| self.lexicon.contains_key(next.as_str()))
            {
                sentiments.push(0.0);
                continue;
            }
            let valence = match self.lexicon.get(word.as_str()) {
                Some(v) => *v,
                None => {
                    sentiments.push(0.0);
                    continue;
                }
            };
            sentiments.push(self.adjust_valence(valence, i, &tokens, &lowered, caps_differential));
        }

        apply_but_shift(&lowered, &mut sentiments);

        let punctuation = punctuation_emphasis(text);
        let mut sum: f64 = sentiments.iter().sum();
        if sum > 0.0 {
            sum += punctuation;
        } else if sum < 0.0 {
            sum -= punctuation;
        }
        let compound = normalize(sum);

        let (mut pos_sum, mut neg_sum, mut neutral_count) = (0.0_f64, 0.0_f64, 0.0_f64);
        for s in &sentiments {
            if *s > 0.0 {
                pos_sum += s + 1.0;
            } else if *s < 0.0 {
                neg_sum += s - 1.0;
            } else {
                neutral_count += 1.0;
            }
        }
        if pos_sum > neg_sum.abs() {
            pos_sum += punctuation;
        } else if pos_sum < neg_sum.abs() {
            neg_sum -= punctuation;
        }

        let total = pos_sum + neg_sum.abs() + neutral_count;
        if total == 0.0 {
            return PolarityScores::default();
        }

        PolarityScores {
            positive: round4((pos_sum / total).abs()),
            neutral: round4((neutral_count / total).abs()),
            negative: round4((neg_sum / total).abs()),
            compound: round4(compound),
        }
    }

    fn adjust_valence(
        &self,
        mut valence: f64,
        index: usize,
        tokens: &[&str],
        lowered: &[String],
        caps_differential: bool,
    ) -> f64 {
        if caps_differential && is_all_caps(tokens[index]) {
            valence += CAPS_INCREMENT * valence.signum();
        }

        for distance in 1..=LOOKBACK {
            if index < distance {
                break;
            }
            let previous = lowered[index - distance].as_str();

            if let Some(scalar) = self.boosters.get(previous) {
                let mut boost = scalar * valence.signum();
                if caps_differential && is_all_caps(tokens[index - distance]) {
                    boost += CAPS_INCREMENT * valence.signum();
                }
                // boosters further away contribute less
                boost *= match distance {
                    1 => 1.0,
                    2 => 0.95,
                    _ => 0.9,
                };
                valence += boost;
            }

            if self.is_negation(previous) {
                valence *= NEGATION_SCALAR;
                break;
            }
        }

        valence
    }

    fn is_negation(&self, word: &str) -> bool {
        self.negations.contains(word) || word.ends_with("n't")
    }
}

impl Default for LexiconSentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Detector for LexiconSentimentScorer {
    type Output = SentimentResult;

    async fn detect(&self, text: &str) -> SentimentResult {
        self.score(text)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tier(&self) -> DetectorTier {
        DetectorTier::A
    }
}

/// Split on whitespace and strip surrounding punctuation. Inner apostrophes stay.
fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|t| t.trim_matches(|c: char| c.is_ascii_punctuation() && c != '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Lower-case and fold the apostrophe out of contractions ("don't" → "dont")
/// except for the "n't" suffix check, which keeps the original form.
fn normalize_token(token: &str) -> String {
    let lower = token.to_lowercase();
    if lower.ends_with("n't") {
        lower
    } else {
        lower.replace('\'', "")
    }
}

fn is_all_caps(token: &str) -> bool {
    token.chars().any(|c| c.is_alphabetic()) && !token.chars().any(|c| c.is_lowercase())
}

/// True when some but not all tokens are ALL CAPS
fn has_caps_differential(tokens: &[&str]) -> bool {
    let caps = tokens.iter().filter(|t| is_all_caps(t)).count();
    caps > 0 && caps < tokens.len()
}

/// Down-weight sentiment before "but" and amplify sentiment after it
fn apply_but_shift(lowered: &[String], sentiments: &mut [f64]) {
    if let Some(but_index) = lowered.iter().position(|w| w == "but") {
        for (i, s) in sentiments.iter_mut().enumerate() {
            if i < but_index {
                *s *= 0.5;
            } else if i > but_index {
                *s *= 1.5;
            }
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64 * 0.292;
    let questions = match text.matches('?').count() {
        0 | 1 => 0.0,
        n if n <= 3 => n as f64 * 0.18,
        _ => 0.96,
    };
    exclamations + questions
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use commentscope_core::SentimentLabel;

    #[test]
    fn test_negative_service_complaint() {
        let scorer = LexiconSentimentScorer::new();
        let result = scorer.score("The service at the dealership was terrible and unprofessional");
        assert_eq!(result.label, SentimentLabel::Negative);
        assert!(result.score <= -0.05);
    }

    #[test]
    fn test_positive_praise() {
        let scorer = LexiconSentimentScorer::new();
        let result = scorer.score("I absolutely love my Nexon EV! Amazing features and performance");
        assert_eq!(result.label, SentimentLabel::Positive);
        assert!(result.score > 0.5);
    }

    #[test]
    fn test_empty_text_is_neutral() {
        let scorer = LexiconSentimentScorer::new();
        let result = scorer.score("");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_negation_flips_polarity() {
        let scorer = LexiconSentimentScorer::new();
        let plain = scorer.polarity_scores("The mileage is good");
        let negated = scorer.polarity_scores("The mileage is not good");
        assert!(plain.compound > 0.0);
        assert!(negated.compound < 0.0);
    }

    #[test]
    fn test_no_negates_following_word() {
        let scorer = LexiconSentimentScorer::new();
        let scores = scorer.polarity_scores("I wish it had no issues");
        assert!(scores.compound > 0.0);
        assert_eq!(scorer.score("Honestly no problem at all").label, SentimentLabel::Positive);

        // On its own "no" still reads negative
        assert!(scorer.polarity_scores("No.").compound < 0.0);
    }

    #[test]
    fn test_booster_increases_intensity() {
        let scorer = LexiconSentimentScorer::new();
        let plain = scorer.polarity_scores("The staff were helpful");
        let boosted = scorer.polarity_scores("The staff were very helpful");
        assert!(boosted.compound > plain.compound);
    }

    #[test]
    fn test_but_shifts_weight_to_second_clause() {
        let scorer = LexiconSentimentScorer::new();
        let scores = scorer.polarity_scores("The design is good but the service is terrible");
        assert!(scores.compound < 0.0);
    }

    #[test]
    fn test_exclamation_emphasis() {
        let scorer = LexiconSentimentScorer::new();
        let calm = scorer.polarity_scores("Great car");
        let excited = scorer.polarity_scores("Great car!!!");
        assert!(excited.compound > calm.compound);
    }

    #[test]
    fn test_proportions_sum_to_one() {
        let scorer = LexiconSentimentScorer::new();
        let s = scorer.polarity_scores("Good engine, poor brakes and an average dashboard");
        let total = s.positive + s.neutral + s.negative;
        assert!((total - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_detector_trait() {
        let scorer = LexiconSentimentScorer::new();
        let result = scorer.detect("Excellent").await;
        assert_eq!(result.label, SentimentLabel::Positive);
        assert_eq!(scorer.tier(), DetectorTier::A);
    }
}
