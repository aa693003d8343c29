//! Core types for CommentScope

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Lower-cases a label and drops whitespace so "Complaint/Criticism" and
/// "complaint /  criticism" compare equal.
fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Intent category of a comment. Exactly one per comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Complaint,
    Praise,
    Suggestion,
    PurchaseIntent,
    Inquiry,
    CompetitiveComparison,
    GeneralFeedback,
}

impl Category {
    /// All categories in declaration order
    pub const ALL: [Category; 7] = [
        Category::Complaint,
        Category::Praise,
        Category::Suggestion,
        Category::PurchaseIntent,
        Category::Inquiry,
        Category::CompetitiveComparison,
        Category::GeneralFeedback,
    ];

    /// Display label as it appears in datasets and responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complaint => "Complaint / Criticism",
            Self::Praise => "Praise / Satisfaction",
            Self::Suggestion => "Suggestion / Feature Request",
            Self::PurchaseIntent => "Purchase Intent / Inquiry",
            Self::Inquiry => "Inquiry / Question",
            Self::CompetitiveComparison => "Competitive Comparison",
            Self::GeneralFeedback => "General Feedback",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Self::ALL
            .into_iter()
            .find(|c| normalize_label(c.as_str()) == wanted)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Business aspect taxonomy. Declaration order is the output order of
/// aspect tagging and the lookup order of the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Aspect {
    Service,
    Features,
    Ev,
    Price,
    BuildQuality,
    Performance,
    Design,
    FuelEfficiency,
    SoundSystem,
    Comfort,
}

impl Aspect {
    /// All aspects in taxonomy order
    pub const ALL: [Aspect; 10] = [
        Aspect::Service,
        Aspect::Features,
        Aspect::Ev,
        Aspect::Price,
        Aspect::BuildQuality,
        Aspect::Performance,
        Aspect::Design,
        Aspect::FuelEfficiency,
        Aspect::SoundSystem,
        Aspect::Comfort,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "Service",
            Self::Features => "Features",
            Self::Ev => "EV",
            Self::Price => "Price",
            Self::BuildQuality => "Build Quality",
            Self::Performance => "Performance",
            Self::Design => "Design",
            Self::FuelEfficiency => "Fuel Efficiency",
            Self::SoundSystem => "Sound System",
            Self::Comfort => "Comfort",
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aspect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Self::ALL
            .into_iter()
            .find(|a| normalize_label(a.as_str()) == wanted)
            .ok_or_else(|| format!("unknown aspect '{s}'"))
    }
}

impl Serialize for Aspect {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Aspect {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Three-way sentiment label shared by both sentiment components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Compound score threshold for a positive/negative decision
    pub const COMPOUND_THRESHOLD: f64 = 0.05;

    /// Map a lexicon compound score onto a label
    pub fn from_compound(compound: f64) -> Self {
        if compound >= Self::COMPOUND_THRESHOLD {
            Self::Positive
        } else if compound <= -Self::COMPOUND_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which component produced a sentiment result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentSource {
    Learned,
    Lexicon,
}

/// Proportions of positive, neutral and negative signal plus the compound score
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolarityScores {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
    pub compound: f64,
}

/// Output of one sentiment component.
///
/// `score` is a confidence in `[0, 1]` for learned results and the compound
/// polarity in `[-1, 1]` for lexicon results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub source: SentimentSource,
    pub label: SentimentLabel,
    pub score: f64,

    /// Lexicon proportion breakdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<PolarityScores>,

    /// Label exactly as the underlying model emitted it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_label: Option<String>,

    /// Set when the result is a degraded fallback rather than a real prediction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SentimentResult {
    /// A prediction from the learned model
    pub fn learned(label: SentimentLabel, confidence: f64, raw_label: impl Into<String>) -> Self {
        Self {
            source: SentimentSource::Learned,
            label,
            score: round4(confidence.clamp(0.0, 1.0)),
            scores: None,
            raw_label: Some(raw_label.into()),
            error: None,
        }
    }

    /// The neutral sentinel returned when the learned model is unavailable or failed
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            source: SentimentSource::Learned,
            label: SentimentLabel::Neutral,
            score: 0.0,
            scores: None,
            raw_label: None,
            error: Some(reason.into()),
        }
    }

    /// A lexicon score
    pub fn lexicon(scores: PolarityScores) -> Self {
        Self {
            source: SentimentSource::Lexicon,
            label: SentimentLabel::from_compound(scores.compound),
            score: scores.compound,
            scores: Some(scores),
            raw_label: None,
            error: None,
        }
    }

    /// Whether this result is a fallback sentinel
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Round to four decimal places, the precision used in all responses
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Geographic macro-region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    North,
    South,
    West,
    East,
    Central,
    Northeast,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::North,
        Region::South,
        Region::West,
        Region::East,
        Region::Central,
        Region::Northeast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "North",
            Self::South => "South",
            Self::West => "West",
            Self::East => "East",
            Self::Central => "Central",
            Self::Northeast => "Northeast",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locations detected in a comment
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocationInfo {
    /// Matched cities in gazetteer order
    pub cities: Vec<String>,

    /// Matched states in gazetteer order
    pub states: Vec<String>,

    /// Derived regions, first derivation first, no duplicates
    pub regions: Vec<Region>,

    pub has_location: bool,
}

impl LocationInfo {
    /// No location detected
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn primary_city(&self) -> Option<&str> {
        self.cities.first().map(String::as_str)
    }

    pub fn primary_region(&self) -> Option<Region> {
        self.regions.first().copied()
    }
}

/// Recommendation priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        f.write_str(s)
    }
}

/// Binary market classification attached to location-aware recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketType {
    Metro,
    Regional,
}

/// Geographic context attached to a recommendation when a location was found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationContext {
    pub detected_locations: LocationInfo,
    pub geographic_focus: String,
    pub market_type: MarketType,
}

/// Strategic recommendation produced for one comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub insight: String,
    pub strategy: String,
    pub action: String,
    pub priority: Priority,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_consensus: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_context: Option<LocationContext>,
}
