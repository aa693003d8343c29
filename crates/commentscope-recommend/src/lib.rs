//! CommentScope Recommendation Engine
//!
//! Turns an analyzed comment into a strategic recommendation.
//!
//! Resolution order:
//! - Rule table keyed by (category, aspect), first aspect in taxonomy order wins
//! - Sentiment-aware decision tree, then a generic default
//! - Location augmentation when the comment names a city or state
//!
//! The rule table is built in and may be replaced from YAML at startup.

pub mod consensus;
pub mod engine;
pub mod location;
pub mod rule;

pub use consensus::SentimentConsensus;
pub use engine::{RecommendationEngine, RecommendationOrigin};
pub use location::{augment, geographic_focus, CityTier, METRO_CITIES, TIER2_CITIES};
pub use rule::{RecommendationRule, RuleFile, RuleKey, RuleSpec, RuleTable};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::engine::RecommendationEngine;
    pub use crate::location::CityTier;
    pub use crate::rule::{RecommendationRule, RuleTable};
}
