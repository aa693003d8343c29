//! Recommendation engine
//!
//! Combines the rule table, a sentiment-aware decision tree and location
//! augmentation into one recommendation per comment. Never fails.

use crate::consensus::SentimentConsensus;
use crate::location;
use crate::rule::RuleTable;
use commentscope_core::{
    Aspect, Category, LocationInfo, Priority, Recommendation, SentimentLabel, SentimentResult,
};
use tracing::debug;

/// Where a recommendation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationOrigin {
    Rule,
    DecisionTree,
    Default,
}

/// Engine over an immutable rule table
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    rules: RuleTable,
}

impl RecommendationEngine {
    pub fn new(rules: RuleTable) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Produce the recommendation for one analyzed comment.
    ///
    /// `aspects` must be in taxonomy order, as returned by the aspect tagger.
    pub fn recommend(
        &self,
        category: Category,
        aspects: &[Aspect],
        location: &LocationInfo,
        learned: &SentimentResult,
        lexicon: &SentimentResult,
    ) -> Recommendation {
        let (base, origin) = self.base_recommendation(category, aspects, learned, lexicon);
        debug!(
            category = %category,
            strategy = %base.strategy,
            ?origin,
            has_location = location.has_location,
            "Recommendation selected"
        );
        location::augment(base, location)
    }

    /// Rule lookup then decision tree, without location context
    pub fn base_recommendation(
        &self,
        category: Category,
        aspects: &[Aspect],
        learned: &SentimentResult,
        lexicon: &SentimentResult,
    ) -> (Recommendation, RecommendationOrigin) {
        if let Some(rule) = self.rules.first_match(category, aspects) {
            return (rule.to_recommendation(), RecommendationOrigin::Rule);
        }

        let consensus = SentimentConsensus::from_results(learned, lexicon);
        match decision_tree(category, aspects, consensus.learned) {
            Some(branch) => (branch.with_consensus(&consensus), RecommendationOrigin::DecisionTree),
            None => (default_recommendation(category, &consensus), RecommendationOrigin::Default),
        }
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(RuleTable::builtin())
    }
}

struct Branch {
    insight: &'static str,
    strategy: &'static str,
    action: &'static str,
    priority: Priority,
}

impl Branch {
    fn with_consensus(&self, consensus: &SentimentConsensus) -> Recommendation {
        Recommendation {
            insight: self.insight.to_string(),
            strategy: self.strategy.to_string(),
            action: self.action.to_string(),
            priority: self.priority,
            sentiment_consensus: Some(consensus.to_string()),
            location_context: None,
        }
    }
}

const SERVICE_EXCELLENCE: Branch = Branch {
    insight: "Customers are reporting negative experiences with dealership service and after-sales support.",
    strategy: "Service Excellence Initiative",
    action: "Immediately review service center protocols, conduct staff retraining, and implement customer feedback loop.",
    priority: Priority::High,
};

const EV_EXPERIENCE: Branch = Branch {
    insight: "Customers facing challenges with EV-related features, charging, or range anxiety.",
    strategy: "EV Experience Enhancement",
    action: "Investigate EV-specific issues, improve charging infrastructure partnerships, and enhance customer education.",
    priority: Priority::High,
};

const QUALITY_OVERHAUL: Branch = Branch {
    insight: "Customers expressing dissatisfaction with build quality and materials used.",
    strategy: "Quality Assurance Overhaul",
    action: "Escalate to manufacturing team for comprehensive quality audit and supplier assessment.",
    priority: Priority::High,
};

const FEATURE_LEADERSHIP: Branch = Branch {
    insight: "Customers highly appreciate current feature offerings and technological innovations.",
    strategy: "Feature Leadership Amplification",
    action: "Leverage positive feedback in marketing campaigns and accelerate similar feature development.",
    priority: Priority::Medium,
};

const SERVICE_REPLICATION: Branch = Branch {
    insight: "Customers satisfied with service quality at specific touchpoints.",
    strategy: "Service Excellence Replication",
    action: "Document and replicate successful service practices across all dealership networks.",
    priority: Priority::Medium,
};

const CUSTOMER_INNOVATION: Branch = Branch {
    insight: "Customers actively suggesting new features and improvements.",
    strategy: "Customer-Driven Innovation",
    action: "Prioritize suggested features in product roadmap and establish customer co-creation program.",
    priority: Priority::Medium,
};

const SALES_CONVERSION: Branch = Branch {
    insight: "Customer showing interest in purchase and seeking detailed information.",
    strategy: "Sales Conversion Optimization",
    action: "Ensure sales team follows up promptly with comprehensive product information and test drive offers.",
    priority: Priority::High,
};

const COMPETITIVE_POSITIONING: Branch = Branch {
    insight: "Customer comparing Tata Motors products with competitors.",
    strategy: "Competitive Positioning",
    action: "Analyze competitor advantages mentioned and strengthen unique value propositions in marketing.",
    priority: Priority::Medium,
};

/// First matching branch wins. A branch whose aspects are all absent yields
/// `None` rather than trying later branches.
fn decision_tree(category: Category, aspects: &[Aspect], learned: SentimentLabel) -> Option<&'static Branch> {
    let has = |aspect: Aspect| aspects.contains(&aspect);

    if category == Category::Complaint || learned == SentimentLabel::Negative {
        if has(Aspect::Service) {
            Some(&SERVICE_EXCELLENCE)
        } else if has(Aspect::Ev) {
            Some(&EV_EXPERIENCE)
        } else if has(Aspect::BuildQuality) {
            Some(&QUALITY_OVERHAUL)
        } else {
            None
        }
    } else if category == Category::Praise || learned == SentimentLabel::Positive {
        if has(Aspect::Features) {
            Some(&FEATURE_LEADERSHIP)
        } else if has(Aspect::Service) {
            Some(&SERVICE_REPLICATION)
        } else {
            None
        }
    } else if category == Category::Suggestion {
        has(Aspect::Features).then_some(&CUSTOMER_INNOVATION)
    } else if category == Category::PurchaseIntent {
        Some(&SALES_CONVERSION)
    } else if category == Category::CompetitiveComparison {
        Some(&COMPETITIVE_POSITIONING)
    } else {
        None
    }
}

fn default_recommendation(category: Category, consensus: &SentimentConsensus) -> Recommendation {
    Recommendation {
        insight: "General customer feedback received requiring attention and follow-up.".to_string(),
        strategy: "Customer Relationship Management".to_string(),
        action: "Follow up with customer to gather more specific feedback and ensure satisfaction."
            .to_string(),
        priority: consensus.baseline_priority(category),
        sentiment_consensus: Some(consensus.to_string()),
        location_context: None,
    }
}
