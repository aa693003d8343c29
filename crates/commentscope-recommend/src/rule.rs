//! Recommendation rule table

use commentscope_core::{Aspect, Category, Error, Priority, Recommendation, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Composite key of the rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleKey {
    pub category: Category,
    pub aspect: Aspect,
}

impl RuleKey {
    pub fn new(category: Category, aspect: Aspect) -> Self {
        Self { category, aspect }
    }
}

/// Canned recommendation for one (category, aspect) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRule {
    pub insight: String,
    pub strategy: String,
    pub action: String,
    pub priority: Priority,
}

impl RecommendationRule {
    fn new(insight: &str, strategy: &str, action: &str, priority: Priority) -> Self {
        Self {
            insight: insight.to_string(),
            strategy: strategy.to_string(),
            action: action.to_string(),
            priority,
        }
    }

    /// The rule as a recommendation, without consensus or location context
    pub fn to_recommendation(&self) -> Recommendation {
        Recommendation {
            insight: self.insight.clone(),
            strategy: self.strategy.clone(),
            action: self.action.clone(),
            priority: self.priority,
            sentiment_consensus: None,
            location_context: None,
        }
    }
}

/// Rule file entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    pub category: Category,
    pub aspect: Aspect,
    #[serde(flatten)]
    pub rule: RecommendationRule,
}

/// Rule file document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleFile {
    pub rules: Vec<RuleSpec>,
}

/// Immutable mapping from (category, aspect) to a rule
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<RuleKey, RecommendationRule>,
}

impl RuleTable {
    /// The built-in table
    pub fn builtin() -> Self {
        use Aspect as A;
        use Category as C;
        use Priority::{High, Low, Medium};

        let entries = [
            (C::Complaint, A::Service, RecommendationRule::new(
                "Customers are reporting negative experiences with dealership service.",
                "Service Excellence Initiative",
                "Immediately review service center protocols and staff training programs.",
                High,
            )),
            (C::Praise, A::Features, RecommendationRule::new(
                "Customers highly appreciate current feature offerings.",
                "Feature Leadership Amplification",
                "Leverage positive feedback in marketing campaigns and product showcases.",
                Medium,
            )),
            (C::Complaint, A::Price, RecommendationRule::new(
                "Customers expressing concerns about pricing and value proposition.",
                "Value Communication Strategy",
                "Review pricing structure and enhance value messaging in communications.",
                High,
            )),
            (C::Praise, A::Performance, RecommendationRule::new(
                "Customers are satisfied with vehicle performance characteristics.",
                "Performance Excellence Showcase",
                "Highlight performance strengths in product communications and testimonials.",
                Medium,
            )),
            (C::Inquiry, A::Features, RecommendationRule::new(
                "Customers seeking more information about available features.",
                "Feature Education Campaign",
                "Develop comprehensive feature guides and interactive demonstrations.",
                Low,
            )),
            (C::Complaint, A::BuildQuality, RecommendationRule::new(
                "Customers reporting quality issues with vehicles.",
                "Quality Assurance Enhancement",
                "Investigate quality control processes and implement corrective measures.",
                High,
            )),
            (C::Praise, A::Design, RecommendationRule::new(
                "Customers are praising vehicle design and aesthetics.",
                "Design Excellence Promotion",
                "Feature design highlights in marketing materials and showrooms.",
                Medium,
            )),
            (C::Suggestion, A::Features, RecommendationRule::new(
                "Customers requesting advanced technology features.",
                "Innovation Roadmap Development",
                "Evaluate feasibility of requested tech features for future models.",
                Medium,
            )),
            (C::Complaint, A::Comfort, RecommendationRule::new(
                "Customers reporting comfort-related issues.",
                "Comfort Enhancement Initiative",
                "Review seat design and cabin ergonomics for improvements.",
                Medium,
            )),
            (C::CompetitiveComparison, A::Features, RecommendationRule::new(
                "Customers comparing features with competitor vehicles.",
                "Competitive Differentiation",
                "Analyze competitor features and strengthen unique value propositions.",
                Medium,
            )),
            (C::Inquiry, A::Price, RecommendationRule::new(
                "Customers inquiring about pricing and financing options.",
                "Pricing Transparency Initiative",
                "Improve pricing communication and financing option visibility.",
                Low,
            )),
            (C::Suggestion, A::Design, RecommendationRule::new(
                "Customers suggesting design improvements or modifications.",
                "Customer-Centric Design Evolution",
                "Document design suggestions for consideration in future model updates.",
                Low,
            )),
            (C::Complaint, A::Features, RecommendationRule::new(
                "Customers reporting issues with technology features.",
                "Technology Enhancement Program",
                "Review and upgrade software/hardware systems based on feedback.",
                High,
            )),
            (C::Praise, A::Service, RecommendationRule::new(
                "Customers praising excellent service experiences.",
                "Service Excellence Recognition",
                "Recognize outstanding service teams and replicate best practices.",
                Low,
            )),
        ];

        Self {
            rules: entries
                .into_iter()
                .map(|(category, aspect, rule)| (RuleKey::new(category, aspect), rule))
                .collect(),
        }
    }

    /// Build a table from rule entries. Duplicate keys are rejected.
    pub fn from_specs(specs: Vec<RuleSpec>) -> Result<Self> {
        let mut rules = HashMap::with_capacity(specs.len());
        for spec in specs {
            let key = RuleKey::new(spec.category, spec.aspect);
            if rules.insert(key, spec.rule).is_some() {
                return Err(Error::config(format!(
                    "duplicate rule for ({}, {})",
                    spec.category, spec.aspect
                )));
            }
        }
        Ok(Self { rules })
    }

    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: RuleFile = serde_yaml::from_str(yaml)?;
        Self::from_specs(file.rules)
    }

    /// Load from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read rules {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    pub fn get(&self, category: Category, aspect: Aspect) -> Option<&RecommendationRule> {
        self.rules.get(&RuleKey::new(category, aspect))
    }

    /// First rule matching `category` with any aspect, in the order given
    pub fn first_match(&self, category: Category, aspects: &[Aspect]) -> Option<&RecommendationRule> {
        aspects.iter().find_map(|aspect| self.get(category, *aspect))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let table = RuleTable::builtin();
        assert_eq!(table.len(), 14);

        let rule = table.get(Category::Complaint, Aspect::Service).unwrap();
        assert_eq!(rule.strategy, "Service Excellence Initiative");
        assert_eq!(rule.priority, Priority::High);
        assert!(table.get(Category::GeneralFeedback, Aspect::Service).is_none());
    }

    #[test]
    fn test_first_match_follows_aspect_order() {
        let table = RuleTable::builtin();
        let rule = table
            .first_match(Category::Praise, &[Aspect::Ev, Aspect::Features, Aspect::Performance])
            .unwrap();
        assert_eq!(rule.strategy, "Feature Leadership Amplification");
        assert!(table.first_match(Category::Praise, &[Aspect::Ev]).is_none());
        assert!(table.first_match(Category::Praise, &[]).is_none());
    }

    #[test]
    fn test_rules_from_yaml() {
        let yaml = r#"
rules:
  - category: Complaint / Criticism
    aspect: EV
    insight: Charging complaints are rising.
    strategy: Charging Network Push
    action: Partner with charge-point operators.
    priority: High
  - category: Praise / Satisfaction
    aspect: Sound System
    insight: Customers like the audio.
    strategy: Audio Showcase
    action: Feature the speakers in showroom demos.
    priority: Low
"#;
        let table = RuleTable::from_yaml(yaml).unwrap();
        assert_eq!(table.len(), 2);
        let rule = table.get(Category::Complaint, Aspect::Ev).unwrap();
        assert_eq!(rule.strategy, "Charging Network Push");
        assert_eq!(rule.priority, Priority::High);
    }

    #[test]
    fn test_duplicate_rules_rejected() {
        let yaml = r#"
rules:
  - {category: Praise / Satisfaction, aspect: Design, insight: a, strategy: b, action: c, priority: Low}
  - {category: Praise / Satisfaction, aspect: Design, insight: d, strategy: e, action: f, priority: High}
"#;
        assert!(RuleTable::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let yaml = r#"
rules:
  - {category: Rant, aspect: Design, insight: a, strategy: b, action: c, priority: Low}
"#;
        assert!(RuleTable::from_yaml(yaml).is_err());
    }
}
