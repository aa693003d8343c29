//! Engine properties over generated inputs

use commentscope_core::{Aspect, Category, LocationInfo, Region, SentimentLabel, SentimentResult};
use commentscope_recommend::{RecommendationEngine, RuleTable};
use proptest::prelude::*;
use std::io::Write;

fn aspects_strategy() -> impl Strategy<Value = Vec<Aspect>> {
    prop::sample::subsequence(Aspect::ALL.to_vec(), 0..=Aspect::ALL.len())
}

fn label_strategy() -> impl Strategy<Value = SentimentLabel> {
    prop::sample::select(vec![
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ])
}

fn sentiment(label: SentimentLabel) -> SentimentResult {
    SentimentResult::learned(label, 0.8, label.as_str())
}

proptest! {
    #[test]
    fn first_matching_rule_is_returned_verbatim(
        category in prop::sample::select(Category::ALL.to_vec()),
        aspects in aspects_strategy(),
        learned in label_strategy(),
        lexicon in label_strategy(),
    ) {
        let table = RuleTable::builtin();
        let engine = RecommendationEngine::new(table.clone());
        let rec = engine.recommend(
            category,
            &aspects,
            &LocationInfo::empty(),
            &sentiment(learned),
            &sentiment(lexicon),
        );

        match aspects.iter().find_map(|a| table.get(category, *a)) {
            Some(rule) => prop_assert_eq!(rec, rule.to_recommendation()),
            None => prop_assert!(rec.sentiment_consensus.is_some()),
        }
    }

    #[test]
    fn no_location_matches_base_path(
        category in prop::sample::select(Category::ALL.to_vec()),
        aspects in aspects_strategy(),
        learned in label_strategy(),
    ) {
        let engine = RecommendationEngine::default();
        let learned = sentiment(learned);
        let lexicon = sentiment(SentimentLabel::Neutral);

        let rec = engine.recommend(category, &aspects, &LocationInfo::empty(), &learned, &lexicon);
        let (base, _) = engine.base_recommendation(category, &aspects, &learned, &lexicon);
        prop_assert_eq!(&rec, &base);

        let json = serde_json::to_value(&rec).unwrap();
        prop_assert!(json.get("location_context").is_none());
    }

    #[test]
    fn location_preserves_strategy_and_priority(
        category in prop::sample::select(Category::ALL.to_vec()),
        aspects in aspects_strategy(),
    ) {
        let engine = RecommendationEngine::default();
        let learned = sentiment(SentimentLabel::Neutral);
        let location = LocationInfo {
            cities: vec!["Pune".to_string()],
            states: vec!["Maharashtra".to_string()],
            regions: vec![Region::West],
            has_location: true,
        };

        let rec = engine.recommend(category, &aspects, &location, &learned, &learned);
        let (base, _) = engine.base_recommendation(category, &aspects, &learned, &learned);
        prop_assert_eq!(&rec.strategy, &base.strategy);
        prop_assert_eq!(rec.priority, base.priority);
        prop_assert!(rec.action.starts_with(&base.action));
        prop_assert!(rec.action.contains("Strengthen Pune tier-2 market presence"));
    }
}

#[test]
fn custom_rule_file_replaces_builtin_table() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"rules:
  - category: Praise / Satisfaction
    aspect: Fuel Efficiency
    insight: Owners value fuel efficiency.
    strategy: Efficiency Messaging
    action: Put mileage figures in every campaign.
    priority: Medium"#
    )
    .unwrap();

    let table = RuleTable::from_file(file.path()).unwrap();
    assert_eq!(table.len(), 1);

    let engine = RecommendationEngine::new(table);
    let positive = sentiment(SentimentLabel::Positive);

    let rec = engine.recommend(
        Category::Praise,
        &[Aspect::Features, Aspect::FuelEfficiency],
        &LocationInfo::empty(),
        &positive,
        &positive,
    );
    assert_eq!(rec.strategy, "Efficiency Messaging");

    // The built-in (Praise, Features) rule is gone, so the tree answers
    let rec = engine.recommend(
        Category::Praise,
        &[Aspect::Features],
        &LocationInfo::empty(),
        &positive,
        &positive,
    );
    assert_eq!(rec.strategy, "Feature Leadership Amplification");
    assert!(rec.sentiment_consensus.is_some());
}

#[test]
fn missing_rule_file_is_config_error() {
    let err = RuleTable::from_file("/nonexistent/rules.yaml").unwrap_err();
    assert!(matches!(err, commentscope_core::Error::Config(_)));
}
