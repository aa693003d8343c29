//! Property tests for location analytics

use commentscope_analyzer::analytics::{regional_performance, LocationAnalytics, ScoredComment};
use commentscope_core::{Category, SentimentLabel};
use proptest::prelude::*;

const CITIES: &[&str] = &["Mumbai", "Pune", "Kolkata", "Chennai", "Indore", ""];

fn label() -> impl Strategy<Value = SentimentLabel> {
    prop_oneof![
        Just(SentimentLabel::Positive),
        Just(SentimentLabel::Neutral),
        Just(SentimentLabel::Negative),
    ]
}

fn comment() -> impl Strategy<Value = ScoredComment> {
    (
        "[a-z ]{1,40}",
        0..Category::ALL.len(),
        0..CITIES.len(),
        label(),
    )
        .prop_map(|(text, category, city, sentiment)| ScoredComment {
            text,
            category: Category::ALL[category],
            location: CITIES[city].to_string(),
            sentiment,
        })
}

proptest! {
    #[test]
    fn city_counts_cover_every_located_comment(comments in prop::collection::vec(comment(), 0..40)) {
        let analytics = LocationAnalytics::from_comments(&comments);
        let located = comments.iter().filter(|c| !c.location.is_empty()).count();

        let counted: usize = analytics.city_analytics.iter().map(|c| c.total_comments).sum();
        prop_assert_eq!(counted, located);

        for city in &analytics.city_analytics {
            prop_assert_eq!(city.sentiment_distribution.total(), city.total_comments);
            let by_category: usize = city.category_distribution.values().sum();
            prop_assert_eq!(by_category, city.total_comments);
            prop_assert!((0.0..=100.0).contains(&city.engagement_score));
        }
    }

    #[test]
    fn rankings_are_sorted_best_first(comments in prop::collection::vec(comment(), 1..40)) {
        let analytics = LocationAnalytics::from_comments(&comments);
        let report = regional_performance(&analytics);

        for pair in report.regional_rankings.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        prop_assert_eq!(
            report.best_performing_region,
            report.regional_rankings.first().map(|r| r.region)
        );
    }
}
