//! End-to-end analysis scenarios

use commentscope_analyzer::{AnalysisConfig, AnalysisContext, Analyzer, FallbackKind};
use commentscope_classifiers::{
    CategorySource, LabeledExample, LearnedSentimentClassifier, SentimentModel,
    SentimentPrediction, MODEL_UNAVAILABLE,
};
use commentscope_core::{Aspect, Category, Error, MarketType, Priority, Result, SentimentLabel};
use std::sync::Arc;
use std::time::Duration;

/// Labels by keyword so tests can steer the learned sentiment
struct KeywordModel;

impl SentimentModel for KeywordModel {
    fn predict(&self, text: &str) -> Result<SentimentPrediction> {
        let lower = text.to_lowercase();
        let label = if lower.contains("terrible") || lower.contains("rude") {
            "negative"
        } else if lower.contains("love") || lower.contains("excellent") {
            "positive"
        } else {
            "neutral"
        };
        Ok(SentimentPrediction {
            label: label.to_string(),
            score: 0.93,
        })
    }

    fn name(&self) -> &str {
        "keyword-model"
    }
}

fn analyzer_with(dataset: Vec<LabeledExample>, learned: LearnedSentimentClassifier) -> Analyzer {
    let context = AnalysisContext::with_learned(AnalysisConfig::default(), dataset, learned).unwrap();
    Analyzer::new(Arc::new(context))
}

/// No intent model and no learned model
fn fallback_analyzer() -> Analyzer {
    analyzer_with(Vec::new(), LearnedSentimentClassifier::unavailable())
}

fn keyword_learned() -> LearnedSentimentClassifier {
    LearnedSentimentClassifier::new(Arc::new(KeywordModel), Duration::from_secs(2), 32)
}

#[tokio::test]
async fn dealership_complaint_gets_service_rule() {
    let analyzer = fallback_analyzer();
    let analysis = analyzer
        .analyze("The service at the dealership was terrible and unprofessional")
        .await
        .unwrap();

    assert_eq!(analysis.category, Category::Complaint);
    assert_eq!(analysis.category_source, CategorySource::Fallback);
    assert_eq!(analysis.aspects, [Aspect::Service]);
    assert!(!analysis.location.has_location);
    assert_eq!(analysis.sentiment.lexicon.label, SentimentLabel::Negative);
    assert_eq!(analysis.sentiment.learned.error.as_deref(), Some(MODEL_UNAVAILABLE));

    let rec = &analysis.recommendation;
    assert_eq!(rec.strategy, "Service Excellence Initiative");
    assert_eq!(rec.priority, Priority::High);
    assert!(rec.location_context.is_none());
}

#[tokio::test]
async fn nexon_ev_praise_gets_feature_rule() {
    let analyzer = fallback_analyzer();
    let analysis = analyzer
        .analyze("I absolutely love my Nexon EV! Amazing features and performance")
        .await
        .unwrap();

    assert_eq!(analysis.category, Category::Praise);
    assert_eq!(
        analysis.aspects,
        [Aspect::Features, Aspect::Ev, Aspect::Performance]
    );
    assert_eq!(analysis.sentiment.lexicon.label, SentimentLabel::Positive);
    assert_eq!(analysis.recommendation.strategy, "Feature Leadership Amplification");
}

#[tokio::test]
async fn mumbai_praise_gets_metro_clause() {
    let analyzer = fallback_analyzer();
    let analysis = analyzer
        .analyze("Mumbai service center staff were excellent")
        .await
        .unwrap();

    assert_eq!(analysis.location.cities, ["Mumbai"]);
    let rec = &analysis.recommendation;
    assert_eq!(rec.strategy, "Service Excellence Recognition");
    assert!(rec.insight.starts_with("Feedback from Mumbai market indicates "));
    assert!(rec.action.contains("Prioritize Mumbai metro market initiatives"));

    let context = rec.location_context.as_ref().unwrap();
    assert_eq!(context.geographic_focus, "Mumbai");
    assert_eq!(context.market_type, MarketType::Metro);
}

#[tokio::test]
async fn general_feedback_without_aspects_uses_default() {
    let analyzer = fallback_analyzer();
    let analysis = analyzer.analyze("Got it yesterday.").await.unwrap();

    assert_eq!(analysis.category, Category::GeneralFeedback);
    assert!(analysis.aspects.is_empty());

    let rec = &analysis.recommendation;
    assert_eq!(rec.strategy, "Customer Relationship Management");
    assert_eq!(rec.priority, Priority::Low);
    assert_eq!(
        rec.sentiment_consensus.as_deref(),
        Some("learned: neutral, lexicon: neutral")
    );
}

#[tokio::test]
async fn agreeing_negative_sentiment_raises_default_priority() {
    let analyzer = analyzer_with(Vec::new(), keyword_learned());
    let analysis = analyzer.analyze("Honestly a terrible week.").await.unwrap();

    assert_eq!(analysis.sentiment.learned.label, SentimentLabel::Negative);
    assert_eq!(analysis.sentiment.lexicon.label, SentimentLabel::Negative);
    // complaint keyword, no aspect, so the negative branch has nothing to offer
    assert_eq!(analysis.category, Category::Complaint);
    assert_eq!(analysis.recommendation.strategy, "Customer Relationship Management");
    assert_eq!(analysis.recommendation.priority, Priority::High);
}

#[tokio::test]
async fn blank_text_is_rejected() {
    let analyzer = fallback_analyzer();
    for text in ["", "   ", "\n\t"] {
        let err = analyzer.analyze(text).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}

#[tokio::test]
async fn input_text_is_trimmed() {
    let analyzer = fallback_analyzer();
    let analysis = analyzer.analyze("  Great car  ").await.unwrap();
    assert_eq!(analysis.input_text, "Great car");
}

#[tokio::test]
async fn no_location_serializes_without_context_key() {
    let analyzer = fallback_analyzer();
    let analysis = analyzer.analyze("Great value for money").await.unwrap();
    let json = serde_json::to_value(&analysis).unwrap();

    assert!(json["recommendation"].get("location_context").is_none());
    assert_eq!(json["category_source"], "fallback");
    assert_eq!(json["sentiment"]["lexicon"]["source"], "lexicon");
}

#[tokio::test]
async fn trained_model_is_used_when_available() {
    let dataset = commentscope_analyzer::seed_dataset();
    let analyzer = analyzer_with(dataset, keyword_learned());

    let analysis = analyzer
        .analyze("The service at the dealership was terrible and unprofessional")
        .await
        .unwrap();
    assert_eq!(analysis.category_source, CategorySource::Model);
    assert_eq!(analysis.sentiment.learned.label, SentimentLabel::Negative);
    assert!(analysis.sentiment.learned.error.is_none());
}

#[tokio::test]
async fn seed_model_drives_the_decision_tree() {
    let analyzer = analyzer_with(commentscope_analyzer::seed_dataset(), keyword_learned());

    let analysis = analyzer.analyze("Please add a sunroof option").await.unwrap();
    assert_eq!(analysis.category, Category::Suggestion);
    assert_eq!(analysis.category_source, CategorySource::Model);
    assert_eq!(analysis.recommendation.priority, Priority::Medium);

    let analysis = analyzer.analyze("When will the new model launch?").await.unwrap();
    assert_eq!(analysis.category, Category::Inquiry);
}

#[tokio::test]
async fn batch_keeps_order_and_reports_errors_inline() {
    let analyzer = fallback_analyzer();
    let results = analyzer
        .analyze_batch(["Love it", "", "Terrible service"])
        .await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().category, Category::Praise);
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap().category, Category::Complaint);
}

#[tokio::test]
async fn fallbacks_are_counted() {
    let analyzer = fallback_analyzer();
    analyzer.analyze("Great car").await.unwrap();
    analyzer.analyze("Poor brakes").await.unwrap();

    let snapshot = analyzer.context().metrics().snapshot();
    assert_eq!(snapshot.analyses, 2);
    assert_eq!(snapshot.intent_fallbacks, 2);
    assert_eq!(snapshot.sentiment_fallbacks, 2);

    // Rejected input never reaches the detectors
    let _ = analyzer.analyze(" ").await;
    assert_eq!(analyzer.context().metrics().snapshot().analyses, 2);
    assert_eq!(FallbackKind::Intent.as_str(), "intent");
}

#[tokio::test]
async fn health_reports_component_status() {
    let analyzer = analyzer_with(commentscope_analyzer::seed_dataset(), keyword_learned());
    let health = analyzer.health();

    assert_eq!(health.status, "healthy");
    assert!(health.models.learned_loaded);
    assert_eq!(health.models.learned_model.as_deref(), Some("keyword-model"));
    assert!(health.models.intent_model_loaded);
    assert_eq!(health.models.intent_classes.len(), Category::ALL.len());
    assert_eq!(health.features.regional_analysis, "6 regions");
    assert_eq!(health.features.recommendation_rules, 14);
    assert!(health.features.location_detection.ends_with("states"));
}

#[tokio::test]
async fn location_report_over_seed_dataset() {
    let analyzer = analyzer_with(commentscope_analyzer::seed_dataset(), keyword_learned());
    let analytics = analyzer.location_analytics().await;

    assert!(analytics.total_locations >= 10);
    let mumbai = analytics.city("Mumbai").unwrap();
    assert_eq!(mumbai.total_comments, 3);
    assert_eq!(mumbai.sentiment_distribution.positive, 1);

    let kolkata = analytics.city("Kolkata").unwrap();
    assert_eq!(kolkata.sentiment_distribution.negative, 1);

    let report = commentscope_analyzer::regional_performance(&analytics);
    assert!(report.best_performing_region.is_some());
    assert_eq!(report.regional_rankings.len(), analytics.regional_analytics.len());
}

#[tokio::test]
async fn location_insights_for_text() {
    let analyzer = analyzer_with(commentscope_analyzer::seed_dataset(), keyword_learned());

    let insights = analyzer
        .location_insights("Bought mine in Kolkata last week")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(insights.detected_locations.cities, ["Kolkata"]);
    assert_eq!(insights.city_insights.len(), 1);
    assert_eq!(insights.geographic_context.regional_priority, "East - Medium Priority");

    let none = analyzer.location_insights("No place mentioned").await.unwrap();
    assert!(none.is_none());
}
