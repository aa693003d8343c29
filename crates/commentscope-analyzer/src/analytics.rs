//! Location analytics over a labeled dataset
//!
//! Everything here is a pure function of comments that already carry a
//! sentiment label, so reports are reproducible for a fixed input.

use chrono::{DateTime, Utc};
use commentscope_core::{Category, Error, LocationInfo, Region, Result, SentimentLabel};
use commentscope_recommend::CityTier;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Words that mark a comment as service-related
pub const SERVICE_KEYWORDS: &[&str] =
    &["service", "dealer", "dealership", "staff", "repair", "maintenance"];

/// Number of entries in each ranked city list
const TOP_CITIES: usize = 5;

/// A dataset comment with its location and sentiment resolved
#[derive(Debug, Clone)]
pub struct ScoredComment {
    pub text: String,
    pub category: Category,
    pub location: String,
    pub sentiment: SentimentLabel,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Comment counts per sentiment label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    pub fn add(&mut self, label: SentimentLabel) {
        *self.slot(label) += 1;
    }

    pub fn merge(&mut self, other: &SentimentCounts) {
        self.positive += other.positive;
        self.neutral += other.neutral;
        self.negative += other.negative;
    }

    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// Percentages rounded to one decimal
    pub fn percentages(&self) -> SentimentPercentages {
        let total = self.total();
        let pct = |count: usize| {
            if total == 0 {
                0.0
            } else {
                round1(count as f64 / total as f64 * 100.0)
            }
        };
        SentimentPercentages {
            positive: pct(self.positive),
            neutral: pct(self.neutral),
            negative: pct(self.negative),
        }
    }

    fn slot(&mut self, label: SentimentLabel) -> &mut usize {
        match label {
            SentimentLabel::Positive => &mut self.positive,
            SentimentLabel::Neutral => &mut self.neutral,
            SentimentLabel::Negative => &mut self.negative,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SentimentPercentages {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

/// Per-city statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityAnalytics {
    pub city: String,
    pub total_comments: usize,
    pub sentiment_distribution: SentimentCounts,
    pub sentiment_percentages: SentimentPercentages,
    pub category_distribution: BTreeMap<Category, usize>,
    pub dominant_sentiment: SentimentLabel,
    pub engagement_score: f64,
}

/// Cities grouped into a macro-region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalAnalytics {
    pub region: Region,
    pub cities: Vec<String>,
    pub total_comments: usize,
    pub avg_engagement: f64,
    pub sentiment_distribution: SentimentCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceHotspot {
    pub city: String,
    /// Percent of the city's comments mentioning service
    pub service_mention_ratio: f64,
    pub total_comments: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthMarket {
    pub city: String,
    pub positive_sentiment: f64,
    pub engagement_score: f64,
    pub comment_volume: usize,
    pub growth_potential: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeographicTrends {
    pub high_satisfaction_cities: Vec<String>,
    pub improvement_needed_cities: Vec<String>,
    pub service_hotspots: Vec<ServiceHotspot>,
    pub growth_markets: Vec<GrowthMarket>,
}

/// Dataset-wide location report
#[derive(Debug, Clone, Serialize)]
pub struct LocationAnalytics {
    pub generated_at: DateTime<Utc>,
    pub total_locations: usize,
    /// Cities in first-appearance order
    pub city_analytics: Vec<CityAnalytics>,
    pub regional_analytics: Vec<RegionalAnalytics>,
    pub geographic_trends: GeographicTrends,
}

impl LocationAnalytics {
    /// Build the report. Comments with a blank location are ignored.
    pub fn from_comments(comments: &[ScoredComment]) -> Self {
        let groups = group_by_city(comments);
        let city_analytics: Vec<CityAnalytics> = groups
            .iter()
            .map(|(city, members)| analyze_city(city, members))
            .collect();
        let regional_analytics = regional_analytics(&city_analytics);
        let geographic_trends = GeographicTrends {
            high_satisfaction_cities: city_analytics
                .iter()
                .filter(|c| c.sentiment_percentages.positive > 60.0)
                .map(|c| c.city.clone())
                .collect(),
            improvement_needed_cities: city_analytics
                .iter()
                .filter(|c| c.sentiment_percentages.negative > 40.0)
                .map(|c| c.city.clone())
                .collect(),
            service_hotspots: service_hotspots(&groups),
            growth_markets: growth_markets(&city_analytics),
        };

        Self {
            generated_at: Utc::now(),
            total_locations: city_analytics.len(),
            city_analytics,
            regional_analytics,
            geographic_trends,
        }
    }

    pub fn city(&self, name: &str) -> Option<&CityAnalytics> {
        self.city_analytics.iter().find(|c| c.city == name)
    }

    pub fn is_empty(&self) -> bool {
        self.city_analytics.is_empty()
    }
}

fn group_by_city(comments: &[ScoredComment]) -> Vec<(String, Vec<&ScoredComment>)> {
    let mut groups: Vec<(String, Vec<&ScoredComment>)> = Vec::new();
    for comment in comments {
        let city = comment.location.trim();
        if city.is_empty() {
            continue;
        }
        match groups.iter_mut().find(|(name, _)| name == city) {
            Some((_, members)) => members.push(comment),
            None => groups.push((city.to_string(), vec![comment])),
        }
    }
    groups
}

fn analyze_city(city: &str, members: &[&ScoredComment]) -> CityAnalytics {
    let mut counts = SentimentCounts::default();
    let mut first_seen: Vec<SentimentLabel> = Vec::new();
    let mut categories: BTreeMap<Category, usize> = BTreeMap::new();

    for comment in members {
        counts.add(comment.sentiment);
        if !first_seen.contains(&comment.sentiment) {
            first_seen.push(comment.sentiment);
        }
        *categories.entry(comment.category).or_default() += 1;
    }

    CityAnalytics {
        city: city.to_string(),
        total_comments: members.len(),
        sentiment_distribution: counts,
        sentiment_percentages: counts.percentages(),
        dominant_sentiment: dominant_sentiment(&counts, &first_seen),
        engagement_score: engagement_score(members),
        category_distribution: categories,
    }
}

/// Most frequent label; ties go to the label seen first
fn dominant_sentiment(counts: &SentimentCounts, first_seen: &[SentimentLabel]) -> SentimentLabel {
    let mut best: Option<(SentimentLabel, usize)> = None;
    for &label in first_seen {
        let count = counts.get(label);
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label).unwrap_or(SentimentLabel::Neutral)
}

/// Blend of average comment length and category variety, 0 to 100
pub fn engagement_score(members: &[&ScoredComment]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    let total_chars: usize = members.iter().map(|c| c.text.chars().count()).sum();
    let avg_length = total_chars as f64 / members.len() as f64;
    let variety = members
        .iter()
        .map(|c| c.category)
        .collect::<HashSet<_>>()
        .len();

    let length_score = (avg_length / 100.0).min(1.0);
    let variety_score = (variety as f64 / 5.0).min(1.0);
    round1((length_score * 0.6 + variety_score * 0.4) * 100.0)
}

/// Simplified city to region table used for dataset grouping
pub fn analytics_region(city: &str) -> Option<Region> {
    let region = match city {
        "Mumbai" | "Pune" | "Nagpur" => Region::West,
        "Delhi" | "Jaipur" | "Chandigarh" => Region::North,
        "Bangalore" | "Chennai" | "Hyderabad" => Region::South,
        "Kolkata" | "Bhubaneswar" => Region::East,
        "Indore" | "Bhopal" => Region::Central,
        "Guwahati" => Region::Northeast,
        _ => return None,
    };
    Some(region)
}

fn regional_analytics(cities: &[CityAnalytics]) -> Vec<RegionalAnalytics> {
    Region::ALL
        .into_iter()
        .filter_map(|region| {
            let members: Vec<&CityAnalytics> = cities
                .iter()
                .filter(|c| analytics_region(&c.city) == Some(region))
                .collect();
            if members.is_empty() {
                return None;
            }

            let mut sentiment = SentimentCounts::default();
            for city in &members {
                sentiment.merge(&city.sentiment_distribution);
            }
            let engagement: f64 = members.iter().map(|c| c.engagement_score).sum();

            Some(RegionalAnalytics {
                region,
                cities: members.iter().map(|c| c.city.clone()).collect(),
                total_comments: members.iter().map(|c| c.total_comments).sum(),
                avg_engagement: engagement / members.len() as f64,
                sentiment_distribution: sentiment,
            })
        })
        .collect()
}

fn mentions_service(text: &str) -> bool {
    let lower = text.to_lowercase();
    SERVICE_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn service_hotspots(groups: &[(String, Vec<&ScoredComment>)]) -> Vec<ServiceHotspot> {
    let mut hotspots: Vec<ServiceHotspot> = groups
        .iter()
        .filter_map(|(city, members)| {
            let mentions = members.iter().filter(|c| mentions_service(&c.text)).count();
            let ratio = mentions as f64 / members.len() as f64;
            (mentions > 0 && ratio > 0.3).then(|| ServiceHotspot {
                city: city.clone(),
                service_mention_ratio: round1(ratio * 100.0),
                total_comments: members.len(),
            })
        })
        .collect();
    hotspots.sort_by(|a, b| b.service_mention_ratio.total_cmp(&a.service_mention_ratio));
    hotspots
}

fn growth_markets(cities: &[CityAnalytics]) -> Vec<GrowthMarket> {
    let mut markets: Vec<GrowthMarket> = cities
        .iter()
        .filter(|c| {
            c.sentiment_percentages.positive > 50.0
                && c.engagement_score > 60.0
                && c.total_comments < 20
        })
        .map(|c| GrowthMarket {
            city: c.city.clone(),
            positive_sentiment: c.sentiment_percentages.positive,
            engagement_score: c.engagement_score,
            comment_volume: c.total_comments,
            growth_potential: "High".to_string(),
        })
        .collect();
    markets.sort_by(|a, b| b.positive_sentiment.total_cmp(&a.positive_sentiment));
    markets
}

/// A city with the value it was ranked by
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCity {
    pub city: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityTrends {
    pub city_performance: Vec<CityAnalytics>,
    pub top_positive_cities: Vec<RankedCity>,
    pub improvement_opportunities: Vec<RankedCity>,
    pub engagement_leaders: Vec<RankedCity>,
}

fn top_by(cities: &[CityAnalytics], key: impl Fn(&CityAnalytics) -> f64) -> Vec<RankedCity> {
    let mut ranked: Vec<RankedCity> = cities
        .iter()
        .map(|c| RankedCity {
            city: c.city.clone(),
            value: key(c),
        })
        .collect();
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked.truncate(TOP_CITIES);
    ranked
}

/// City trends, for one city or the `limit` busiest ones
pub fn city_trends(analytics: &LocationAnalytics, city: Option<&str>, limit: usize) -> Result<CityTrends> {
    let cities = &analytics.city_analytics;

    let city_performance = match city {
        Some(name) => vec![analytics
            .city(name)
            .cloned()
            .ok_or_else(|| Error::invalid_input(format!("City '{name}' not found in dataset")))?],
        None => {
            let mut by_volume = cities.clone();
            by_volume.sort_by(|a, b| b.total_comments.cmp(&a.total_comments));
            by_volume.truncate(limit);
            by_volume
        }
    };

    Ok(CityTrends {
        city_performance,
        top_positive_cities: top_by(cities, |c| c.sentiment_percentages.positive),
        improvement_opportunities: top_by(cities, |c| c.sentiment_percentages.negative),
        engagement_leaders: top_by(cities, |c| c.engagement_score),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalPerformance {
    pub region: Region,
    pub total_comments: usize,
    pub cities_covered: usize,
    pub cities: Vec<String>,
    pub avg_engagement: f64,
    pub sentiment_percentages: SentimentPercentages,
    pub performance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRanking {
    pub region: Region,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalPerformanceReport {
    pub regional_performance: Vec<RegionalPerformance>,
    pub regional_rankings: Vec<RegionRanking>,
    pub best_performing_region: Option<Region>,
    pub improvement_needed_region: Option<Region>,
}

/// Weighted blend of positivity, engagement and volume, 0 to 100
pub fn performance_score(region: &RegionalAnalytics) -> f64 {
    let total = region.sentiment_distribution.total();
    if total == 0 {
        return 0.0;
    }
    let positive_ratio = region.sentiment_distribution.positive as f64 / total as f64;
    let engagement = region.avg_engagement / 100.0;
    let volume = (region.total_comments as f64 / 50.0).min(1.0);
    round1((positive_ratio * 0.5 + engagement * 0.3 + volume * 0.2) * 100.0)
}

pub fn regional_performance(analytics: &LocationAnalytics) -> RegionalPerformanceReport {
    let regional_performance: Vec<RegionalPerformance> = analytics
        .regional_analytics
        .iter()
        .filter(|r| r.total_comments > 0)
        .map(|r| RegionalPerformance {
            region: r.region,
            total_comments: r.total_comments,
            cities_covered: r.cities.len(),
            cities: r.cities.clone(),
            avg_engagement: r.avg_engagement,
            sentiment_percentages: r.sentiment_distribution.percentages(),
            performance_score: performance_score(r),
        })
        .collect();

    let mut regional_rankings: Vec<RegionRanking> = regional_performance
        .iter()
        .map(|r| RegionRanking {
            region: r.region,
            score: r.performance_score,
        })
        .collect();
    regional_rankings.sort_by(|a, b| b.score.total_cmp(&a.score));

    RegionalPerformanceReport {
        best_performing_region: regional_rankings.first().map(|r| r.region),
        improvement_needed_region: regional_rankings.last().map(|r| r.region),
        regional_performance,
        regional_rankings,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeographicContext {
    pub market_type: CityTier,
    pub regional_priority: String,
}

/// Dataset context for the locations named in one comment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationInsights {
    pub detected_locations: LocationInfo,
    pub city_insights: Vec<CityAnalytics>,
    pub recommendations: Vec<String>,
    pub geographic_context: GeographicContext,
}

/// Metro if any city is a metro, else tier-2 if any is, else emerging
pub fn market_type(cities: &[String]) -> CityTier {
    let tiers: Vec<CityTier> = cities.iter().map(|c| CityTier::of(c)).collect();
    if tiers.contains(&CityTier::Metro) {
        CityTier::Metro
    } else if tiers.contains(&CityTier::Tier2) {
        CityTier::Tier2
    } else {
        CityTier::Emerging
    }
}

pub fn regional_priority(cities: &[String]) -> String {
    if cities.is_empty() {
        return "National".to_string();
    }
    for city in cities {
        let priority = match city.as_str() {
            "Mumbai" | "Pune" => "West - High Priority",
            "Delhi" | "Jaipur" => "North - High Priority",
            "Bangalore" | "Chennai" => "South - High Priority",
            "Kolkata" => "East - Medium Priority",
            _ => continue,
        };
        return priority.to_string();
    }
    "Regional Focus".to_string()
}

/// Insights for a resolved location. `None` when nothing was detected.
pub fn location_insights(location: &LocationInfo, analytics: &LocationAnalytics) -> Option<LocationInsights> {
    if !location.has_location {
        return None;
    }

    let city_insights: Vec<CityAnalytics> = location
        .cities
        .iter()
        .filter_map(|city| analytics.city(city).cloned())
        .collect();

    let recommendations = city_insights
        .iter()
        .map(|c| match c.dominant_sentiment {
            SentimentLabel::Negative => format!(
                "Immediate attention needed in {} - high negative sentiment detected",
                c.city
            ),
            SentimentLabel::Positive => {
                format!("Leverage {} as a success model for other markets", c.city)
            }
            SentimentLabel::Neutral => format!("Monitor {} market for emerging trends", c.city),
        })
        .collect();

    Some(LocationInsights {
        detected_locations: location.clone(),
        city_insights,
        recommendations,
        geographic_context: GeographicContext {
            market_type: market_type(&location.cities),
            regional_priority: regional_priority(&location.cities),
        },
    })
}
