//! Location-aware augmentation of recommendations

use commentscope_core::{LocationContext, LocationInfo, MarketType, Recommendation, Region};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metro markets
pub const METRO_CITIES: &[&str] = &["Mumbai", "Delhi", "Bangalore", "Chennai", "Kolkata", "Hyderabad"];

/// Tier-2 markets
pub const TIER2_CITIES: &[&str] = &["Pune", "Jaipur", "Ahmedabad", "Lucknow", "Kanpur", "Nagpur"];

/// Three-way city tier used for action text and analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CityTier {
    Metro,
    #[serde(rename = "Tier-2")]
    Tier2,
    Emerging,
}

impl CityTier {
    pub fn of(city: &str) -> Self {
        if METRO_CITIES.iter().any(|c| *c == city) {
            Self::Metro
        } else if TIER2_CITIES.iter().any(|c| *c == city) {
            Self::Tier2
        } else {
            Self::Emerging
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metro => "Metro",
            Self::Tier2 => "Tier-2",
            Self::Emerging => "Emerging",
        }
    }

    /// Binary classification attached to `location_context`
    pub fn market_type(&self) -> MarketType {
        match self {
            Self::Metro => MarketType::Metro,
            Self::Tier2 | Self::Emerging => MarketType::Regional,
        }
    }
}

impl fmt::Display for CityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn city_actions(city: &str) -> [String; 2] {
    match CityTier::of(city) {
        CityTier::Metro => [
            format!("Prioritize {city} metro market initiatives"),
            "Leverage urban dealership network for immediate response".to_string(),
        ],
        CityTier::Tier2 => [
            format!("Strengthen {city} tier-2 market presence"),
            "Focus on regional dealership training and support".to_string(),
        ],
        CityTier::Emerging => [
            format!("Develop {city} emerging market strategy"),
            "Consider service network expansion in this region".to_string(),
        ],
    }
}

fn region_actions(region: Region) -> Vec<String> {
    let mut actions = vec![format!("Implement region-wide strategy for {region} markets")];
    let specific = match region {
        Region::South => Some("Leverage strong South Indian market base for expansion"),
        Region::West => Some("Capitalize on West region's commercial vehicle demand"),
        Region::North => Some("Address North region's diverse customer preferences"),
        _ => None,
    };
    actions.extend(specific.map(str::to_string));
    actions
}

/// City, else region, else "National"
pub fn geographic_focus(location: &LocationInfo) -> String {
    location
        .primary_city()
        .map(str::to_string)
        .or_else(|| location.primary_region().map(|r| r.as_str().to_string()))
        .unwrap_or_else(|| "National".to_string())
}

/// Rewrite `base` with market context. Returns it untouched when no
/// location was detected.
pub fn augment(base: Recommendation, location: &LocationInfo) -> Recommendation {
    if !location.has_location {
        return base;
    }

    let mut actions: Vec<String> = Vec::new();
    let mut prefix = String::new();

    if let Some(city) = location.primary_city() {
        prefix = format!("Feedback from {city} market indicates ");
        actions.extend(city_actions(city));
    }
    if let Some(region) = location.primary_region() {
        actions.extend(region_actions(region));
    }

    let market_type = location
        .primary_city()
        .map(|city| CityTier::of(city).market_type())
        .unwrap_or(MarketType::Regional);

    // No separator is appended when there is nothing to add
    let action = if actions.is_empty() {
        base.action
    } else {
        format!("{} {}", base.action, actions.join(" "))
    };

    Recommendation {
        insight: format!("{prefix}{}", base.insight.to_lowercase()),
        action,
        location_context: Some(LocationContext {
            detected_locations: location.clone(),
            geographic_focus: geographic_focus(location),
            market_type,
        }),
        ..base
    }
}
