//! Location resolver (Tier A)

use crate::cache::{CacheStats, DetectionCache, DEFAULT_CACHE_CAPACITY};
use crate::classifier::{Detector, DetectorTier};
use crate::gazetteer::{self, CITIES, STATES};
use aho_corasick::AhoCorasick;
use commentscope_core::{Error, LocationInfo, Region, Result};

/// Detects city and state mentions and derives macro-regions.
///
/// Names match as case-insensitive substrings, so "Delhi" is found inside
/// "New Delhi" and both cities are reported.
pub struct LocationResolver {
    name: String,
    cities: AhoCorasick,
    states: AhoCorasick,
    cache: DetectionCache<LocationInfo>,
}

impl LocationResolver {
    pub fn new() -> Result<Self> {
        Self::with_cache_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_cache_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            name: "location-resolver".to_string(),
            cities: build_matcher(CITIES)?,
            states: build_matcher(STATES)?,
            cache: DetectionCache::new(capacity),
        })
    }

    /// Resolve locations in a comment
    pub fn resolve(&self, text: &str) -> LocationInfo {
        self.cache.get_or_insert_with(text, || self.resolve_uncached(text))
    }

    fn resolve_uncached(&self, text: &str) -> LocationInfo {
        let lowered = text.to_lowercase();
        let cities = matched_names(&self.cities, CITIES, &lowered);
        let states = matched_names(&self.states, STATES, &lowered);

        let mut regions: Vec<Region> = Vec::new();
        let derived = cities
            .iter()
            .flat_map(|city| gazetteer::regions_for_city(city))
            .chain(states.iter().flat_map(|state| gazetteer::regions_for_state(state)));
        for region in derived {
            if !regions.contains(&region) {
                regions.push(region);
            }
        }

        let has_location = !cities.is_empty() || !states.is_empty();
        LocationInfo {
            cities,
            states,
            regions,
            has_location,
        }
    }

    /// Number of known cities
    pub fn city_count(&self) -> usize {
        CITIES.len()
    }

    /// Number of known states and union territories
    pub fn state_count(&self) -> usize {
        STATES.len()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[async_trait::async_trait]
impl Detector for LocationResolver {
    type Output = LocationInfo;

    async fn detect(&self, text: &str) -> LocationInfo {
        self.resolve(text)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tier(&self) -> DetectorTier {
        DetectorTier::A
    }
}

/// Matcher over lowercased names; search it with lowercased text
fn build_matcher(names: &[&str]) -> Result<AhoCorasick> {
    AhoCorasick::new(names.iter().map(|name| name.to_lowercase()))
        .map_err(|e| Error::classifier(format!("Failed to build gazetteer matcher: {}", e)))
}

/// Names found in `text`, in gazetteer order
fn matched_names(matcher: &AhoCorasick, names: &[&str], text: &str) -> Vec<String> {
    let mut hit = vec![false; names.len()];
    for m in matcher.find_overlapping_iter(text) {
        hit[m.pattern().as_usize()] = true;
    }
    names
        .iter()
        .zip(hit)
        .filter(|(_, found)| *found)
        .map(|(name, _)| (*name).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_with_region() {
        let resolver = LocationResolver::new().unwrap();
        let info = resolver.resolve("The service center in Mumbai was terrible");
        assert_eq!(info.cities, vec!["Mumbai"]);
        assert!(info.states.is_empty());
        assert_eq!(info.regions, vec![Region::West]);
        assert!(info.has_location);
    }

    #[test]
    fn test_no_location() {
        let resolver = LocationResolver::new().unwrap();
        let info = resolver.resolve("Great car overall");
        assert_eq!(info, LocationInfo::empty());
        assert!(!info.has_location);
    }

    #[test]
    fn test_new_delhi_matches_both_cities_and_state() {
        let resolver = LocationResolver::new().unwrap();
        let info = resolver.resolve("Bought it in New Delhi last week");
        assert_eq!(info.cities, vec!["Delhi", "New Delhi"]);
        assert_eq!(info.states, vec!["Delhi"]);
        assert_eq!(info.regions, vec![Region::North]);
    }

    #[test]
    fn test_unmapped_city_has_no_region() {
        let resolver = LocationResolver::new().unwrap();
        let info = resolver.resolve("Dealer in lucknow was helpful");
        assert_eq!(info.cities, vec!["Lucknow"]);
        assert!(info.regions.is_empty());
        assert!(info.has_location);
    }

    #[test]
    fn test_gazetteer_order_not_text_order() {
        let resolver = LocationResolver::new().unwrap();
        let info = resolver.resolve("Drove from Chennai to Bangalore");
        assert_eq!(info.cities, vec!["Bangalore", "Chennai"]);
        assert_eq!(info.regions, vec![Region::South]);
    }

    #[test]
    fn test_state_only() {
        let resolver = LocationResolver::new().unwrap();
        let info = resolver.resolve("Charging network in Kerala and Assam needs work");
        assert!(info.cities.is_empty());
        assert_eq!(info.states, vec!["Kerala", "Assam"]);
        assert_eq!(info.regions, vec![Region::South, Region::Northeast]);
    }

    #[test]
    fn test_unicode_case_folds_like_lowercase() {
        let resolver = LocationResolver::new().unwrap();
        // U+212A KELVIN SIGN lowercases to "k"
        let info = resolver.resolve("Showroom in \u{212A}OLKATA");
        assert_eq!(info.cities, vec!["Kolkata"]);
        assert_eq!(info.regions, vec![Region::East]);
    }

    #[test]
    fn test_repeatable() {
        let resolver = LocationResolver::new().unwrap();
        let text = "Pune and Jaipur showrooms";
        assert_eq!(resolver.resolve(text), resolver.resolve(text));
    }
}
