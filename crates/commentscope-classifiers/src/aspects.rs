//! Aspect tagger (Tier A)
//!
//! Multi-label keyword matcher over the fixed aspect taxonomy. An aspect is
//! tagged when any of its keywords occurs as a case-insensitive substring of
//! the comment; "range" matches inside "arrange" the same way "ev" matches
//! inside "every".

use crate::cache::{CacheStats, DetectionCache, DEFAULT_CACHE_CAPACITY};
use crate::classifier::{Detector, DetectorTier};
use aho_corasick::AhoCorasick;
use commentscope_core::{Aspect, Error, Result};

/// Keyword dictionary, one entry per aspect in taxonomy order
pub const ASPECT_KEYWORDS: &[(Aspect, &[&str])] = &[
    (
        Aspect::Service,
        &[
            "service", "dealer", "dealership", "staff", "repair", "maintenance", "support",
            "customer care", "after-sales", "service center", "technician",
        ],
    ),
    (
        Aspect::Features,
        &[
            "features", "infotainment", "technology", "safety", "airbag", "abs", "touchscreen",
            "connectivity", "bluetooth", "android auto", "carplay",
        ],
    ),
    (
        Aspect::Ev,
        &[
            "ev", "nexon ev", "tiago ev", "charging", "range", "battery", "electric", "charge",
            "mileage per charge", "charging station", "battery life",
        ],
    ),
    (
        Aspect::Price,
        &[
            "price", "cost", "expensive", "cheap", "value", "money", "budget", "affordable",
            "pricing", "value for money", "overpriced", "worth",
        ],
    ),
    (
        Aspect::BuildQuality,
        &[
            "build", "quality", "construction", "material", "durability", "solid", "sturdy",
            "plastic", "fit", "finish", "panel gaps", "interior quality",
        ],
    ),
    (
        Aspect::Performance,
        &[
            "performance", "speed", "acceleration", "power", "engine", "smooth", "handling",
            "drive", "pickup", "torque", "responsive",
        ],
    ),
    (
        Aspect::Design,
        &[
            "design", "look", "appearance", "styling", "beautiful", "ugly", "attractive",
            "interior", "exterior", "dashboard", "seats",
        ],
    ),
    (
        Aspect::FuelEfficiency,
        &[
            "mileage", "fuel", "efficiency", "consumption", "economy", "petrol", "diesel",
            "fuel economy", "kmpl",
        ],
    ),
    (
        Aspect::SoundSystem,
        &[
            "sound", "audio", "music", "harman", "speakers", "bass", "treble", "sound system",
            "acoustics",
        ],
    ),
    (
        Aspect::Comfort,
        &[
            "comfort", "comfortable", "seat", "seating", "space", "legroom", "headroom",
            "ergonomic", "cushioning", "ventilated seats",
        ],
    ),
];

/// Keyword-driven aspect tagger
pub struct AspectTagger {
    name: String,
    matcher: AhoCorasick,
    /// Aspect for each pattern index in `matcher`
    pattern_aspects: Vec<Aspect>,
    cache: DetectionCache<Vec<Aspect>>,
}

impl AspectTagger {
    pub fn new() -> Result<Self> {
        Self::with_cache_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_cache_capacity(capacity: usize) -> Result<Self> {
        let (patterns, pattern_aspects): (Vec<&str>, Vec<Aspect>) = ASPECT_KEYWORDS
            .iter()
            .flat_map(|(aspect, keywords)| keywords.iter().map(move |k| (*k, *aspect)))
            .unzip();

        let matcher = AhoCorasick::new(patterns.iter().map(|p| p.to_lowercase()))
            .map_err(|e| Error::classifier(format!("Failed to build aspect matcher: {}", e)))?;

        Ok(Self {
            name: "aspect-tagger".to_string(),
            matcher,
            pattern_aspects,
            cache: DetectionCache::new(capacity),
        })
    }

    /// Tag a comment. Result is in taxonomy order, without duplicates.
    pub fn tag(&self, text: &str) -> Vec<Aspect> {
        self.cache.get_or_insert_with(text, || self.tag_uncached(text))
    }

    fn tag_uncached(&self, text: &str) -> Vec<Aspect> {
        let mut hit = [false; Aspect::ALL.len()];
        let lowered = text.to_lowercase();
        // Overlapping search so "nexon ev" never hides "ev" and vice versa
        for m in self.matcher.find_overlapping_iter(&lowered) {
            let aspect = self.pattern_aspects[m.pattern().as_usize()];
            hit[aspect as usize] = true;
        }

        Aspect::ALL
            .into_iter()
            .filter(|aspect| hit[*aspect as usize])
            .collect()
    }

    /// Keywords for one aspect
    pub fn keywords(aspect: Aspect) -> &'static [&'static str] {
        ASPECT_KEYWORDS
            .iter()
            .find(|(a, _)| *a == aspect)
            .map(|(_, keywords)| *keywords)
            .unwrap_or(&[])
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[async_trait::async_trait]
impl Detector for AspectTagger {
    type Output = Vec<Aspect>;

    async fn detect(&self, text: &str) -> Vec<Aspect> {
        self.tag(text)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tier(&self) -> DetectorTier {
        DetectorTier::A
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dealership_complaint_tags_service() {
        let tagger = AspectTagger::new().unwrap();
        let aspects = tagger.tag("The service at the dealership was terrible and unprofessional");
        assert_eq!(aspects, vec![Aspect::Service]);
    }

    #[test]
    fn test_multi_label_in_taxonomy_order() {
        let tagger = AspectTagger::new().unwrap();
        let aspects = tagger.tag("Comfortable seats, great Harman sound and a solid build. Price is fair");
        assert_eq!(
            aspects,
            vec![
                Aspect::Price,
                Aspect::BuildQuality,
                Aspect::Design,
                Aspect::SoundSystem,
                Aspect::Comfort,
            ]
        );
    }

    #[test]
    fn test_nexon_ev_praise() {
        let tagger = AspectTagger::new().unwrap();
        let aspects = tagger.tag("I absolutely love my Nexon EV! Amazing features and performance");
        assert!(aspects.contains(&Aspect::Features));
        assert!(aspects.contains(&Aspect::Ev));
        assert!(aspects.contains(&Aspect::Performance));
        assert_eq!(aspects[0], Aspect::Features);
    }

    #[test]
    fn test_substring_semantics() {
        let tagger = AspectTagger::new().unwrap();
        // "ev" inside "every" counts
        assert_eq!(tagger.tag("every"), vec![Aspect::Ev]);
        assert!(tagger.tag("hello there").is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        let tagger = AspectTagger::new().unwrap();
        assert_eq!(tagger.tag("KMPL"), vec![Aspect::FuelEfficiency]);
    }

    #[test]
    fn test_unicode_case_folds_like_lowercase() {
        let tagger = AspectTagger::new().unwrap();
        // U+212A KELVIN SIGN lowercases to "k"
        assert_eq!(tagger.tag("\u{212A}MPL"), vec![Aspect::FuelEfficiency]);
    }

    #[test]
    fn test_cached_results_match() {
        let tagger = AspectTagger::with_cache_capacity(2).unwrap();
        let first = tagger.tag("battery range");
        let second = tagger.tag("battery range");
        assert_eq!(first, second);
        assert_eq!(tagger.cache_stats().hits, 1);
    }

    #[test]
    fn test_keywords_lookup() {
        assert!(AspectTagger::keywords(Aspect::Service).contains(&"dealership"));
        assert_eq!(ASPECT_KEYWORDS.len(), Aspect::ALL.len());
    }
}
