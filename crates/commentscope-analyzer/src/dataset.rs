//! Labeled comment datasets
//!
//! Supported formats, picked by extension:
//! - `.json`: an array of `{text, category, location?}` objects
//! - `.jsonl`: one such object per line
//! - `.yaml` / `.yml`: a YAML sequence of the same objects
//!
//! Rows with empty text or an unknown category are dropped. A missing file
//! falls back to the built-in seed dataset.

use commentscope_classifiers::LabeledExample;
use commentscope_core::{Category, Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Row as it appears on disk, before validation
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    JsonLines,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("jsonl") | Some("ndjson") => Self::JsonLines,
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Load a dataset, falling back to the seed dataset when `path` does not exist
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Vec<LabeledExample>> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "Dataset file not found, using seed dataset");
        return Ok(seed_dataset());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::dataset(format!("Failed to read {}: {}", path.display(), e)))?;
    let examples = parse_dataset(&content, Format::of(path))?;
    info!(path = %path.display(), records = examples.len(), "Dataset loaded");
    Ok(examples)
}

fn parse_dataset(content: &str, format: Format) -> Result<Vec<LabeledExample>> {
    let rows: Vec<RawRow> = match format {
        Format::Json => serde_json::from_str(content)
            .map_err(|e| Error::dataset(format!("Invalid JSON dataset: {e}")))?,
        Format::Yaml => serde_yaml::from_str(content)
            .map_err(|e| Error::dataset(format!("Invalid YAML dataset: {e}")))?,
        Format::JsonLines => content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                serde_json::from_str(line)
                    .map_err(|e| Error::dataset(format!("Invalid JSON on line {}: {e}", n + 1)))
            })
            .collect::<Result<_>>()?,
    };

    let total = rows.len();
    let examples: Vec<LabeledExample> = rows.into_iter().filter_map(validate).collect();
    if examples.len() < total {
        warn!(
            dropped = total - examples.len(),
            kept = examples.len(),
            "Dropped dataset rows with missing text or unknown category"
        );
    }
    Ok(examples)
}

fn validate(row: RawRow) -> Option<LabeledExample> {
    let text = row.text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())?;
    let category = match row.category.as_deref().map(str::parse::<Category>) {
        Some(Ok(category)) => category,
        Some(Err(e)) => {
            debug!(error = %e, "Skipping row");
            return None;
        }
        None => return None,
    };

    let example = LabeledExample::new(text, category);
    Some(match row.location.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()) {
        Some(location) => example.with_location(location),
        None => example,
    })
}

/// Built-in labeled comments used when no dataset file is present
pub fn seed_dataset() -> Vec<LabeledExample> {
    use Category::*;

    let unlocated = [
        ("The service at the dealership was terrible and unprofessional", Complaint),
        ("I absolutely love my Nexon EV! Amazing features and performance", Praise),
        ("The build quality could be improved, especially the interior plastics", Suggestion),
        ("Great value for money, would definitely recommend to others", Praise),
        ("The charging infrastructure needs serious improvement across the country", Suggestion),
        ("The staff was very helpful and professional during my visit", Praise),
    ];

    let located = [
        ("Mumbai service center staff were excellent and finished the repair on time", Praise, "Mumbai"),
        ("Waited three weeks for a spare part at the Mumbai dealership, very disappointing", Complaint, "Mumbai"),
        ("Is the Nexon EV available with a longer range battery in Mumbai?", PurchaseIntent, "Mumbai"),
        ("Love the Harrier design, it turns heads everywhere in Pune", Praise, "Pune"),
        ("Pune dealer was helpful and the maintenance package is good value", Praise, "Pune"),
        ("The Delhi service staff ignored my complaint about the AC, terrible experience", Complaint, "Delhi"),
        ("Please add ventilated seats and a sunroof to the base variant", Suggestion, "Delhi"),
        ("How does the Punch compare with the Hyundai Exter on mileage?", CompetitiveComparison, "Delhi"),
        ("Bangalore traffic is no problem, the Tiago EV is smooth and comfortable", Praise, "Bangalore"),
        ("Thinking of buying a Nexon in Bangalore, what is the on-road price?", PurchaseIntent, "Bangalore"),
        ("The infotainment system keeps freezing, really frustrating", Complaint, "Bangalore"),
        ("Chennai dealership handled my service quickly, great support", Praise, "Chennai"),
        ("The Altroz feels better built than the Maruti Baleno", CompetitiveComparison, "Chennai"),
        ("What is the recommended service interval for the Nexon diesel?", Inquiry, "Chennai"),
        ("Kolkata showroom staff were rude and the test drive was cancelled", Complaint, "Kolkata"),
        ("Would be great to have more charging stations around Kolkata", Suggestion, "Kolkata"),
        ("Hyderabad service was fine but the billing took too long", GeneralFeedback, "Hyderabad"),
        ("The Safari's sound system is amazing, bought it in Hyderabad last month", Praise, "Hyderabad"),
        ("Jaipur dealer offered a great exchange deal, happy with the purchase", Praise, "Jaipur"),
        ("Which variant of the Nexon should I buy for highway driving?", PurchaseIntent, "Jaipur"),
        ("Poor mileage and the clutch is hard, not happy with the Tigor", Complaint, "Guwahati"),
        ("Indore needs a bigger service network, repair appointments take weeks", Suggestion, "Indore"),
        ("Got the car yesterday from the Bhopal showroom", GeneralFeedback, "Bhopal"),
    ];

    // Keeps every category near the same size so no class dominates training
    let balancing = [
        ("Bad experience, the engine started making noise after a month", Complaint),
        ("Brakes failed twice and the dealer keeps ignoring the problem", Complaint),
        ("Tata should add rear AC vents and a wireless charger option", Suggestion),
        ("Suggest offering an option for a bigger boot in the next update", Suggestion),
        ("Planning to buy the Punch next month, which dealer gives the best discount?", PurchaseIntent),
        ("Interested in booking a test drive before I purchase the Harrier", PurchaseIntent),
        ("Looking to buy an EV soon, is financing available?", PurchaseIntent),
        ("When is the facelift launching in India?", Inquiry),
        ("Will the new model come with ADAS features?", Inquiry),
        ("Any news on when the new Sierra will launch?", Inquiry),
        ("Does the warranty cover the battery pack?", Inquiry),
        ("How often should the coolant be replaced?", Inquiry),
        ("Nexon vs Kia Sonet, which one is safer?", CompetitiveComparison),
        ("Compared to the Mahindra XUV300 the Nexon rides better", CompetitiveComparison),
        ("The Creta cabin feels more premium than the Harrier", CompetitiveComparison),
        ("Drove it to the hills last weekend", GeneralFeedback),
        ("Took delivery on Friday, first service is due in March", GeneralFeedback),
        ("The car is white and has done ten thousand kilometres", GeneralFeedback),
    ];

    unlocated
        .into_iter()
        .chain(balancing)
        .map(|(text, category)| LabeledExample::new(text, category))
        .chain(
            located
                .into_iter()
                .map(|(text, category, city)| LabeledExample::new(text, category).with_location(city)),
        )
        .collect()
}
