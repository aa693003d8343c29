//! Detector trait and common types

use async_trait::async_trait;

/// Trait for all per-comment detectors.
///
/// Detectors never fail: degraded states are expressed in their output
/// (neutral sentiment with an error field, empty aspect set, no location).
#[async_trait]
pub trait Detector: Send + Sync {
    /// What this detector produces for one comment
    type Output: Send;

    /// Run the detector over the given text
    async fn detect(&self, text: &str) -> Self::Output;

    /// Get the detector name
    fn name(&self) -> &str;

    /// Get the tier (performance category)
    fn tier(&self) -> DetectorTier;
}

/// Detector performance tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorTier {
    /// Ultra-fast (<2ms) - Keyword and lexicon matching
    A,
    /// Fast (<5ms) - Trained linear models
    B,
    /// Moderate - Transformer inference, bounded by a timeout
    C,
}

impl DetectorTier {
    /// Get the latency budget for this tier in microseconds
    pub fn latency_budget_us(&self) -> u64 {
        match self {
            Self::A => 2_000,
            Self::B => 5_000,
            Self::C => 5_000_000,
        }
    }
}
