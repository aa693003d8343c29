//! Analysis metrics
//!
//! Counters are kept locally for health reporting and mirrored to the
//! `metrics` facade, which the binary exports in Prometheus format.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Degraded path taken during an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    /// Category came from the keyword fallback
    Intent,
    /// Learned sentiment returned the neutral sentinel
    LearnedSentiment,
}

impl FallbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intent => "intent",
            Self::LearnedSentiment => "learned_sentiment",
        }
    }
}

/// Metrics collector shared by every analysis
#[derive(Clone)]
pub struct AnalysisMetrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    analyses: AtomicU64,
    intent_fallbacks: AtomicU64,
    sentiment_fallbacks: AtomicU64,
    total_latency_us: AtomicU64,
}

impl AnalysisMetrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                analyses: AtomicU64::new(0),
                intent_fallbacks: AtomicU64::new(0),
                sentiment_fallbacks: AtomicU64::new(0),
                total_latency_us: AtomicU64::new(0),
            }),
        }
    }

    /// Record a completed analysis
    pub fn record_analysis(&self, latency_us: u64) {
        self.inner.analyses.fetch_add(1, Ordering::Relaxed);
        self.inner
            .total_latency_us
            .fetch_add(latency_us, Ordering::Relaxed);

        metrics::counter!("commentscope_analyses_total").increment(1);
        metrics::histogram!("commentscope_analysis_latency_us").record(latency_us as f64);
    }

    pub fn record_fallback(&self, kind: FallbackKind) {
        let counter = match kind {
            FallbackKind::Intent => &self.inner.intent_fallbacks,
            FallbackKind::LearnedSentiment => &self.inner.sentiment_fallbacks,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        metrics::counter!("commentscope_fallbacks_total", "kind" => kind.as_str()).increment(1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            analyses: self.inner.analyses.load(Ordering::Relaxed),
            intent_fallbacks: self.inner.intent_fallbacks.load(Ordering::Relaxed),
            sentiment_fallbacks: self.inner.sentiment_fallbacks.load(Ordering::Relaxed),
            total_latency_us: self.inner.total_latency_us.load(Ordering::Relaxed),
        }
    }
}

impl Default for AnalysisMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of current metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub analyses: u64,
    pub intent_fallbacks: u64,
    pub sentiment_fallbacks: u64,
    pub total_latency_us: u64,
}

impl MetricsSnapshot {
    pub fn avg_latency_us(&self) -> u64 {
        if self.analyses == 0 {
            0
        } else {
            self.total_latency_us / self.analyses
        }
    }

    /// Share of analyses whose category came from the keyword fallback
    pub fn intent_fallback_rate(&self) -> f64 {
        if self.analyses == 0 {
            0.0
        } else {
            self.intent_fallbacks as f64 / self.analyses as f64
        }
    }
}
