//! CommentScope Core
//!
//! Core types and utilities shared across CommentScope components.
//!
//! This crate provides:
//! - The domain vocabulary: categories, aspects, regions, sentiment labels
//! - Detector outputs (sentiment results, location info)
//! - The recommendation record consumed by the presentation layer
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    round4, Aspect, Category, LocationContext, LocationInfo, MarketType, PolarityScores,
    Priority, Recommendation, Region, SentimentLabel, SentimentResult, SentimentSource,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{
        Aspect, Category, LocationInfo, Priority, Recommendation, Region, SentimentLabel,
        SentimentResult,
    };
}
