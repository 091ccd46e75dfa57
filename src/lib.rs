//! Tourism Engine - ML-powered tourist location recommendations for Sri Lanka
//!
//! This library provides the recommendation core used by the service: a
//! read-only location catalog, great-circle candidate filtering, tree-ensemble
//! scoring, and deterministic ranking.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use crate::core::{haversine_distance, EnjoymentScorer, LocationCatalog, RecommendationEngine, TreeEnsemble};
pub use error::{EngineError, EngineResult};
pub use models::{Location, Origin, RecommendationLevel, UserProfile};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        assert_eq!(haversine_distance(7.9570, 80.7603, 7.9570, 80.7603), 0.0);
        assert_eq!(crate::core::classify(8.0), RecommendationLevel::HighlyRecommended);
    }
}
