// Core algorithm exports
pub mod catalog;
pub mod distance;
pub mod engine;
pub mod ensemble;
pub mod filters;
pub mod scoring;

pub use catalog::LocationCatalog;
pub use distance::{haversine_distance, is_valid_coordinate, is_within_radius};
pub use engine::{EngineStats, RecommendationEngine};
pub use ensemble::TreeEnsemble;
pub use filters::{nearby_candidates, Candidate};
pub use scoring::{classify, clamp_score, EnjoymentScorer, FeatureVector};
